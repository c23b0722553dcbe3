//! Tests for statement parsing and the scope tree built alongside it.
//!
//! These tests parse whole programs through the public `esengine::parse`
//! entry point and inspect both the resulting AST and the `ScopeTree` it
//! produces, since the two are built in lockstep rather than one derived
//! from the other after the fact.

use esengine::{parse, ErrorKind, NodeKind, ParserConfig, SourceType, VariableKind};

fn parse_script(src: &str) -> (esengine::NodeArena, esengine::ParseOutput<esengine::NodeId>, esengine::Interner) {
    parse(src, ParserConfig { source_type: SourceType::Script, ..Default::default() }).expect("expected a successful parse")
}

fn program_body<'a>(arena: &'a esengine::NodeArena, root: esengine::NodeId) -> &'a [esengine::NodeId] {
    match &arena.get(root).kind {
        NodeKind::Program { body, .. } => arena.list(*body),
        other => panic!("expected Program, got {other:?}"),
    }
}

// =============================================================================
// 1. variable declarations and scope recording
// =============================================================================

/// A top-level `var` is recorded as a function-scoped var binding, not a
/// lexical one, and survives block collapse.
#[test]
fn top_level_var_is_recorded_as_var_binding() {
    let (_arena, output, interner) = parse_script("var x = 1;");
    let names: Vec<&str> = output.scope_tree.top_level.var_names.iter().map(|b| interner.get(b.name)).collect();
    assert_eq!(names, vec!["x"]);
}

/// A top-level `let` is recorded as a lexical binding in the root block,
/// distinct from `var_names`.
#[test]
fn top_level_let_is_lexical_not_var() {
    let (_arena, output, _interner) = parse_script("let y = 2;");
    assert!(output.scope_tree.top_level.var_names.is_empty());
    assert_eq!(output.scope_tree.top_level.blocks[0].lexical_names.len(), 1);
}

/// A `let` declared inside a nested block is recorded in that block, not
/// the function's root block, and the block survives collapse because it
/// isn't empty.
#[test]
fn block_scoped_let_is_recorded_in_its_own_block() {
    let (_arena, output, interner) = parse_script("{ let z = 3; }");
    let nested = output
        .scope_tree
        .top_level
        .blocks
        .iter()
        .find(|b| !b.lexical_names.is_empty())
        .expect("a non-root block should carry the lexical declaration");
    assert_eq!(interner.get(nested.lexical_names[0].name), "z");
}

/// Redeclaring a `let` name twice in the same block is a syntax error.
#[test]
fn redeclaring_let_in_same_block_is_rejected() {
    let err = parse("let a = 1; let a = 2;", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// In sloppy mode, strict-mode-reserved words like `let` and `static` are
/// ordinary identifiers and may be used as binding names.
#[test]
fn strict_reserved_words_bind_as_identifiers_in_sloppy_mode() {
    let (_arena, output, interner) = parse_script("var let = 1; var static = 2;");
    let names: Vec<&str> = output.scope_tree.top_level.var_names.iter().map(|b| interner.get(b.name)).collect();
    assert_eq!(names, vec!["let", "static"]);
}

/// A `let` declaration itself still parses correctly once the scanner's
/// sloppy-mode reclassification distinguishes it from a `let`-named
/// binding (the scanner only ever sees one token of lookahead).
#[test]
fn let_declaration_still_parses_in_sloppy_mode() {
    let (_arena, output, _interner) = parse_script("let x = 1;");
    assert_eq!(output.scope_tree.top_level.blocks[0].lexical_names.len(), 1);
}

/// An empty block with no declarations collapses away rather than
/// appearing as its own scope entry.
#[test]
fn empty_blocks_collapse_away() {
    let (_arena, output, _interner) = parse_script("{ { } }");
    assert!(output.scope_tree.top_level.blocks.iter().skip(1).all(|b| b.lexical_names.is_empty() && b.function_names.is_empty()));
}

// =============================================================================
// 2. function declarations
// =============================================================================

/// A function declaration's name is hoisted into the enclosing scope as a
/// function binding, and its own parameters/body form a child scope.
#[test]
fn function_declaration_creates_child_scope_with_params() {
    let (_arena, output, interner) = parse_script("function add(a, b) { return a + b; }");
    assert_eq!(output.scope_tree.top_level.children.len(), 1);
    let child = &output.scope_tree.top_level.children[0];
    let params: Vec<&str> = child.params.iter().map(|s| interner.get(*s)).collect();
    assert_eq!(params, vec!["a", "b"]);
    assert_eq!(interner.get(child.name.expect("named function")), "add");
}

/// A generator/async function declaration carries both flags through to
/// its scope and its AST node.
#[test]
fn async_generator_function_declaration_sets_both_flags() {
    let (arena, output, _interner) = parse_script("async function* gen() {}");
    let child = &output.scope_tree.top_level.children[0];
    assert!(child.is_generator && child.is_async);
    let body = program_body(&arena, output.root);
    match arena.get(body[0]).kind {
        NodeKind::FunctionDeclaration { is_generator, is_async, .. } => assert!(is_generator && is_async),
        ref other => panic!("expected FunctionDeclaration, got {other:?}"),
    }
}

// =============================================================================
// 3. for-statement head disambiguation
// =============================================================================

/// A C-style for loop with all three clauses parses into `ForStatement`.
#[test]
fn c_style_for_parses_all_three_clauses() {
    let (arena, output, _interner) = parse_script("for (var i = 0; i < 10; i++) {}");
    let body = program_body(&arena, output.root);
    match arena.get(body[0]).kind {
        NodeKind::ForStatement { init, test, update, .. } => {
            assert!(init.is_some() && test.is_some() && update.is_some());
        }
        ref other => panic!("expected ForStatement, got {other:?}"),
    }
}

/// `for (x in obj)` is not misparsed as a C-style for with an `in`
/// expression in its init clause.
#[test]
fn for_in_with_declaration_parses_as_for_in() {
    let (arena, output, _interner) = parse_script("for (let k in obj) {}");
    let body = program_body(&arena, output.root);
    assert!(matches!(arena.get(body[0]).kind, NodeKind::ForInStatement { .. }));
}

/// `for (x of arr)` uses the contextual `of` identifier, not a keyword.
#[test]
fn for_of_with_existing_binding_parses_as_for_of() {
    let (arena, output, _interner) = parse_script("let x; for (x of arr) {}");
    let body = program_body(&arena, output.root);
    assert!(matches!(arena.get(body[1]).kind, NodeKind::ForOfStatement { is_await: false, .. }));
}

/// `for await (x of iter)` inside an async function sets `is_await`.
#[test]
fn for_await_of_sets_is_await_flag() {
    let (arena, output, _interner) = parse_script("async function f() { for await (const x of iter) {} }");
    let body = program_body(&arena, output.root);
    let fn_body = match arena.get(body[0]).kind {
        NodeKind::FunctionDeclaration { body, .. } => body,
        ref other => panic!("expected FunctionDeclaration, got {other:?}"),
    };
    let stmts = match &arena.get(fn_body).kind {
        NodeKind::BlockStatement { body, .. } => arena.list(*body),
        other => panic!("expected BlockStatement, got {other:?}"),
    };
    assert!(matches!(arena.get(stmts[0]).kind, NodeKind::ForOfStatement { is_await: true, .. }));
}

/// A `for-of` loop's bound name is recorded as a using-name of its (empty)
/// body block, which then collapses into the enclosing block and carries
/// the using-name with it.
#[test]
fn for_of_bound_name_is_recorded_as_a_using_name() {
    let (_arena, output, interner) = parse_script("for (let i of [1, 2, 3]) {}");
    let names: Vec<&str> = output.scope_tree.top_level.blocks[0].using_names.iter().map(|n| interner.get(*n)).collect();
    assert_eq!(names, vec!["i"]);
}

// =============================================================================
// 4. switch and try/catch
// =============================================================================

/// A switch statement with two `default` clauses is rejected.
#[test]
fn switch_with_two_defaults_is_rejected() {
    let err = parse(
        "switch (x) { default: break; default: break; }",
        ParserConfig { source_type: SourceType::Script, ..Default::default() },
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// `try` with neither `catch` nor `finally` is rejected.
#[test]
fn try_without_catch_or_finally_is_rejected() {
    let err = parse("try { foo(); }", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// A catch clause with no parameter list (`catch { ... }`) is allowed.
#[test]
fn catch_without_binding_parameter_is_allowed() {
    let (arena, output, _interner) = parse_script("try { risky(); } catch { recover(); }");
    let body = program_body(&arena, output.root);
    match arena.get(body[0]).kind {
        NodeKind::TryStatement { handler: Some(handler), .. } => {
            assert!(matches!(arena.get(handler).kind, NodeKind::CatchClause { param: None, .. }));
        }
        ref other => panic!("expected TryStatement with a handler, got {other:?}"),
    }
}

// =============================================================================
// 5. automatic semicolon insertion
// =============================================================================

/// A `return` followed by a line terminator before its would-be argument
/// returns `undefined`, not the next line's expression (the ASI hazard).
#[test]
fn return_with_newline_before_argument_has_no_argument() {
    let (arena, output, _interner) = parse_script("function f() { return\n1; }");
    let fn_body = match arena.get(program_body(&arena, output.root)[0]).kind {
        NodeKind::FunctionDeclaration { body, .. } => body,
        ref other => panic!("expected FunctionDeclaration, got {other:?}"),
    };
    let stmts = match &arena.get(fn_body).kind {
        NodeKind::BlockStatement { body, .. } => arena.list(*body),
        other => panic!("expected BlockStatement, got {other:?}"),
    };
    assert!(matches!(arena.get(stmts[0]).kind, NodeKind::ReturnStatement { argument: None }));
}

/// A line terminator immediately after `throw` is a syntax error, not an
/// ASI opportunity.
#[test]
fn throw_with_newline_before_argument_is_rejected() {
    let err = parse("throw\n1;", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// A `do`-`while` loop's trailing semicolon is optional even without a
/// preceding line terminator.
#[test]
fn do_while_trailing_semicolon_is_optional() {
    let (arena, output, _interner) = parse_script("do { x++; } while (x < 10) x;");
    let body = program_body(&arena, output.root);
    assert!(matches!(arena.get(body[0]).kind, NodeKind::DoWhileStatement { .. }));
    assert!(matches!(arena.get(body[1]).kind, NodeKind::ExpressionStatement { .. }));
}

// =============================================================================
// 6. declaration kinds
// =============================================================================

/// `const`, `let`, and `var` declarators all parse with their own
/// `VariableKind` tag on the `VariableDeclaration` node.
#[test]
fn variable_declaration_carries_its_kind() {
    let (arena, output, _interner) = parse_script("const a = 1; let b = 2; var c = 3;");
    let body = program_body(&arena, output.root);
    let kinds: Vec<VariableKind> = body
        .iter()
        .map(|id| match arena.get(*id).kind {
            NodeKind::VariableDeclaration { kind, .. } => kind,
            ref other => panic!("expected VariableDeclaration, got {other:?}"),
        })
        .collect();
    assert_eq!(kinds, vec![VariableKind::Const, VariableKind::Let, VariableKind::Var]);
}
