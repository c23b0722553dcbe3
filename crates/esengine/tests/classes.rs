//! Tests for class declarations/expressions: method modifier combinations,
//! private fields/methods/member access, class-body early errors (duplicate
//! constructor, invalid constructor modifiers, a static `prototype`), and
//! the explicit rejection of constructs `NodeShape` has no variant for
//! (public field declarations, static initialization blocks).

use esengine::{parse, ErrorKind, MethodKind, NodeKind, ParserConfig, SourceType};

fn parse_script(src: &str) -> (esengine::NodeArena, esengine::ParseOutput<esengine::NodeId>, esengine::Interner) {
    parse(src, ParserConfig { source_type: SourceType::Script, ..Default::default() }).expect("expected a successful parse")
}

fn class_body_members<'a>(arena: &'a esengine::NodeArena, root: esengine::NodeId) -> &'a [esengine::NodeId] {
    let stmt = match &arena.get(root).kind {
        NodeKind::Program { body, .. } => arena.list(*body)[0],
        other => panic!("expected Program, got {other:?}"),
    };
    let body = match arena.get(stmt).kind {
        NodeKind::ClassDeclaration { body, .. } => body,
        ref other => panic!("expected ClassDeclaration, got {other:?}"),
    };
    match &arena.get(body).kind {
        NodeKind::ClassBody { body } => arena.list(*body),
        other => panic!("expected ClassBody, got {other:?}"),
    }
}

// =============================================================================
// 1. class declarations
// =============================================================================

/// A class declaration binds its name lexically in the enclosing scope,
/// the same as any other `let`-like declaration.
#[test]
fn class_declaration_binds_its_name_lexically() {
    let (_arena, output, interner) = parse_script("class Point {}");
    let names: Vec<&str> = output.scope_tree.top_level.blocks[0].lexical_names.iter().map(|b| interner.get(b.name)).collect();
    assert_eq!(names, vec!["Point"]);
}

/// `extends` attaches the superclass expression to the class node.
#[test]
fn extends_clause_attaches_superclass() {
    let (arena, output, _interner) = parse_script("class Square extends Shape {}");
    let stmt = match &arena.get(output.root).kind {
        NodeKind::Program { body, .. } => arena.list(*body)[0],
        other => panic!("expected Program, got {other:?}"),
    };
    match arena.get(stmt).kind {
        NodeKind::ClassDeclaration { super_class: Some(_), .. } => {}
        ref other => panic!("expected ClassDeclaration with a superclass, got {other:?}"),
    }
}

/// A method named `constructor` (plain, non-static, non-computed) is
/// tagged `MethodKind::Constructor`.
#[test]
fn constructor_method_is_tagged_as_constructor() {
    let (arena, output, _interner) = parse_script("class Point { constructor(x) { this.x = x; } }");
    let members = class_body_members(&arena, output.root);
    match arena.get(members[0]).kind {
        NodeKind::MethodDefinition { kind: MethodKind::Constructor, .. } => {}
        ref other => panic!("expected a Constructor MethodDefinition, got {other:?}"),
    }
}

/// A `static` method is marked `is_static` and isn't mistaken for the
/// constructor.
#[test]
fn static_method_is_marked_static() {
    let (arena, output, _interner) = parse_script("class Util { static helper() {} }");
    let members = class_body_members(&arena, output.root);
    match arena.get(members[0]).kind {
        NodeKind::MethodDefinition { kind: MethodKind::Method, is_static: true, .. } => {}
        ref other => panic!("expected a static Method MethodDefinition, got {other:?}"),
    }
}

/// `get`/`set` accessor methods parse with their respective `MethodKind`.
#[test]
fn accessor_methods_get_their_own_method_kind() {
    let (arena, output, _interner) = parse_script("class Box { get value() { return this._v; } set value(v) { this._v = v; } }");
    let members = class_body_members(&arena, output.root);
    assert!(matches!(arena.get(members[0]).kind, NodeKind::MethodDefinition { kind: MethodKind::Get, .. }));
    assert!(matches!(arena.get(members[1]).kind, NodeKind::MethodDefinition { kind: MethodKind::Set, .. }));
}

/// A method literally named `static`/`get`/`set` (the modifier word used as
/// the member name itself) is not swallowed as a modifier.
#[test]
fn method_named_static_is_not_swallowed_as_a_modifier() {
    let (arena, output, _interner) = parse_script("class C { static() {} }");
    let members = class_body_members(&arena, output.root);
    match arena.get(members[0]).kind {
        NodeKind::MethodDefinition { is_static: false, kind: MethodKind::Method, .. } => {}
        ref other => panic!("expected a non-static Method named 'static', got {other:?}"),
    }
}

/// An async generator method combines both flags on its `FunctionExpression`
/// value.
#[test]
fn async_generator_method_combines_both_flags() {
    let (arena, output, _interner) = parse_script("class C { async *gen() {} }");
    let members = class_body_members(&arena, output.root);
    match arena.get(members[0]).kind {
        NodeKind::MethodDefinition { value, .. } => match arena.get(value).kind {
            NodeKind::FunctionExpression { is_generator: true, is_async: true, .. } => {}
            ref other => panic!("expected an async generator FunctionExpression, got {other:?}"),
        },
        ref other => panic!("expected MethodDefinition, got {other:?}"),
    }
}

/// A private method (`#name() {}`) builds a `PrivateIdentifier` key.
#[test]
fn private_method_builds_private_identifier_key() {
    let (arena, output, interner) = parse_script("class C { #secret() { return 1; } }");
    let members = class_body_members(&arena, output.root);
    match arena.get(members[0]).kind {
        NodeKind::MethodDefinition { key, .. } => match arena.get(key).kind {
            NodeKind::PrivateIdentifier { name } => assert_eq!(interner.get(name), "secret"),
            ref other => panic!("expected PrivateIdentifier, got {other:?}"),
        },
        ref other => panic!("expected MethodDefinition, got {other:?}"),
    }
}

/// A private field (`#p;`, no initializer) builds a `PropertyDefinition`
/// with a `PrivateIdentifier` key and no value.
#[test]
fn private_field_without_initializer_builds_property_definition() {
    let (arena, output, interner) = parse_script("class C { #count; }");
    let members = class_body_members(&arena, output.root);
    match arena.get(members[0]).kind {
        NodeKind::PropertyDefinition { key, value: None, is_static: false, .. } => match arena.get(key).kind {
            NodeKind::PrivateIdentifier { name } => assert_eq!(interner.get(name), "count"),
            ref other => panic!("expected PrivateIdentifier, got {other:?}"),
        },
        ref other => panic!("expected PropertyDefinition, got {other:?}"),
    }
}

/// A private field with an initializer carries it as `value`.
#[test]
fn private_field_with_initializer_carries_its_value() {
    let (arena, output, _interner) = parse_script("class C { #count = 0; }");
    let members = class_body_members(&arena, output.root);
    assert!(matches!(arena.get(members[0]).kind, NodeKind::PropertyDefinition { value: Some(_), .. }));
}

/// `o.#p` builds a non-computed `MemberExpression` whose property is a
/// `PrivateIdentifier`.
#[test]
fn private_name_member_access_parses() {
    let (arena, output, interner) = parse_script("class C { #p; get(o) { return o.#p; } }");
    let members = class_body_members(&arena, output.root);
    let method_body = match arena.get(members[1]).kind {
        NodeKind::MethodDefinition { value, .. } => value,
        ref other => panic!("expected MethodDefinition, got {other:?}"),
    };
    let fn_body = match arena.get(method_body).kind {
        NodeKind::FunctionExpression { body, .. } => body,
        ref other => panic!("expected FunctionExpression, got {other:?}"),
    };
    let stmts = match &arena.get(fn_body).kind {
        NodeKind::BlockStatement { body, .. } => arena.list(*body),
        other => panic!("expected BlockStatement, got {other:?}"),
    };
    let arg = match arena.get(stmts[0]).kind {
        NodeKind::ReturnStatement { argument: Some(arg), .. } => arg,
        ref other => panic!("expected a return with an argument, got {other:?}"),
    };
    match arena.get(arg).kind {
        NodeKind::MemberExpression { property, computed: false, .. } => match arena.get(property).kind {
            NodeKind::PrivateIdentifier { name } => assert_eq!(interner.get(name), "p"),
            ref other => panic!("expected PrivateIdentifier property, got {other:?}"),
        },
        ref other => panic!("expected MemberExpression, got {other:?}"),
    }
}

/// A second method named `constructor` is a syntax error.
#[test]
fn duplicate_constructor_is_rejected() {
    let err =
        parse("class C { constructor() {} constructor() {} }", ParserConfig { source_type: SourceType::Script, ..Default::default() })
            .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// A generator method named `constructor` is rejected, not silently
/// treated as the class constructor.
#[test]
fn generator_named_constructor_is_rejected() {
    let err = parse("class C { *constructor() {} }", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// An accessor named `constructor` is rejected the same way.
#[test]
fn getter_named_constructor_is_rejected() {
    let err = parse("class C { get constructor() {} }", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// A static member literally named `prototype` is rejected.
#[test]
fn static_member_named_prototype_is_rejected() {
    let err = parse("class C { static prototype() {} }", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// A non-static method literally named `prototype` is unaffected by the
/// restriction above.
#[test]
fn instance_method_named_prototype_parses() {
    let (arena, output, _interner) = parse_script("class C { prototype() {} }");
    let members = class_body_members(&arena, output.root);
    assert!(matches!(arena.get(members[0]).kind, NodeKind::MethodDefinition { is_static: false, .. }));
}

// =============================================================================
// 2. class expressions
// =============================================================================

/// An anonymous class expression is valid wherever an expression is.
#[test]
fn anonymous_class_expression_parses() {
    let (arena, output, _interner) = parse_script("const C = class { greet() {} };");
    let stmt = match &arena.get(output.root).kind {
        NodeKind::Program { body, .. } => arena.list(*body)[0],
        other => panic!("expected Program, got {other:?}"),
    };
    match arena.get(stmt).kind {
        NodeKind::VariableDeclaration { ref declarations, .. } => match arena.get(declarations[0]).kind {
            NodeKind::VariableDeclarator { init: Some(init), .. } => {
                assert!(matches!(arena.get(init).kind, NodeKind::ClassExpression { id: None, .. }));
            }
            ref other => panic!("expected VariableDeclarator, got {other:?}"),
        },
        ref other => panic!("expected VariableDeclaration, got {other:?}"),
    }
}

// =============================================================================
// 3. unsupported constructs are explicitly rejected
// =============================================================================

/// A class field declaration (`x = 1;` inside a class body) is rejected
/// rather than silently misrepresented as a zero-argument method.
#[test]
fn class_field_declaration_is_rejected() {
    let err = parse("class C { x = 1; }", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// A static initialization block (`static { ... }`) is rejected for the
/// same reason.
#[test]
fn static_initialization_block_is_rejected() {
    let err = parse("class C { static { ready = true; } }", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}
