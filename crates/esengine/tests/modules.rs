//! Tests for `import`/`export` parsing and the `ModuleRecord` a module-goal
//! parse accumulates alongside the AST.

use esengine::{parse, ErrorKind, NodeKind, ParserConfig, SourceType};

fn parse_module(src: &str) -> (esengine::NodeArena, esengine::ParseOutput<esengine::NodeId>, esengine::Interner) {
    parse(src, ParserConfig { source_type: SourceType::Module, ..Default::default() }).expect("expected a successful parse")
}

// =============================================================================
// 1. imports
// =============================================================================

/// A default import binds its local name and requests the source module.
#[test]
fn default_import_binds_local_name_and_requests_module() {
    let (_arena, output, interner) = parse_module("import React from \"react\";");
    let record = output.module_record.as_ref().expect("module parse always produces a record");
    assert_eq!(record.import_entries.len(), 1);
    let entry = &record.import_entries[0];
    assert!(entry.imported_name.is_none());
    assert_eq!(interner.get(entry.local_name), "React");
    assert_eq!(interner.get(record.requested_modules[0]), "react");
}

/// A namespace import (`import * as ns from "m"`) records no imported
/// name, only the namespace's local binding.
#[test]
fn namespace_import_has_no_imported_name() {
    let (_arena, output, interner) = parse_module("import * as utils from \"./utils.js\";");
    let record = output.module_record.as_ref().unwrap();
    let entry = &record.import_entries[0];
    assert!(entry.imported_name.is_none());
    assert_eq!(interner.get(entry.local_name), "utils");
}

/// A named-specifier list with a rename (`{ a as b }`) records both the
/// imported name and its local rename.
#[test]
fn named_import_with_rename_records_both_names() {
    let (_arena, output, interner) = parse_module("import { value as v } from \"./m.js\";");
    let record = output.module_record.as_ref().unwrap();
    let entry = &record.import_entries[0];
    assert_eq!(interner.get(entry.imported_name.unwrap()), "value");
    assert_eq!(interner.get(entry.local_name), "v");
}

/// A combined default-plus-namespace import (`import d, * as ns from "m"`)
/// produces two import entries sharing one requested module.
#[test]
fn combined_default_and_namespace_import_produces_two_entries() {
    let (_arena, output, _interner) = parse_module("import d, * as ns from \"m\";");
    let record = output.module_record.as_ref().unwrap();
    assert_eq!(record.import_entries.len(), 2);
    assert_eq!(record.requested_modules.len(), 1);
}

/// Every imported binding is also declared lexically, so later references
/// in the module body resolve without a separate pass.
#[test]
fn imported_bindings_are_declared_lexically() {
    let (_arena, output, interner) = parse_module("import { helper } from \"./h.js\"; helper();");
    let names: Vec<&str> = output.scope_tree.top_level.blocks[0].lexical_names.iter().map(|b| interner.get(b.name)).collect();
    assert_eq!(names, vec!["helper"]);
}

// =============================================================================
// 2. exports
// =============================================================================

/// `export default <expr>;` registers a local export named `"default"`.
#[test]
fn export_default_registers_default_name() {
    let (_arena, output, interner) = parse_module("export default 42;");
    let record = output.module_record.as_ref().unwrap();
    assert_eq!(record.local_export_entries.len(), 1);
    assert_eq!(interner.get(record.local_export_entries[0].export_name.unwrap()), "default");
}

/// `export default function f() {}` still builds a real function
/// declaration node, not a bare expression.
#[test]
fn export_default_function_builds_function_declaration() {
    let (arena, output, _interner) = parse_module("export default function f() {}");
    let stmt = match &arena.get(output.root).kind {
        NodeKind::Program { body, .. } => arena.list(*body)[0],
        other => panic!("expected Program, got {other:?}"),
    };
    match arena.get(stmt).kind {
        NodeKind::ExportDefaultDeclaration { declaration } => {
            assert!(matches!(arena.get(declaration).kind, NodeKind::FunctionDeclaration { .. }));
        }
        ref other => panic!("expected ExportDefaultDeclaration, got {other:?}"),
    }
}

/// `export function f() {}` binds `f` both as a function declaration and as
/// a named export under its own name, via the bottom-up name collector.
#[test]
fn export_declaration_clause_exports_the_bound_name() {
    let (_arena, output, interner) = parse_module("export function helper() {}");
    let record = output.module_record.as_ref().unwrap();
    assert_eq!(record.local_export_entries.len(), 1);
    assert_eq!(interner.get(record.local_export_entries[0].export_name.unwrap()), "helper");
}

/// `export const a = 1, b = 2;` exports every name the declaration binds,
/// not just the first.
#[test]
fn export_const_with_multiple_declarators_exports_all_names() {
    let (_arena, output, interner) = parse_module("export const a = 1, b = 2;");
    let record = output.module_record.as_ref().unwrap();
    let mut names: Vec<&str> = record.local_export_entries.iter().map(|e| interner.get(e.export_name.unwrap())).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b"]);
}

/// A named export list with a rename (`export { a as b }`) records the
/// local name distinct from the exported name.
#[test]
fn named_export_list_with_rename_distinguishes_names() {
    let (_arena, output, interner) = parse_module("const a = 1; export { a as b };");
    let record = output.module_record.as_ref().unwrap();
    let entry = &record.local_export_entries[0];
    assert_eq!(interner.get(entry.local_name.unwrap()), "a");
    assert_eq!(interner.get(entry.export_name.unwrap()), "b");
}

/// `export { x } from "m"` is an indirect re-export, not a local one, and
/// requests the source module.
#[test]
fn re_export_from_another_module_is_indirect() {
    let (_arena, output, interner) = parse_module("export { value } from \"./m.js\";");
    let record = output.module_record.as_ref().unwrap();
    assert!(record.local_export_entries.is_empty());
    assert_eq!(record.indirect_export_entries.len(), 1);
    assert_eq!(interner.get(record.requested_modules[0]), "./m.js");
}

/// `export * from "m"` registers a star export and requests the module.
#[test]
fn star_export_requests_its_module() {
    let (_arena, output, interner) = parse_module("export * from \"./all.js\";");
    let record = output.module_record.as_ref().unwrap();
    assert_eq!(record.star_export_entries.len(), 1);
    assert_eq!(interner.get(record.requested_modules[0]), "./all.js");
}

/// `export * as ns from "m"` names the star export's binding.
#[test]
fn star_export_with_as_names_the_binding() {
    let (_arena, output, interner) = parse_module("export * as ns from \"./all.js\";");
    let record = output.module_record.as_ref().unwrap();
    assert_eq!(interner.get(record.star_export_entries[0].export_name.unwrap()), "ns");
}

// =============================================================================
// 3. script-goal parses never populate a module record
// =============================================================================

/// A `Script`-goal parse leaves `module_record` as `None`, even though
/// nothing in the grammar it exercises would need one.
#[test]
fn script_goal_parse_has_no_module_record() {
    let (_arena, output, _interner) = parse("const a = 1;", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap();
    assert!(output.module_record.is_none());
}

/// `import`/`export` are only grammar in a module goal; encountering them
/// as a `Script` falls through to ordinary statement parsing and fails
/// since `import`/`export` aren't valid expression starts.
#[test]
fn import_in_script_goal_is_rejected() {
    let err = parse("import x from \"m\";", ParserConfig { source_type: SourceType::Script, ..Default::default() }).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}
