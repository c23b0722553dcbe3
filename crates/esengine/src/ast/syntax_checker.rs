//! The syntax-checker builder (spec §3.3, §4.3.1): allocates nothing, keeps
//! only a node's discriminant and, for identifiers, its name. Used for the
//! lazy first pass over a nested function body, which exists only to
//! discover its scope (spec §4.3.1: "this avoids retaining AST for unused
//! nested functions").

use crate::ast::builder::{ASTBuilder, NodeShape, NodeTag};
use crate::ast::node::{NodeId, NodeKind};
use crate::intern::StringId;
use crate::span::ExtendedNodeLoc;

/// What the syntax-checker keeps for a node: enough to answer "is this
/// handle an identifier, and if so what's its name" and "what shape is
/// this", and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxHandle {
    tag: NodeTag,
    name: Option<StringId>,
}

/// Placeholder used only to compute a `NodeTag` discriminant; its field
/// values are never read back, so a zeroed/default `NodeId` is always safe
/// to plug into children positions.
const DUMMY_CHILD: NodeId = NodeId(0);

#[derive(Debug, Default)]
pub struct SyntaxChecker;

impl ASTBuilder for SyntaxChecker {
    type Handle = SyntaxHandle;

    fn make(&mut self, shape: NodeShape<SyntaxHandle>, _at: ExtendedNodeLoc) -> SyntaxHandle {
        let name = match &shape {
            NodeShape::Identifier { name } => Some(*name),
            _ => None,
        };
        let tag = shape_tag(&shape);
        SyntaxHandle { tag, name }
    }

    fn identifier_name(&self, handle: SyntaxHandle) -> Option<StringId> {
        handle.name
    }

    fn discriminant(&self, handle: SyntaxHandle) -> NodeTag {
        handle.tag
    }
}

/// Maps a `NodeShape<SyntaxHandle>` to the `NodeTag` its fully-built
/// `NodeKind` counterpart would carry, without allocating the real node.
/// Every arm plugs `DUMMY_CHILD` into child positions since `discriminant`
/// never inspects field values.
#[expect(clippy::too_many_lines, reason = "one arm per AST node shape, mechanical")]
fn shape_tag(shape: &NodeShape<SyntaxHandle>) -> NodeTag {
    let d = DUMMY_CHILD;
    macro_rules! tag {
        ($kind:expr) => {
            std::mem::discriminant(&$kind)
        };
    }
    match shape {
        NodeShape::Program { is_module, .. } => tag!(NodeKind::Program { body: Default::default(), is_module: *is_module }),
        NodeShape::Identifier { name } => tag!(NodeKind::Identifier { name: *name }),
        NodeShape::PrivateIdentifier { name } => tag!(NodeKind::PrivateIdentifier { name: *name }),
        NodeShape::NumericLiteral { value } => tag!(NodeKind::NumericLiteral { value: *value }),
        NodeShape::BigIntLiteral { raw } => tag!(NodeKind::BigIntLiteral { raw: *raw }),
        NodeShape::StringLiteral { value } => tag!(NodeKind::StringLiteral { value: *value }),
        NodeShape::BooleanLiteral { value } => tag!(NodeKind::BooleanLiteral { value: *value }),
        NodeShape::NullLiteral => tag!(NodeKind::NullLiteral),
        NodeShape::RegExpLiteral { pattern, flags } => tag!(NodeKind::RegExpLiteral { pattern: *pattern, flags: *flags }),
        NodeShape::ThisExpression => tag!(NodeKind::ThisExpression),
        NodeShape::Super => tag!(NodeKind::Super),
        NodeShape::TemplateLiteral { .. } => {
            tag!(NodeKind::TemplateLiteral { quasis: Default::default(), expressions: Default::default() })
        }
        NodeShape::TemplateElement { cooked, raw, tail } => {
            tag!(NodeKind::TemplateElement { cooked: *cooked, raw: *raw, tail: *tail })
        }
        NodeShape::TaggedTemplateExpression { site_id, .. } => {
            tag!(NodeKind::TaggedTemplateExpression { tag: d, quasi: d, site_id: *site_id })
        }
        NodeShape::ArrayExpression { .. } => tag!(NodeKind::ArrayExpression { elements: Default::default() }),
        NodeShape::ObjectExpression { .. } => tag!(NodeKind::ObjectExpression { properties: Default::default() }),
        NodeShape::Property { computed, shorthand, kind, .. } => {
            tag!(NodeKind::Property { key: d, value: d, computed: *computed, shorthand: *shorthand, kind: *kind })
        }
        NodeShape::SpreadElement { .. } => tag!(NodeKind::SpreadElement { argument: d }),
        NodeShape::FunctionExpression { is_generator, is_async, .. } => tag!(NodeKind::FunctionExpression {
            id: None,
            params: Default::default(),
            body: d,
            is_generator: *is_generator,
            is_async: *is_async,
        }),
        NodeShape::ArrowFunctionExpression { is_expression_body, is_async, .. } => {
            tag!(NodeKind::ArrowFunctionExpression {
                params: Default::default(),
                body: d,
                is_expression_body: *is_expression_body,
                is_async: *is_async,
            })
        }
        NodeShape::ClassExpression { .. } => tag!(NodeKind::ClassExpression { id: None, super_class: None, body: d }),
        NodeShape::MemberExpression { computed, optional, .. } => {
            tag!(NodeKind::MemberExpression { object: d, property: d, computed: *computed, optional: *optional })
        }
        NodeShape::CallExpression { optional, .. } => {
            tag!(NodeKind::CallExpression { callee: d, arguments: Default::default(), optional: *optional })
        }
        NodeShape::NewExpression { .. } => tag!(NodeKind::NewExpression { callee: d, arguments: Default::default() }),
        NodeShape::SequenceExpression { .. } => tag!(NodeKind::SequenceExpression { expressions: Default::default() }),
        NodeShape::UnaryExpression { op, .. } => tag!(NodeKind::UnaryExpression { op: *op, argument: d }),
        NodeShape::UpdateExpression { op, prefix, .. } => {
            tag!(NodeKind::UpdateExpression { op: *op, argument: d, prefix: *prefix })
        }
        NodeShape::BinaryExpression { op, .. } => tag!(NodeKind::BinaryExpression { op: *op, left: d, right: d }),
        NodeShape::LogicalExpression { op, .. } => tag!(NodeKind::LogicalExpression { op: *op, left: d, right: d }),
        NodeShape::ConditionalExpression { .. } => {
            tag!(NodeKind::ConditionalExpression { test: d, consequent: d, alternate: d })
        }
        NodeShape::AssignmentExpression { op, .. } => tag!(NodeKind::AssignmentExpression { op: *op, left: d, right: d }),
        NodeShape::YieldExpression { delegate, .. } => tag!(NodeKind::YieldExpression { argument: None, delegate: *delegate }),
        NodeShape::AwaitExpression { .. } => tag!(NodeKind::AwaitExpression { argument: d }),
        NodeShape::ChainExpression { .. } => tag!(NodeKind::ChainExpression { expression: d }),
        NodeShape::ObjectPattern { .. } => tag!(NodeKind::ObjectPattern { properties: Default::default() }),
        NodeShape::ArrayPattern { .. } => tag!(NodeKind::ArrayPattern { elements: Default::default() }),
        NodeShape::RestElement { .. } => tag!(NodeKind::RestElement { argument: d }),
        NodeShape::AssignmentPattern { .. } => tag!(NodeKind::AssignmentPattern { left: d, right: d }),
        NodeShape::ExpressionStatement { .. } => tag!(NodeKind::ExpressionStatement { expression: d }),
        NodeShape::BlockStatement { block_index, .. } => {
            tag!(NodeKind::BlockStatement { body: Default::default(), block_index: *block_index })
        }
        NodeShape::EmptyStatement => tag!(NodeKind::EmptyStatement),
        NodeShape::ReturnStatement { .. } => tag!(NodeKind::ReturnStatement { argument: None }),
        NodeShape::LabeledStatement { label, .. } => tag!(NodeKind::LabeledStatement { label: *label, body: d }),
        NodeShape::BreakStatement { label } => tag!(NodeKind::BreakStatement { label: *label }),
        NodeShape::ContinueStatement { label } => tag!(NodeKind::ContinueStatement { label: *label }),
        NodeShape::IfStatement { .. } => tag!(NodeKind::IfStatement { test: d, consequent: d, alternate: None }),
        NodeShape::SwitchStatement { .. } => tag!(NodeKind::SwitchStatement { discriminant: d, cases: Default::default() }),
        NodeShape::SwitchCase { .. } => tag!(NodeKind::SwitchCase { test: None, consequent: Default::default() }),
        NodeShape::ThrowStatement { .. } => tag!(NodeKind::ThrowStatement { argument: d }),
        NodeShape::TryStatement { .. } => tag!(NodeKind::TryStatement { block: d, handler: None, finalizer: None }),
        NodeShape::CatchClause { .. } => tag!(NodeKind::CatchClause { param: None, body: d }),
        NodeShape::WhileStatement { .. } => tag!(NodeKind::WhileStatement { test: d, body: d }),
        NodeShape::DoWhileStatement { .. } => tag!(NodeKind::DoWhileStatement { body: d, test: d }),
        NodeShape::ForStatement { .. } => tag!(NodeKind::ForStatement { init: None, test: None, update: None, body: d }),
        NodeShape::ForInStatement { .. } => tag!(NodeKind::ForInStatement { left: d, right: d, body: d }),
        NodeShape::ForOfStatement { is_await, .. } => {
            tag!(NodeKind::ForOfStatement { left: d, right: d, body: d, is_await: *is_await })
        }
        NodeShape::FunctionDeclaration { is_generator, is_async, .. } => tag!(NodeKind::FunctionDeclaration {
            id: d,
            params: Default::default(),
            body: d,
            is_generator: *is_generator,
            is_async: *is_async,
        }),
        NodeShape::VariableDeclaration { kind, .. } => {
            tag!(NodeKind::VariableDeclaration { kind: *kind, declarations: Default::default() })
        }
        NodeShape::VariableDeclarator { .. } => tag!(NodeKind::VariableDeclarator { id: d, init: None }),
        NodeShape::ClassDeclaration { .. } => tag!(NodeKind::ClassDeclaration { id: d, super_class: None, body: d }),
        NodeShape::ClassBody { .. } => tag!(NodeKind::ClassBody { body: Default::default() }),
        NodeShape::MethodDefinition { kind, is_static, computed, .. } => tag!(NodeKind::MethodDefinition {
            key: d,
            value: d,
            kind: *kind,
            is_static: *is_static,
            computed: *computed,
        }),
        NodeShape::PropertyDefinition { is_static, computed, .. } => tag!(NodeKind::PropertyDefinition {
            key: d,
            value: None,
            is_static: *is_static,
            computed: *computed,
        }),
        NodeShape::ImportDeclaration { source, .. } => {
            tag!(NodeKind::ImportDeclaration { specifiers: Default::default(), source: *source })
        }
        NodeShape::ImportSpecifier { imported, local } => {
            tag!(NodeKind::ImportSpecifier { imported: *imported, local: *local })
        }
        NodeShape::ImportDefaultSpecifier { local } => tag!(NodeKind::ImportDefaultSpecifier { local: *local }),
        NodeShape::ImportNamespaceSpecifier { local } => tag!(NodeKind::ImportNamespaceSpecifier { local: *local }),
        NodeShape::ExportNamedDeclaration { source, .. } => tag!(NodeKind::ExportNamedDeclaration {
            declaration: None,
            specifiers: Default::default(),
            source: *source,
        }),
        NodeShape::ExportSpecifier { local, exported } => {
            tag!(NodeKind::ExportSpecifier { local: *local, exported: *exported })
        }
        NodeShape::ExportDefaultDeclaration { .. } => tag!(NodeKind::ExportDefaultDeclaration { declaration: d }),
        NodeShape::ExportAllDeclaration { exported, source } => {
            tag!(NodeKind::ExportAllDeclaration { exported: *exported, source: *source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_name_survives_without_allocation() {
        let mut checker = SyntaxChecker;
        let at = ExtendedNodeLoc::new(1, 1, 0);
        let name = StringId::from(3);
        let h = checker.make(NodeShape::Identifier { name }, at);
        assert_eq!(checker.identifier_name(h), Some(name));
    }

    #[test]
    fn distinct_shapes_get_distinct_tags() {
        let mut checker = SyntaxChecker;
        let at = ExtendedNodeLoc::new(1, 1, 0);
        let a = checker.make(NodeShape::NullLiteral, at);
        let b = checker.make(NodeShape::ThisExpression, at);
        assert_ne!(checker.discriminant(a), checker.discriminant(b));
    }
}
