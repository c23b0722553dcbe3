//! Dual AST builder (spec §4.3.1: "the parser is generic over an
//! `ASTBuilder`... a *node-generator* that allocates real AST nodes, and a
//! *syntax-checker* that allocates nothing and merely validates").
//!
//! `NodeShape<H>` mirrors `NodeKind` one-for-one but leaves the child
//! representation as a type parameter `H`. `Parser<Tr, B>` builds every
//! production through `NodeShape<B::Handle>` and hands it to `B::make`;
//! `NodeBuilder` turns that into a real arena-allocated `NodeKind`,
//! `SyntaxChecker` only inspects the variant tag (via `mem::discriminant`)
//! and, for identifiers, the name — nothing is allocated.

use std::mem::Discriminant;

use crate::ast::node::{
    AssignmentOp, BinaryOp, LogicalOp, MethodKind, NodeArena, NodeId, NodeKind, PropertyKind, UnaryOp, UpdateOp,
    VariableKind,
};
use crate::intern::StringId;
use crate::scope::BlockIndex;
use crate::span::ExtendedNodeLoc;

/// `NodeKind`'s shape, generic over how children are referenced. Every
/// variant here corresponds 1:1 to a `NodeKind` variant.
pub enum NodeShape<H> {
    Program { body: Vec<H>, is_module: bool },
    Identifier { name: StringId },
    PrivateIdentifier { name: StringId },
    NumericLiteral { value: f64 },
    BigIntLiteral { raw: StringId },
    StringLiteral { value: StringId },
    BooleanLiteral { value: bool },
    NullLiteral,
    RegExpLiteral { pattern: StringId, flags: StringId },
    ThisExpression,
    Super,
    TemplateLiteral { quasis: Vec<H>, expressions: Vec<H> },
    TemplateElement { cooked: Option<StringId>, raw: StringId, tail: bool },
    TaggedTemplateExpression { tag: H, quasi: H, site_id: u32 },
    ArrayExpression { elements: Vec<H> },
    ObjectExpression { properties: Vec<H> },
    Property { key: H, value: H, computed: bool, shorthand: bool, kind: PropertyKind },
    SpreadElement { argument: H },
    FunctionExpression { id: Option<H>, params: Vec<H>, body: H, is_generator: bool, is_async: bool },
    ArrowFunctionExpression { params: Vec<H>, body: H, is_expression_body: bool, is_async: bool },
    ClassExpression { id: Option<H>, super_class: Option<H>, body: H },
    MemberExpression { object: H, property: H, computed: bool, optional: bool },
    CallExpression { callee: H, arguments: Vec<H>, optional: bool },
    NewExpression { callee: H, arguments: Vec<H> },
    SequenceExpression { expressions: Vec<H> },
    UnaryExpression { op: UnaryOp, argument: H },
    UpdateExpression { op: UpdateOp, argument: H, prefix: bool },
    BinaryExpression { op: BinaryOp, left: H, right: H },
    LogicalExpression { op: LogicalOp, left: H, right: H },
    ConditionalExpression { test: H, consequent: H, alternate: H },
    AssignmentExpression { op: AssignmentOp, left: H, right: H },
    YieldExpression { argument: Option<H>, delegate: bool },
    AwaitExpression { argument: H },
    ChainExpression { expression: H },
    ObjectPattern { properties: Vec<H> },
    ArrayPattern { elements: Vec<H> },
    RestElement { argument: H },
    AssignmentPattern { left: H, right: H },
    ExpressionStatement { expression: H },
    BlockStatement { body: Vec<H>, block_index: BlockIndex },
    EmptyStatement,
    ReturnStatement { argument: Option<H> },
    LabeledStatement { label: StringId, body: H },
    BreakStatement { label: Option<StringId> },
    ContinueStatement { label: Option<StringId> },
    IfStatement { test: H, consequent: H, alternate: Option<H> },
    SwitchStatement { discriminant: H, cases: Vec<H> },
    SwitchCase { test: Option<H>, consequent: Vec<H> },
    ThrowStatement { argument: H },
    TryStatement { block: H, handler: Option<H>, finalizer: Option<H> },
    CatchClause { param: Option<H>, body: H },
    WhileStatement { test: H, body: H },
    DoWhileStatement { body: H, test: H },
    ForStatement { init: Option<H>, test: Option<H>, update: Option<H>, body: H },
    ForInStatement { left: H, right: H, body: H },
    ForOfStatement { left: H, right: H, body: H, is_await: bool },
    FunctionDeclaration { id: H, params: Vec<H>, body: H, is_generator: bool, is_async: bool },
    VariableDeclaration { kind: VariableKind, declarations: Vec<H> },
    VariableDeclarator { id: H, init: Option<H> },
    ClassDeclaration { id: H, super_class: Option<H>, body: H },
    ClassBody { body: Vec<H> },
    MethodDefinition { key: H, value: H, kind: MethodKind, is_static: bool, computed: bool },
    PropertyDefinition { key: H, value: Option<H>, is_static: bool, computed: bool },
    ImportDeclaration { specifiers: Vec<H>, source: StringId },
    ImportSpecifier { imported: StringId, local: StringId },
    ImportDefaultSpecifier { local: StringId },
    ImportNamespaceSpecifier { local: StringId },
    ExportNamedDeclaration { declaration: Option<H>, specifiers: Vec<H>, source: Option<StringId> },
    ExportSpecifier { local: StringId, exported: StringId },
    ExportDefaultDeclaration { declaration: H },
    ExportAllDeclaration { exported: Option<StringId>, source: StringId },
}

/// A builder the parser is generic over (spec §4.3.1).
pub trait ASTBuilder {
    type Handle: Copy;

    fn make(&mut self, shape: NodeShape<Self::Handle>, at: ExtendedNodeLoc) -> Self::Handle;
    fn identifier_name(&self, handle: Self::Handle) -> Option<StringId>;
    /// Discriminant of the node a handle refers to; used by cover-grammar
    /// reinterpretation to decide whether a subtree is already pattern-shaped.
    fn discriminant(&self, handle: Self::Handle) -> NodeTag;
}

/// Cheap, payload-free node-kind tag, used by cover-grammar reinterpretation
/// to ask "is this handle an `ArrayExpression`?" without matching on the
/// full shape.
pub type NodeTag = Discriminant<NodeKind>;

fn tag_of(kind: &NodeKind) -> NodeTag {
    std::mem::discriminant(kind)
}

/// Node-generator: allocates real nodes into a `NodeArena`.
pub struct NodeBuilder<'a> {
    pub arena: &'a mut NodeArena,
}

impl<'a> NodeBuilder<'a> {
    #[must_use]
    pub fn new(arena: &'a mut NodeArena) -> Self {
        Self { arena }
    }
}

impl ASTBuilder for NodeBuilder<'_> {
    type Handle = NodeId;

    #[expect(clippy::too_many_lines, reason = "one arm per AST node shape, mechanical")]
    fn make(&mut self, shape: NodeShape<NodeId>, at: ExtendedNodeLoc) -> NodeId {
        let kind = match shape {
            NodeShape::Program { body, is_module } => NodeKind::Program {
                body: self.arena.push_list(body),
                is_module,
            },
            NodeShape::Identifier { name } => NodeKind::Identifier { name },
            NodeShape::PrivateIdentifier { name } => NodeKind::PrivateIdentifier { name },
            NodeShape::NumericLiteral { value } => NodeKind::NumericLiteral { value },
            NodeShape::BigIntLiteral { raw } => NodeKind::BigIntLiteral { raw },
            NodeShape::StringLiteral { value } => NodeKind::StringLiteral { value },
            NodeShape::BooleanLiteral { value } => NodeKind::BooleanLiteral { value },
            NodeShape::NullLiteral => NodeKind::NullLiteral,
            NodeShape::RegExpLiteral { pattern, flags } => NodeKind::RegExpLiteral { pattern, flags },
            NodeShape::ThisExpression => NodeKind::ThisExpression,
            NodeShape::Super => NodeKind::Super,
            NodeShape::TemplateLiteral { quasis, expressions } => NodeKind::TemplateLiteral {
                quasis: self.arena.push_list(quasis),
                expressions: self.arena.push_list(expressions),
            },
            NodeShape::TemplateElement { cooked, raw, tail } => NodeKind::TemplateElement { cooked, raw, tail },
            NodeShape::TaggedTemplateExpression { tag, quasi, site_id } => {
                NodeKind::TaggedTemplateExpression { tag, quasi, site_id }
            }
            NodeShape::ArrayExpression { elements } => NodeKind::ArrayExpression {
                elements: self.arena.push_list(elements),
            },
            NodeShape::ObjectExpression { properties } => NodeKind::ObjectExpression {
                properties: self.arena.push_list(properties),
            },
            NodeShape::Property { key, value, computed, shorthand, kind } => NodeKind::Property {
                key,
                value,
                computed,
                shorthand,
                kind,
            },
            NodeShape::SpreadElement { argument } => NodeKind::SpreadElement { argument },
            NodeShape::FunctionExpression { id, params, body, is_generator, is_async } => {
                NodeKind::FunctionExpression {
                    id,
                    params: self.arena.push_list(params),
                    body,
                    is_generator,
                    is_async,
                }
            }
            NodeShape::ArrowFunctionExpression { params, body, is_expression_body, is_async } => {
                NodeKind::ArrowFunctionExpression {
                    params: self.arena.push_list(params),
                    body,
                    is_expression_body,
                    is_async,
                }
            }
            NodeShape::ClassExpression { id, super_class, body } => NodeKind::ClassExpression { id, super_class, body },
            NodeShape::MemberExpression { object, property, computed, optional } => NodeKind::MemberExpression {
                object,
                property,
                computed,
                optional,
            },
            NodeShape::CallExpression { callee, arguments, optional } => NodeKind::CallExpression {
                callee,
                arguments: self.arena.push_list(arguments),
                optional,
            },
            NodeShape::NewExpression { callee, arguments } => NodeKind::NewExpression {
                callee,
                arguments: self.arena.push_list(arguments),
            },
            NodeShape::SequenceExpression { expressions } => NodeKind::SequenceExpression {
                expressions: self.arena.push_list(expressions),
            },
            NodeShape::UnaryExpression { op, argument } => NodeKind::UnaryExpression { op, argument },
            NodeShape::UpdateExpression { op, argument, prefix } => NodeKind::UpdateExpression { op, argument, prefix },
            NodeShape::BinaryExpression { op, left, right } => NodeKind::BinaryExpression { op, left, right },
            NodeShape::LogicalExpression { op, left, right } => NodeKind::LogicalExpression { op, left, right },
            NodeShape::ConditionalExpression { test, consequent, alternate } => NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            },
            NodeShape::AssignmentExpression { op, left, right } => NodeKind::AssignmentExpression { op, left, right },
            NodeShape::YieldExpression { argument, delegate } => NodeKind::YieldExpression { argument, delegate },
            NodeShape::AwaitExpression { argument } => NodeKind::AwaitExpression { argument },
            NodeShape::ChainExpression { expression } => NodeKind::ChainExpression { expression },
            NodeShape::ObjectPattern { properties } => NodeKind::ObjectPattern {
                properties: self.arena.push_list(properties),
            },
            NodeShape::ArrayPattern { elements } => NodeKind::ArrayPattern {
                elements: self.arena.push_list(elements),
            },
            NodeShape::RestElement { argument } => NodeKind::RestElement { argument },
            NodeShape::AssignmentPattern { left, right } => NodeKind::AssignmentPattern { left, right },
            NodeShape::ExpressionStatement { expression } => NodeKind::ExpressionStatement { expression },
            NodeShape::BlockStatement { body, block_index } => NodeKind::BlockStatement {
                body: self.arena.push_list(body),
                block_index,
            },
            NodeShape::EmptyStatement => NodeKind::EmptyStatement,
            NodeShape::ReturnStatement { argument } => NodeKind::ReturnStatement { argument },
            NodeShape::LabeledStatement { label, body } => NodeKind::LabeledStatement { label, body },
            NodeShape::BreakStatement { label } => NodeKind::BreakStatement { label },
            NodeShape::ContinueStatement { label } => NodeKind::ContinueStatement { label },
            NodeShape::IfStatement { test, consequent, alternate } => NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            },
            NodeShape::SwitchStatement { discriminant, cases } => NodeKind::SwitchStatement {
                discriminant,
                cases: self.arena.push_list(cases),
            },
            NodeShape::SwitchCase { test, consequent } => NodeKind::SwitchCase {
                test,
                consequent: self.arena.push_list(consequent),
            },
            NodeShape::ThrowStatement { argument } => NodeKind::ThrowStatement { argument },
            NodeShape::TryStatement { block, handler, finalizer } => NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            },
            NodeShape::CatchClause { param, body } => NodeKind::CatchClause { param, body },
            NodeShape::WhileStatement { test, body } => NodeKind::WhileStatement { test, body },
            NodeShape::DoWhileStatement { body, test } => NodeKind::DoWhileStatement { body, test },
            NodeShape::ForStatement { init, test, update, body } => NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            },
            NodeShape::ForInStatement { left, right, body } => NodeKind::ForInStatement { left, right, body },
            NodeShape::ForOfStatement { left, right, body, is_await } => NodeKind::ForOfStatement {
                left,
                right,
                body,
                is_await,
            },
            NodeShape::FunctionDeclaration { id, params, body, is_generator, is_async } => {
                NodeKind::FunctionDeclaration {
                    id,
                    params: self.arena.push_list(params),
                    body,
                    is_generator,
                    is_async,
                }
            }
            NodeShape::VariableDeclaration { kind, declarations } => NodeKind::VariableDeclaration {
                kind,
                declarations: self.arena.push_list(declarations),
            },
            NodeShape::VariableDeclarator { id, init } => NodeKind::VariableDeclarator { id, init },
            NodeShape::ClassDeclaration { id, super_class, body } => NodeKind::ClassDeclaration { id, super_class, body },
            NodeShape::ClassBody { body } => NodeKind::ClassBody {
                body: self.arena.push_list(body),
            },
            NodeShape::MethodDefinition { key, value, kind, is_static, computed } => NodeKind::MethodDefinition {
                key,
                value,
                kind,
                is_static,
                computed,
            },
            NodeShape::PropertyDefinition { key, value, is_static, computed } => NodeKind::PropertyDefinition {
                key,
                value,
                is_static,
                computed,
            },
            NodeShape::ImportDeclaration { specifiers, source } => NodeKind::ImportDeclaration {
                specifiers: self.arena.push_list(specifiers),
                source,
            },
            NodeShape::ImportSpecifier { imported, local } => NodeKind::ImportSpecifier { imported, local },
            NodeShape::ImportDefaultSpecifier { local } => NodeKind::ImportDefaultSpecifier { local },
            NodeShape::ImportNamespaceSpecifier { local } => NodeKind::ImportNamespaceSpecifier { local },
            NodeShape::ExportNamedDeclaration { declaration, specifiers, source } => NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers: self.arena.push_list(specifiers),
                source,
            },
            NodeShape::ExportSpecifier { local, exported } => NodeKind::ExportSpecifier { local, exported },
            NodeShape::ExportDefaultDeclaration { declaration } => NodeKind::ExportDefaultDeclaration { declaration },
            NodeShape::ExportAllDeclaration { exported, source } => NodeKind::ExportAllDeclaration { exported, source },
        };
        self.arena.push(kind, at)
    }

    fn identifier_name(&self, handle: NodeId) -> Option<StringId> {
        match self.arena.get(handle).kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    fn discriminant(&self, handle: NodeId) -> NodeTag {
        tag_of(&self.arena.get(handle).kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_expression_round_trips_through_builder() {
        let mut arena = NodeArena::new();
        let at = ExtendedNodeLoc::new(1, 1, 0);
        let mut b = NodeBuilder::new(&mut arena);
        let one = b.make(NodeShape::NumericLiteral { value: 1.0 }, at);
        let two = b.make(NodeShape::NumericLiteral { value: 2.0 }, at);
        let sum = b.make(
            NodeShape::BinaryExpression { op: BinaryOp::Add, left: one, right: two },
            at,
        );
        match arena.get(sum).kind {
            NodeKind::BinaryExpression { op: BinaryOp::Add, .. } => {}
            _ => panic!("expected BinaryExpression"),
        }
    }

    #[test]
    fn identifier_name_is_recoverable() {
        let mut arena = NodeArena::new();
        let at = ExtendedNodeLoc::new(1, 1, 0);
        let mut b = NodeBuilder::new(&mut arena);
        let name = StringId::from(7);
        let id = b.make(NodeShape::Identifier { name }, at);
        assert_eq!(b.identifier_name(id), Some(name));
    }
}
