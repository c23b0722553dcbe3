//! The AST (spec §3.3) and its dual-builder machinery (spec §4.3.1).

mod builder;
mod node;
mod syntax_checker;

pub use builder::{ASTBuilder, NodeBuilder, NodeShape, NodeTag};
pub use node::{
    AssignmentOp, BinaryOp, LogicalOp, MethodKind, Node, NodeArena, NodeId, NodeKind, NodeList, PropertyKind,
    UnaryOp, UpdateOp, VariableKind,
};
pub use syntax_checker::{SyntaxChecker, SyntaxHandle};
