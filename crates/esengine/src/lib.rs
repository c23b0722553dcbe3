#![doc = include_str!("../README.md")]
#![expect(dead_code, reason = "container types are consumed by an external emitter/interpreter")]
#![expect(clippy::too_many_arguments, reason = "parser productions mirror the grammar's arity")]
#![expect(clippy::struct_excessive_bools, reason = "parser context mirrors the spec's many independent flags")]
#![expect(clippy::cast_possible_truncation, reason = "source offsets are checked against MAX_SOURCE_LEN before narrowing")]

mod ast;
mod bytecode;
mod errors;
mod intern;
mod module_record;
mod parser;
mod scanner;
mod scope;
mod span;
mod trace;
mod value;

pub use crate::{
    ast::{
        AssignmentOp, BinaryOp, LogicalOp, MethodKind, Node, NodeArena, NodeId, NodeKind, NodeList, PropertyKind,
        UnaryOp, UpdateOp, VariableKind,
    },
    bytecode::{
        ByteCodeBlock, CodeBuilder, CodeBlockId, GetObjectInlineCache, InlineCacheSite, Opcode, SetObjectInlineCache,
        Shape, ShapeId, ShapeTable,
    },
    errors::{Diagnostic, ErrorKind},
    intern::{Interner, StringId},
    module_record::{ExportEntry, ImportEntry, ModuleRecord},
    parser::{ParseOutput, Parser, ParserConfig, ParserFlags, SourceType, parse},
    scanner::{Keyword, Scanner, Token, TokenKind},
    scope::{BlockIndex, FunctionScopeContext, ScopeTree, VarKind},
    span::{ExtendedNodeLoc, SourcePosition},
    trace::{NoopTracer, ParseTracer, RecordingTracer, StderrTracer, TraceEvent},
    value::{HeapTag, PackedSlot, Value},
};
