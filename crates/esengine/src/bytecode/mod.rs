//! The bytecode container and inline-cache shapes (spec §3.5, §3.6, §4.4,
//! component C4).
//!
//! Grounded on the teacher's `bytecode/mod.rs` (a thin re-export module over
//! `code`/`builder`/`vm`) and `bytecode/builder.rs` (emission helpers that
//! track a fix-up list and finalize jumps). The actual opcode dispatch loop
//! is out of scope (spec §1); this crate only owns the container contract
//! an external emitter/interpreter must honor.

mod code;
mod inline_cache;
mod opcode;
mod shape;

pub use code::{ByteCodeBlock, CodeBlockId, CodeBuilder, LocEntry};
pub use inline_cache::{GetObjectInlineCache, InlineCacheSite, SetObjectInlineCache};
pub use opcode::Opcode;
pub use shape::{Shape, ShapeId, ShapeTable};
