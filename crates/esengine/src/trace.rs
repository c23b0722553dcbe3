//! Parse-time tracing infrastructure.
//!
//! Grounded on the teacher's `tracer.rs`: a trait-based hook system with a
//! zero-cost `NoopTracer` that monomorphizes away entirely, instead of a
//! logging crate. The scanner and parser are generic over `Tr: ParseTracer`
//! so production parses pay nothing for observability while tests and
//! tooling can swap in `RecordingTracer` to assert on the event sequence.

use crate::span::ExtendedNodeLoc;

/// Trace event emitted during scanning/parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A token was produced by the scanner.
    Token { kind: &'static str, at: ExtendedNodeLoc },
    /// A function scope was entered.
    EnterFunctionScope { name: Option<String> },
    /// A function scope was exited.
    ExitFunctionScope,
    /// A block scope was entered.
    EnterBlock { index: u16 },
    /// A block scope was collapsed into its parent (spec §3.4).
    CollapseBlock { index: u16 },
    /// A diagnostic was raised.
    Diagnostic { kind: &'static str, message: String },
}

/// Hook points a parse can report through. `NoopTracer` implements every
/// method as an empty inlined body so it compiles away under
/// monomorphization, exactly like the teacher's `NoopTracer` for
/// `VmTracer`.
pub trait ParseTracer {
    fn on_token(&mut self, _kind: &'static str, _at: ExtendedNodeLoc) {}
    fn on_enter_function_scope(&mut self, _name: Option<&str>) {}
    fn on_exit_function_scope(&mut self) {}
    fn on_enter_block(&mut self, _index: u16) {}
    fn on_collapse_block(&mut self, _index: u16) {}
    fn on_diagnostic(&mut self, _kind: &'static str, _message: &str) {}
}

/// Production default: every hook is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl ParseTracer for NoopTracer {}

/// Human-readable trace to stderr, for interactive debugging.
#[derive(Debug, Default)]
pub struct StderrTracer;

impl ParseTracer for StderrTracer {
    fn on_token(&mut self, kind: &'static str, at: ExtendedNodeLoc) {
        eprintln!("token {kind} @ {}:{}", at.line, at.column);
    }

    fn on_enter_function_scope(&mut self, name: Option<&str>) {
        eprintln!("enter function scope {}", name.unwrap_or("<anonymous>"));
    }

    fn on_exit_function_scope(&mut self) {
        eprintln!("exit function scope");
    }

    fn on_enter_block(&mut self, index: u16) {
        eprintln!("enter block {index}");
    }

    fn on_collapse_block(&mut self, index: u16) {
        eprintln!("collapse block {index}");
    }

    fn on_diagnostic(&mut self, kind: &'static str, message: &str) {
        eprintln!("{kind}: {message}");
    }
}

/// Captures the full event sequence, for tests and post-mortem tooling.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    pub events: Vec<TraceEvent>,
}

impl ParseTracer for RecordingTracer {
    fn on_token(&mut self, kind: &'static str, at: ExtendedNodeLoc) {
        self.events.push(TraceEvent::Token { kind, at });
    }

    fn on_enter_function_scope(&mut self, name: Option<&str>) {
        self.events.push(TraceEvent::EnterFunctionScope {
            name: name.map(str::to_owned),
        });
    }

    fn on_exit_function_scope(&mut self) {
        self.events.push(TraceEvent::ExitFunctionScope);
    }

    fn on_enter_block(&mut self, index: u16) {
        self.events.push(TraceEvent::EnterBlock { index });
    }

    fn on_collapse_block(&mut self, index: u16) {
        self.events.push(TraceEvent::CollapseBlock { index });
    }

    fn on_diagnostic(&mut self, kind: &'static str, message: &str) {
        self.events.push(TraceEvent::Diagnostic {
            kind,
            message: message.to_owned(),
        });
    }
}
