//! Diagnostic model (spec §7).
//!
//! Grounded on the teacher's `ParseError` (`parse.rs`): a flat enum carrying
//! a message and a position, propagated as a plain `Result` rather than
//! through `thiserror`/`anyhow` (the teacher uses neither). Unlike the
//! teacher, which only ever raises one kind of error from its parser, this
//! core's error kind is a closed set mirrored 1:1 on spec §7's six
//! ECMAScript error constructors, since downstream bytecode emission and
//! execution need to tell them apart.

use std::fmt;

use crate::span::ExtendedNodeLoc;

/// Closed set of ECMAScript error kinds a parse/scan/emission failure can
/// report as (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    SyntaxError,
    ReferenceError,
    TypeError,
    RangeError,
    UriError,
    EvalError,
}

impl ErrorKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SyntaxError => "SyntaxError",
            Self::ReferenceError => "ReferenceError",
            Self::TypeError => "TypeError",
            Self::RangeError => "RangeError",
            Self::UriError => "URIError",
            Self::EvalError => "EvalError",
        }
    }
}

/// A single thrown diagnostic. All parser/scanner/bytecode-container errors
/// propagate as this uniform type, unwinding the parse (spec §7:
/// "Propagation policy").
///
/// `message` is already substituted (up to two `%s` arguments, per spec
/// §4.3.6); `description` is an optional longer explanation shown
/// alongside the message (mirrors the teacher's `NotImplemented`/
/// `NotSupported` variants carrying a human-facing note distinct from the
/// short message).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub description: Option<String>,
    pub at: ExtendedNodeLoc,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, at: ExtendedNodeLoc) -> Self {
        Self {
            kind,
            message: message.into(),
            description: None,
            at,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A template message with up to two `%s` substitutions, matching spec
    /// §4.3.6's "Messages are template strings with up to two `%s`
    /// substitutions."
    #[must_use]
    pub fn templated(kind: ErrorKind, template: &str, args: &[&str], at: ExtendedNodeLoc) -> Self {
        let mut message = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '%' && chars.peek() == Some(&'s') {
                chars.next();
                if let Some(arg) = args.next() {
                    message.push_str(arg);
                    continue;
                }
            }
            message.push(c);
        }
        Self::new(kind, message, at)
    }

    #[must_use]
    pub fn syntax(message: impl Into<String>, at: ExtendedNodeLoc) -> Self {
        Self::new(ErrorKind::SyntaxError, message, at)
    }

    #[must_use]
    pub fn range(message: impl Into<String>, at: ExtendedNodeLoc) -> Self {
        Self::new(ErrorKind::RangeError, message, at)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}:{})",
            self.kind.name(),
            self.message,
            self.at.line,
            self.at.column
        )
    }
}

impl std::error::Error for Diagnostic {}

pub type ParseResult<T> = Result<T, Diagnostic>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templated_substitutes_in_order() {
        let d = Diagnostic::templated(
            ErrorKind::SyntaxError,
            "Identifier '%s' has already been declared in '%s'",
            &["x", "block"],
            ExtendedNodeLoc::new(1, 1, 0),
        );
        assert_eq!(d.message, "Identifier 'x' has already been declared in 'block'");
    }

    #[test]
    fn display_includes_position() {
        let d = Diagnostic::syntax("Unexpected token", ExtendedNodeLoc::new(3, 7, 40));
        assert_eq!(d.to_string(), "SyntaxError: Unexpected token (3:7)");
    }
}
