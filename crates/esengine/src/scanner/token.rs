//! Token representation (spec §4.2.2).
//!
//! Grounded on `Lexer.h`'s `ScannerResult`: a packed record with a
//! precomputed binary-operator precedence (`prec`) so the parser's
//! precedence-climbing loop never recomputes it, and an
//! `is_*`-flag-carrying payload per kind rather than a second enum layer.
//! Unlike `Lexer.h`'s `SmallScannerResult` (a slimmer struct used only for
//! single-token lookahead buffers), this crate's `Scanner` keeps exactly one
//! buffered lookahead token (spec §4.2.3: "one-token lookahead"), so a
//! single `Token` type suffices — kept here as `Token` with `SmallToken`
//! as its narrower lookahead-only alias for documentation purposes.

use crate::intern::StringId;
use crate::span::ExtendedNodeLoc;

use super::keywords::Keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    DotDotDot,
    Semicolon,
    Comma,
    QuestionMark,
    QuestionDot,
    QuestionQuestion,
    Colon,
    Arrow,
    Not,
    BitNot,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    StarStarAssign,
    SlashAssign,
    PercentAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    UnsignedShiftRightAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    QuestionQuestionAssign,
    Hash,
    At,
}

impl Punctuator {
    /// Precomputed binary-operator precedence, the way `Lexer.h`'s
    /// `ScannerResult` precomputes `prec`. Higher binds tighter.
    /// `None` for punctuators that aren't binary operators.
    #[must_use]
    pub const fn binary_precedence(self) -> Option<u8> {
        Some(match self {
            Self::Or | Self::QuestionQuestion => 1,
            Self::And => 2,
            Self::BitOr => 3,
            Self::BitXor => 4,
            Self::BitAnd => 5,
            Self::Eq | Self::NotEq | Self::StrictEq | Self::StrictNotEq => 6,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 7,
            Self::ShiftLeft | Self::ShiftRight | Self::UnsignedShiftRight => 8,
            Self::Plus | Self::Minus => 9,
            Self::Star | Self::Slash | Self::Percent => 10,
            Self::StarStar => 11,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::PlusAssign
                | Self::MinusAssign
                | Self::StarAssign
                | Self::StarStarAssign
                | Self::SlashAssign
                | Self::PercentAssign
                | Self::ShiftLeftAssign
                | Self::ShiftRightAssign
                | Self::UnsignedShiftRightAssign
                | Self::BitAndAssign
                | Self::BitOrAssign
                | Self::BitXorAssign
                | Self::AndAssign
                | Self::OrAssign
                | Self::QuestionQuestionAssign
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericLiteralPayload {
    pub start_with_zero: bool,
    pub has_number_separator: bool,
    pub is_bigint: bool,
    /// The value span still needs decoding; spec §4.2.2 allows "a deferred
    /// raw span (delayed strtod)". `value` is filled in eagerly here since
    /// this crate doesn't implement lazy double parsing, but the flags that
    /// drive downstream validation (legacy octal / numeric separators /
    /// BigInt suffix) are preserved regardless.
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatePayload {
    pub cooked: Option<StringId>,
    pub raw: StringId,
    pub head: bool,
    pub tail: bool,
    /// A deferred syntax error recorded during scanning (bad `\x`/`\u`
    /// escape, octal in a template) — spec §4.2.2 and §7's "Recovery": only
    /// raised if the template is not ultimately used as a tagged template.
    pub deferred_error: Option<StringId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegExpPayload {
    pub pattern: StringId,
    pub flags: StringId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenPayload {
    None,
    Identifier { name: StringId, has_allocated_string: bool },
    Keyword { primary: Keyword },
    Boolean(bool),
    Numeric(NumericLiteralPayload),
    StringLit { value: StringId },
    Template(TemplatePayload),
    RegExp(RegExpPayload),
    Punctuator(Punctuator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Identifier,
    BooleanLiteral,
    Keyword,
    NullLiteral,
    NumericLiteral,
    Punctuator,
    StringLiteral,
    RegularExpression,
    Template,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: (u32, u32),
    pub loc: ExtendedNodeLoc,
    /// Set iff a `LineTerminator` lay between the previous token's end and
    /// this token's start (spec §4.2.3, drives ASI).
    pub has_line_terminator_before: bool,
    pub payload: TokenPayload,
}

impl Token {
    #[must_use]
    pub const fn eof(loc: ExtendedNodeLoc, has_line_terminator_before: bool) -> Self {
        Self {
            kind: TokenKind::Eof,
            range: (loc.index, loc.index),
            loc,
            has_line_terminator_before,
            payload: TokenPayload::None,
        }
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    #[must_use]
    pub fn as_punctuator(&self) -> Option<Punctuator> {
        match self.payload {
            TokenPayload::Punctuator(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_keyword(&self) -> Option<Keyword> {
        match self.payload {
            TokenPayload::Keyword { primary, .. } => Some(primary),
            _ => None,
        }
    }

    #[must_use]
    pub fn identifier_name(&self) -> Option<StringId> {
        match self.payload {
            TokenPayload::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }
}
