//! Keyword table (spec §4.2.2: "Keyword: the keyword kind (over 40 values)").
//!
//! Grounded on `examples/original_source/src/parser/Lexer.h`'s `KeywordKind`
//! enum and `convertToKeywordInStrictMode`: some identifiers (`let`,
//! `static`, `implements`, `interface`, `package`, `private`, `protected`,
//! `public`) are plain identifiers in sloppy mode but become keywords once
//! the parser enters strict mode (spec §4.3.4). The scanner applies this
//! directly: `Scanner::strict_mode` gates whether a strict-reserved word
//! lexes as `TokenKind::Keyword` or falls through to an ordinary
//! `TokenKind::Identifier`. `yield` is the one exception: its reservedness
//! tracks generator-body context rather than strictness, so it is always
//! lexed as a keyword and reinterpreted at identifier sites in the parser.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    InstanceOf,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,
    Yield,
    // Strict-mode-only reserved words.
    Let,
    Static,
    Implements,
    Interface,
    Package,
    Private,
    Protected,
    Public,
}

impl Keyword {
    /// Future-reserved in every mode (spec §4.2.2's "over 40 values";
    /// grounded on `Lexer.h`'s `isFutureReservedWord`).
    #[must_use]
    pub const fn is_future_reserved_word(self) -> bool {
        matches!(self, Self::Enum)
    }

    /// Reserved only once the scanner/parser is in strict mode (Lexer.h's
    /// `isStrictModeReservedWord`).
    #[must_use]
    pub const fn is_strict_mode_reserved_word(self) -> bool {
        matches!(
            self,
            Self::Let
                | Self::Static
                | Self::Implements
                | Self::Interface
                | Self::Package
                | Self::Private
                | Self::Protected
                | Self::Public
                | Self::Yield
        )
    }

    /// `eval`/`arguments` aren't keywords but can't be bound or assigned to
    /// in strict mode (Lexer.h's `isRestrictedWord`); exposed from the
    /// interner's well-known table instead, kept here only as a doc pointer.
    #[must_use]
    pub const fn is_restricted_word(name: &str) -> bool {
        matches!(name.as_bytes(), b"eval" | b"arguments")
    }
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("await", Keyword::Await),
    ("break", Keyword::Break),
    ("case", Keyword::Case),
    ("catch", Keyword::Catch),
    ("class", Keyword::Class),
    ("const", Keyword::Const),
    ("continue", Keyword::Continue),
    ("debugger", Keyword::Debugger),
    ("default", Keyword::Default),
    ("delete", Keyword::Delete),
    ("do", Keyword::Do),
    ("else", Keyword::Else),
    ("enum", Keyword::Enum),
    ("export", Keyword::Export),
    ("extends", Keyword::Extends),
    ("false", Keyword::False),
    ("finally", Keyword::Finally),
    ("for", Keyword::For),
    ("function", Keyword::Function),
    ("if", Keyword::If),
    ("import", Keyword::Import),
    ("in", Keyword::In),
    ("instanceof", Keyword::InstanceOf),
    ("new", Keyword::New),
    ("null", Keyword::Null),
    ("return", Keyword::Return),
    ("super", Keyword::Super),
    ("switch", Keyword::Switch),
    ("this", Keyword::This),
    ("throw", Keyword::Throw),
    ("true", Keyword::True),
    ("try", Keyword::Try),
    ("typeof", Keyword::TypeOf),
    ("var", Keyword::Var),
    ("void", Keyword::Void),
    ("while", Keyword::While),
    ("with", Keyword::With),
    ("yield", Keyword::Yield),
    ("let", Keyword::Let),
    ("static", Keyword::Static),
    ("implements", Keyword::Implements),
    ("interface", Keyword::Interface),
    ("package", Keyword::Package),
    ("private", Keyword::Private),
    ("protected", Keyword::Protected),
    ("public", Keyword::Public),
];

/// Every table entry is looked up unconditionally; the caller decides (via
/// `Keyword::is_strict_mode_reserved_word` and `Scanner::strict_mode`)
/// whether a strict-reserved word actually lexes as a keyword or falls
/// through to a plain identifier in the current mode.
#[must_use]
pub fn lookup(text: &str) -> Option<Keyword> {
    KEYWORDS.iter().find(|(s, _)| *s == text).map(|(_, k)| *k)
}

/// Reverse of [`lookup`], used when a keyword token is reinterpreted as a
/// plain property name (`obj.class`, `obj.this`).
#[must_use]
pub fn text_of(keyword: Keyword) -> &'static str {
    KEYWORDS
        .iter()
        .find(|(_, k)| *k == keyword)
        .map(|(s, _)| *s)
        .expect("every Keyword variant has a table entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn let_is_keyword_only_conditionally_strict() {
        let kw = lookup("let").unwrap();
        assert!(kw.is_strict_mode_reserved_word());
    }

    #[test]
    fn function_is_not_strict_only() {
        let kw = lookup("function").unwrap();
        assert!(!kw.is_strict_mode_reserved_word());
        assert!(!kw.is_future_reserved_word());
    }

    #[test]
    fn enum_is_future_reserved_unconditionally() {
        let kw = lookup("enum").unwrap();
        assert!(kw.is_future_reserved_word());
    }

    #[test]
    fn unknown_text_is_not_a_keyword() {
        assert!(lookup("frobnicate").is_none());
    }
}
