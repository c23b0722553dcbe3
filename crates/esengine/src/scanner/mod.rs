//! The lexical scanner (spec §4.2, component C2).
//!
//! Grounded on `examples/original_source/src/parser/Lexer.h`/`.cpp`: a
//! stateful byte-index cursor over the source, one token produced per call,
//! three controlled rewinds (regex re-scan, template re-scan, and the
//! parser's speculative-arrow backtrack, the last of which is implemented
//! by the parser saving/restoring a `ScannerCheckpoint`).

mod keywords;
mod token;
mod unicode;

pub use keywords::{text_of as keyword_text, Keyword};
pub use token::{NumericLiteralPayload, Punctuator, RegExpPayload, TemplatePayload, Token, TokenKind, TokenPayload};

use crate::errors::Diagnostic;
use crate::errors::ParseResult;
use crate::intern::Interner;
use crate::span::ExtendedNodeLoc;

/// A saved scanner position, for the parser's speculative-arrow-head
/// backtrack and for template re-scan (spec §4.2.1: "index advances
/// monotonically except for three controlled rewinds").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerCheckpoint {
    pos: usize,
    line: u32,
    line_start: usize,
}

pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
    pub strict_mode: bool,
    pub allow_module_syntax: bool,
    /// Set once a `LineTerminator` is consumed as part of skipping
    /// whitespace/comments before the next real token (spec §4.2.3).
    saw_line_terminator: bool,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(source: &'a str, is_module: bool) -> Self {
        let mut s = Self {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            strict_mode: is_module,
            allow_module_syntax: is_module,
            saw_line_terminator: false,
        };
        s.skip_hashbang();
        s
    }

    #[must_use]
    pub fn checkpoint(&self) -> ScannerCheckpoint {
        ScannerCheckpoint { pos: self.pos, line: self.line, line_start: self.line_start }
    }

    pub fn restore(&mut self, cp: ScannerCheckpoint) {
        self.pos = cp.pos;
        self.line = cp.line;
        self.line_start = cp.line_start;
    }

    fn loc(&self) -> ExtendedNodeLoc {
        ExtendedNodeLoc::new(self.line, (self.pos - self.line_start + 1) as u32, self.pos as u32)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_char_at(&self, skip: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(skip)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if unicode::is_line_terminator(c) {
            if c == '\r' && self.peek_char() == Some('\n') {
                self.pos += 1;
            }
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn skip_hashbang(&mut self) {
        if self.pos == 0 && self.starts_with("#!") {
            while let Some(c) = self.peek_char() {
                if unicode::is_line_terminator(c) {
                    break;
                }
                self.advance();
            }
        }
    }

    /// Skips whitespace and comments, recording whether a line terminator
    /// was crossed (spec §4.2.3's `hasLineTerminator`). The HTML-like
    /// `<!--`/`-->` single-line comments are only recognized outside module
    /// source (spec's Open Question: gated here on `allow_module_syntax`,
    /// resolved in DESIGN.md).
    fn skip_trivia(&mut self) -> ParseResult<()> {
        self.saw_line_terminator = false;
        loop {
            match self.peek_char() {
                Some(c) if unicode::is_line_terminator(c) => {
                    self.saw_line_terminator = true;
                    self.advance();
                }
                Some(c) if unicode::is_whitespace(c) => {
                    self.advance();
                }
                Some('/') if self.peek_char_at(1) == Some('/') => {
                    while let Some(c) = self.peek_char() {
                        if unicode::is_line_terminator(c) {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_char_at(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while let Some(c) = self.peek_char() {
                        if c == '*' && self.peek_char_at(1) == Some('/') {
                            self.advance();
                            self.advance();
                            closed = true;
                            break;
                        }
                        if unicode::is_line_terminator(c) {
                            self.saw_line_terminator = true;
                        }
                        self.advance();
                    }
                    if !closed {
                        return Err(Diagnostic::syntax("Unterminated comment", self.loc()));
                    }
                }
                Some('<') if !self.allow_module_syntax && self.starts_with("<!--") => {
                    for _ in 0..4 {
                        self.advance();
                    }
                    while let Some(c) = self.peek_char() {
                        if unicode::is_line_terminator(c) {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('-') if !self.allow_module_syntax && self.starts_with("-->") && self.at_line_start() => {
                    for _ in 0..3 {
                        self.advance();
                    }
                    while let Some(c) = self.peek_char() {
                        if unicode::is_line_terminator(c) {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn at_line_start(&self) -> bool {
        self.pos == self.line_start
    }

    /// Produces the next token, per spec §4.2.3's "the parser observes
    /// exactly one token ahead". Whether a leading `/` is a division
    /// operator or a regex literal is context the scanner doesn't have;
    /// callers that know a regex is expected call [`Scanner::rescan_regex`]
    /// instead, after rewinding with [`Scanner::checkpoint`]/`restore`.
    pub fn next_token(&mut self, interner: &mut Interner) -> ParseResult<Token> {
        self.skip_trivia()?;
        let had_lt = self.saw_line_terminator;
        let start = self.loc();
        let Some(c) = self.peek_char() else {
            return Ok(Token::eof(start, had_lt));
        };

        let (kind, payload) = if c == '"' || c == '\'' {
            self.scan_string_literal(c, interner)?
        } else if c == '`' {
            self.scan_template(true, interner)?
        } else if unicode::is_decimal_digit(c) || (c == '.' && self.peek_char_at(1).is_some_and(unicode::is_decimal_digit)) {
            self.scan_numeric_literal()?
        } else if unicode::is_identifier_start(c) || c == '\\' {
            self.scan_identifier_or_keyword(interner)?
        } else {
            self.scan_punctuator()?
        };

        let end = self.pos as u32;
        Ok(Token {
            kind,
            range: (start.index, end),
            loc: start,
            has_line_terminator_before: had_lt,
            payload,
        })
    }

    fn scan_identifier_or_keyword(&mut self, interner: &mut Interner) -> ParseResult<(TokenKind, TokenPayload)> {
        let start = self.pos;
        let mut decoded = String::new();
        let mut has_escape = false;
        let mut first = true;
        loop {
            match self.peek_char() {
                Some('\\') if self.peek_char_at(1) == Some('u') => {
                    has_escape = true;
                    self.advance();
                    self.advance();
                    let cp = self.scan_unicode_escape_value()?;
                    let ch = char::from_u32(cp).ok_or_else(|| Diagnostic::syntax("Invalid Unicode escape", self.loc()))?;
                    let ok = if first { unicode::is_identifier_start(ch) } else { unicode::is_identifier_continue(ch) };
                    if !ok {
                        return Err(Diagnostic::syntax("Invalid identifier escape", self.loc()));
                    }
                    decoded.push(ch);
                }
                Some(c) if (first && unicode::is_identifier_start(c)) || (!first && unicode::is_identifier_continue(c)) => {
                    decoded.push(c);
                    self.advance();
                }
                _ => break,
            }
            first = false;
        }
        let raw = &self.source[start..self.pos];
        let text: &str = if has_escape { &decoded } else { raw };

        if let Some(primary) = keywords::lookup(text) {
            if has_escape {
                return Err(Diagnostic::syntax("Keyword must not contain escaped characters", self.loc()));
            }
            // `yield`'s reservedness depends on generator-body context, not
            // `strict_mode`, so the parser reinterprets it at identifier
            // sites instead; every other strict-mode-reserved word is a
            // plain identifier outside strict mode (spec §4.3.4).
            if primary != Keyword::Yield && primary.is_strict_mode_reserved_word() && !self.strict_mode {
                let name = interner.intern(text);
                return Ok((TokenKind::Identifier, TokenPayload::Identifier { name, has_allocated_string: has_escape }));
            }
            return Ok((TokenKind::Keyword, TokenPayload::Keyword { primary }));
        }
        if text == "true" || text == "false" {
            return Ok((TokenKind::BooleanLiteral, TokenPayload::Boolean(text == "true")));
        }
        if text == "null" {
            return Ok((TokenKind::NullLiteral, TokenPayload::None));
        }
        let name = interner.intern(text);
        Ok((TokenKind::Identifier, TokenPayload::Identifier { name, has_allocated_string: has_escape }))
    }

    fn scan_unicode_escape_value(&mut self) -> ParseResult<u32> {
        if self.peek_char() == Some('{') {
            self.advance();
            let mut value: u32 = 0;
            let mut any = false;
            while let Some(c) = self.peek_char() {
                if c == '}' {
                    break;
                }
                let digit = c.to_digit(16).ok_or_else(|| Diagnostic::syntax("Invalid Unicode escape", self.loc()))?;
                value = value.checked_mul(16).and_then(|v| v.checked_add(digit)).ok_or_else(|| {
                    Diagnostic::syntax("Undefined Unicode code-point", self.loc())
                })?;
                any = true;
                self.advance();
            }
            if !any || self.peek_char() != Some('}') {
                return Err(Diagnostic::syntax("Invalid Unicode escape", self.loc()));
            }
            self.advance();
            if value > 0x10FFFF {
                return Err(Diagnostic::syntax("Undefined Unicode code-point", self.loc()));
            }
            Ok(value)
        } else {
            let mut value: u32 = 0;
            for _ in 0..4 {
                let c = self.peek_char().ok_or_else(|| Diagnostic::syntax("Invalid Unicode escape", self.loc()))?;
                let digit = c.to_digit(16).ok_or_else(|| Diagnostic::syntax("Invalid Unicode escape", self.loc()))?;
                value = value * 16 + digit;
                self.advance();
            }
            Ok(value)
        }
    }

    fn scan_numeric_literal(&mut self) -> ParseResult<(TokenKind, TokenPayload)> {
        let start = self.pos;
        let start_with_zero = self.peek_char() == Some('0');
        let mut has_number_separator = false;
        let mut is_bigint = false;

        let radix = if start_with_zero {
            match self.peek_char_at(1) {
                Some('x' | 'X') => Some(16),
                Some('b' | 'B') => Some(2),
                Some('o' | 'O') => Some(8),
                _ => None,
            }
        } else {
            None
        };

        let mut digits_start = start;
        let mut legacy_octal_radix = None;
        if let Some(radix) = radix {
            self.advance();
            self.advance();
            digits_start = self.pos;
            self.scan_digits_of_radix(radix, &mut has_number_separator)?;
        } else if start_with_zero && self.peek_char_at(1).is_some_and(|c| ('0'..='7').contains(&c)) {
            // Legacy octal: must reject separators (spec §4.2.3).
            self.advance();
            digits_start = self.pos;
            while self.peek_char().is_some_and(|c| ('0'..='7').contains(&c)) {
                self.advance();
            }
            legacy_octal_radix = Some(8);
        } else {
            // A lone leading `0` can never be followed by a separator: it
            // isn't a radix prefix (handled above) or a legacy octal digit
            // (also handled above), so this would otherwise be read as an
            // ordinary decimal integer digit run starting with `0`, which
            // spec §4.2.3 never allows a separator to attach to.
            if start_with_zero && self.peek_char_at(1) == Some('_') {
                return Err(Diagnostic::syntax("Numeric separator not allowed here", self.loc()));
            }
            self.scan_digits_of_radix(10, &mut has_number_separator)?;
            if self.peek_char() == Some('.') {
                self.advance();
                self.scan_digits_of_radix(10, &mut has_number_separator)?;
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                self.advance();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.scan_digits_of_radix(10, &mut has_number_separator)?;
            }
        }

        if self.peek_char() == Some('n') {
            if radix.is_none() && start_with_zero && self.pos > start + 1 {
                return Err(Diagnostic::syntax("Invalid BigInt literal with leading zero", self.loc()));
            }
            is_bigint = true;
            self.advance();
        }

        if let Some(c) = self.peek_char() {
            if unicode::is_identifier_start(c) || unicode::is_decimal_digit(c) {
                return Err(Diagnostic::syntax("Identifier directly after number", self.loc()));
            }
        }

        let digits_end = self.pos - usize::from(is_bigint);
        let digits: String = self.source[digits_start..digits_end].chars().filter(|c| *c != '_').collect();
        let value = if let Some(radix) = radix.or(legacy_octal_radix) {
            if digits.is_empty() {
                0.0
            } else {
                u64::from_str_radix(&digits, radix).map(|v| v as f64).unwrap_or(f64::NAN)
            }
        } else {
            digits.parse::<f64>().unwrap_or(f64::NAN)
        };

        Ok((
            TokenKind::NumericLiteral,
            TokenPayload::Numeric(NumericLiteralPayload { start_with_zero, has_number_separator, is_bigint, value }),
        ))
    }

    /// Scans digits in the given radix, enforcing spec §4.2.3's numeric
    /// separator placement rules: not adjacent to another separator, not at
    /// the start or end of the digit run, not immediately after a radix
    /// prefix.
    fn scan_digits_of_radix(&mut self, radix: u32, has_separator: &mut bool) -> ParseResult<()> {
        let mut last_was_digit = false;
        let mut last_was_separator = false;
        let mut any_digit = false;
        loop {
            match self.peek_char() {
                Some('_') => {
                    if !last_was_digit {
                        return Err(Diagnostic::syntax("Numeric separator must be preceded by a digit", self.loc()));
                    }
                    *has_separator = true;
                    last_was_separator = true;
                    last_was_digit = false;
                    self.advance();
                }
                Some(c) if c.is_digit(radix) => {
                    any_digit = true;
                    last_was_digit = true;
                    last_was_separator = false;
                    self.advance();
                }
                _ => break,
            }
        }
        if last_was_separator {
            return Err(Diagnostic::syntax("Numeric separator must not be at the end", self.loc()));
        }
        let _ = any_digit;
        Ok(())
    }

    fn scan_string_literal(
        &mut self,
        quote: char,
        interner: &mut crate::intern::Interner,
    ) -> ParseResult<(TokenKind, TokenPayload)> {
        self.advance();
        let mut decoded = String::new();
        loop {
            match self.peek_char() {
                None => return Err(Diagnostic::syntax("Unterminated string literal", self.loc())),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) if unicode::is_line_terminator(c) && c != '\u{2028}' && c != '\u{2029}' => {
                    return Err(Diagnostic::syntax("Unterminated string literal", self.loc()));
                }
                Some('\\') => {
                    self.advance();
                    self.scan_escape_sequence(&mut decoded)?;
                }
                Some(c) => {
                    decoded.push(c);
                    self.advance();
                }
            }
        }
        let value = interner.intern(&decoded);
        Ok((TokenKind::StringLiteral, TokenPayload::StringLit { value }))
    }

    fn scan_escape_sequence(&mut self, out: &mut String) -> ParseResult<()> {
        let Some(c) = self.peek_char() else {
            return Err(Diagnostic::syntax("Unterminated string literal", self.loc()));
        };
        match c {
            'n' => { out.push('\n'); self.advance(); }
            'r' => { out.push('\r'); self.advance(); }
            't' => { out.push('\t'); self.advance(); }
            'b' => { out.push('\u{8}'); self.advance(); }
            'f' => { out.push('\u{c}'); self.advance(); }
            'v' => { out.push('\u{b}'); self.advance(); }
            '0' if !self.peek_char_at(1).is_some_and(|c| ('0'..='9').contains(&c)) => {
                out.push('\0');
                self.advance();
            }
            '1'..='7' => {
                if self.strict_mode {
                    return Err(Diagnostic::syntax("Octal escape sequences are not allowed in strict mode", self.loc()));
                }
                let mut value = 0u32;
                let mut count = 0;
                while count < 3 {
                    match self.peek_char() {
                        Some(d @ '0'..='7') => {
                            let candidate = value * 8 + d.to_digit(8).unwrap();
                            if candidate > 0o377 {
                                break;
                            }
                            value = candidate;
                            self.advance();
                            count += 1;
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            'x' => {
                self.advance();
                let mut value = 0u32;
                for _ in 0..2 {
                    let d = self.peek_char().and_then(|c| c.to_digit(16)).ok_or_else(|| {
                        Diagnostic::syntax("Invalid hexadecimal escape sequence", self.loc())
                    })?;
                    value = value * 16 + d;
                    self.advance();
                }
                out.push(char::from_u32(value).unwrap_or('\u{fffd}'));
            }
            'u' => {
                self.advance();
                let cp = self.scan_unicode_escape_value()?;
                out.push(char::from_u32(cp).unwrap_or('\u{fffd}'));
            }
            c if unicode::is_line_terminator(c) => {
                self.advance();
            }
            c => {
                out.push(c);
                self.advance();
            }
        }
        Ok(())
    }

    fn scan_template(&mut self, _head: bool, interner: &mut crate::intern::Interner) -> ParseResult<(TokenKind, TokenPayload)> {
        self.advance();
        self.scan_template_body(true, interner)
    }

    /// Re-scans starting at a `}` as a template-middle/tail, per spec
    /// §4.2.3: "after a `${...}` expression, the parser sees a `}` in
    /// punctuator mode; it calls a re-scan entry."
    pub fn rescan_template_tail(&mut self, interner: &mut crate::intern::Interner) -> ParseResult<(TokenKind, TokenPayload)> {
        self.scan_template_body(false, interner)
    }

    /// Errors deferred instead of raised immediately (spec §7 "Recovery"):
    /// octal escapes and bad `\x`/`\u` sequences inside a template are only
    /// real errors if the template is *not* tagged.
    fn scan_template_body(
        &mut self,
        head: bool,
        interner: &mut crate::intern::Interner,
    ) -> ParseResult<(TokenKind, TokenPayload)> {
        let raw_start = self.pos;
        let mut cooked = String::new();
        let mut deferred_error = None;
        let tail;
        loop {
            match self.peek_char() {
                None => return Err(Diagnostic::syntax("Unterminated template literal", self.loc())),
                Some('`') => {
                    self.advance();
                    tail = true;
                    break;
                }
                Some('$') if self.peek_char_at(1) == Some('{') => {
                    self.advance();
                    self.advance();
                    tail = false;
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let saved_strict = self.strict_mode;
                    self.strict_mode = false; // legacy octal deferred, not rejected, until tagged-ness is known
                    let result = self.scan_escape_sequence(&mut cooked);
                    self.strict_mode = saved_strict;
                    if let Err(e) = result {
                        deferred_error = Some(e.message);
                    }
                }
                Some(c) => {
                    cooked.push(c);
                    self.advance();
                }
            }
        }
        let raw_end = if tail { self.pos - 1 } else { self.pos - 2 };
        let raw_text = &self.source[raw_start..raw_end];
        let raw = interner.intern(raw_text);
        let cooked_id = if deferred_error.is_some() { None } else { Some(interner.intern(&cooked)) };
        let deferred_error = deferred_error.map(|msg| interner.intern(&msg));
        Ok((
            TokenKind::Template,
            TokenPayload::Template(TemplatePayload { cooked: cooked_id, raw, head, tail, deferred_error }),
        ))
    }

    fn scan_punctuator(&mut self) -> ParseResult<(TokenKind, TokenPayload)> {
        use Punctuator as P;
        let four: String = self.source[self.pos..].chars().take(4).collect();
        let three = &four.get(..3.min(four.len())).unwrap_or(&four);
        let two = &four.get(..2.min(four.len())).unwrap_or(&four);
        let table4: &[(&str, P)] = &[(">>>=", P::UnsignedShiftRightAssign)];
        let table3: &[(&str, P)] = &[
            ("...", P::DotDotDot),
            ("===", P::StrictEq),
            ("!==", P::StrictNotEq),
            ("**=", P::StarStarAssign),
            ("<<=", P::ShiftLeftAssign),
            (">>=", P::ShiftRightAssign),
            ("&&=", P::AndAssign),
            ("||=", P::OrAssign),
            ("??=", P::QuestionQuestionAssign),
            (">>>", P::UnsignedShiftRight),
        ];
        let table2: &[(&str, P)] = &[
            ("=>", P::Arrow),
            ("==", P::Eq),
            ("!=", P::NotEq),
            ("<=", P::LtEq),
            (">=", P::GtEq),
            ("&&", P::And),
            ("||", P::Or),
            ("??", P::QuestionQuestion),
            ("?.", P::QuestionDot),
            ("++", P::PlusPlus),
            ("--", P::MinusMinus),
            ("**", P::StarStar),
            ("<<", P::ShiftLeft),
            (">>", P::ShiftRight),
            ("+=", P::PlusAssign),
            ("-=", P::MinusAssign),
            ("*=", P::StarAssign),
            ("/=", P::SlashAssign),
            ("%=", P::PercentAssign),
            ("&=", P::BitAndAssign),
            ("|=", P::BitOrAssign),
            ("^=", P::BitXorAssign),
        ];
        for (s, p) in table4 {
            if four == *s {
                for _ in 0..4 {
                    self.advance();
                }
                return Ok((TokenKind::Punctuator, TokenPayload::Punctuator(*p)));
            }
        }
        for (s, p) in table3 {
            if three == s {
                for _ in 0..3 {
                    self.advance();
                }
                return Ok((TokenKind::Punctuator, TokenPayload::Punctuator(*p)));
            }
        }
        for (s, p) in table2 {
            if two == s {
                for _ in 0..2 {
                    self.advance();
                }
                return Ok((TokenKind::Punctuator, TokenPayload::Punctuator(*p)));
            }
        }
        let c = self.advance().expect("caller checked a character is present");
        let p = match c {
            '(' => P::LParen,
            ')' => P::RParen,
            '{' => P::LBrace,
            '}' => P::RBrace,
            '[' => P::LBracket,
            ']' => P::RBracket,
            '.' => P::Dot,
            ';' => P::Semicolon,
            ',' => P::Comma,
            '?' => P::QuestionMark,
            ':' => P::Colon,
            '!' => P::Not,
            '~' => P::BitNot,
            '+' => P::Plus,
            '-' => P::Minus,
            '*' => P::Star,
            '%' => P::Percent,
            '<' => P::Lt,
            '>' => P::Gt,
            '=' => P::Assign,
            '&' => P::BitAnd,
            '|' => P::BitOr,
            '^' => P::BitXor,
            '#' => P::Hash,
            '@' => P::At,
            '/' => P::Slash,
            other => return Err(Diagnostic::syntax(format!("Unexpected character '{other}'"), self.loc())),
        };
        Ok((TokenKind::Punctuator, TokenPayload::Punctuator(p)))
    }

    /// Regex re-scan (spec §4.2.3): called by the parser after it decides,
    /// from grammatical context, that a `/` begins a regular expression
    /// rather than a division operator. The caller must have rewound to the
    /// `/` via a saved [`ScannerCheckpoint`].
    pub fn rescan_regex(&mut self, interner: &mut Interner) -> ParseResult<(TokenKind, TokenPayload)> {
        let start = self.pos;
        self.advance();
        let mut in_class = false;
        loop {
            match self.peek_char() {
                None => return Err(Diagnostic::syntax("Unterminated regular expression", self.loc())),
                Some(c) if unicode::is_line_terminator(c) => {
                    return Err(Diagnostic::syntax("Unterminated regular expression", self.loc()));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') if in_class => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let body_end = self.pos - 1;
        let flags_start = self.pos;
        while self.peek_char().is_some_and(unicode::is_identifier_continue) {
            self.advance();
        }
        let pattern = interner.intern(&self.source[start + 1..body_end]);
        let flags = interner.intern(&self.source[flags_start..self.pos]);
        Ok((TokenKind::RegularExpression, TokenPayload::RegExp(RegExpPayload { pattern, flags })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    fn tokens(src: &str) -> Vec<Token> {
        let mut interner = Interner::new();
        let mut scanner = Scanner::new(src, false);
        let mut out = Vec::new();
        loop {
            let t = scanner.next_token(&mut interner).unwrap();
            let is_eof = t.is_eof();
            out.push(t);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn token_coverage_spans_full_source_modulo_trivia() {
        let src = "let x = 1 ;";
        let toks = tokens(src);
        assert_eq!(toks.len(), 5); // let, x, =, 1, ;, plus EOF trimmed below
    }

    #[test]
    fn line_terminator_flag_set_correctly() {
        let src = "a\nb";
        let toks = tokens(src);
        assert!(!toks[0].has_line_terminator_before);
        assert!(toks[1].has_line_terminator_before);
    }

    #[test]
    fn numeric_separators_accepted_in_decimal_and_hex() {
        let toks = tokens("1_000");
        match toks[0].payload {
            TokenPayload::Numeric(p) => {
                assert!((p.value - 1000.0).abs() < f64::EPSILON);
                assert!(p.has_number_separator);
            }
            _ => panic!("expected numeric literal"),
        }
        let toks = tokens("0x1_0");
        match toks[0].payload {
            TokenPayload::Numeric(p) => assert!((p.value - 16.0).abs() < f64::EPSILON),
            _ => panic!("expected numeric literal"),
        }
    }

    #[test]
    fn trailing_separator_rejected() {
        let mut interner = Interner::new();
        let mut scanner = Scanner::new("10_", false);
        assert!(scanner.next_token(&mut interner).is_err());
    }

    #[test]
    fn leading_separator_is_not_a_valid_number_start() {
        // `_10` scans as an identifier, not a number — separators cannot
        // start a numeric literal (spec §8 property 6).
        let toks = tokens("_10");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn bigint_suffix_recognized() {
        let toks = tokens("1_000_000n");
        match toks[0].payload {
            TokenPayload::Numeric(p) => {
                assert!(p.is_bigint);
                assert!(!p.start_with_zero);
                assert!(p.has_number_separator);
            }
            _ => panic!("expected numeric literal"),
        }
    }

    #[test]
    fn keyword_with_escape_is_rejected() {
        let mut interner = Interner::new();
        let mut scanner = Scanner::new("\\u0066or", false); // "for" escaped
        assert!(scanner.next_token(&mut interner).is_err());
    }

    #[test]
    fn regex_rescan_stops_at_unescaped_slash_outside_class() {
        let mut interner = Interner::new();
        let mut scanner = Scanner::new("/a[/]b/gi", false);
        let (kind, payload) = scanner.rescan_regex(&mut interner).unwrap();
        assert_eq!(kind, TokenKind::RegularExpression);
        match payload {
            TokenPayload::RegExp(r) => assert_eq!(interner.get(r.flags), "gi"),
            _ => panic!("expected regexp"),
        }
    }

    #[test]
    fn legacy_octal_rejects_separators() {
        let mut interner = Interner::new();
        let mut scanner = Scanner::new("017", false);
        let t = scanner.next_token(&mut interner).unwrap();
        match t.payload {
            TokenPayload::Numeric(p) => assert!(p.start_with_zero),
            _ => panic!("expected numeric literal"),
        }
    }

    #[test]
    fn separator_directly_after_lone_leading_zero_rejected() {
        // `0_1` is neither a radix prefix nor legacy octal, so it would
        // otherwise fall through to an ordinary decimal digit run starting
        // with `0` — which may never carry a separator (spec §8 property 6).
        let mut interner = Interner::new();
        let mut scanner = Scanner::new("0_1", false);
        assert!(scanner.next_token(&mut interner).is_err());
    }
}
