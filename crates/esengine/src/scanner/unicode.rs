//! ASCII classification bit flags (spec §4.2.3's Unicode identifier tables,
//! supplemented from `Lexer.h`'s `g_asciiRangeCharMap`/`g_asciiNumBitMap`: a
//! process-wide immutable lookup table avoids a branch tree on every
//! character during scanning).
//!
//! Non-ASCII characters fall back to `char::is_alphabetic` /
//! `char::is_alphanumeric`, which is a reasonable stand-in for the full
//! Unicode ID_Start/ID_Continue tables the original bundles (see
//! DESIGN.md).

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct AsciiClass: u8 {
        const IDENT_START    = 0b0000_0001;
        const IDENT_CONTINUE = 0b0000_0010;
        const DIGIT          = 0b0000_0100;
        const HEX_DIGIT      = 0b0000_1000;
        const WHITE_SPACE    = 0b0001_0000;
        const LINE_TERMINATOR = 0b0010_0000;
    }
}

const fn classify(b: u8) -> AsciiClass {
    let mut c = AsciiClass::empty();
    if b.is_ascii_alphabetic() || b == b'_' || b == b'$' {
        c = c.union(AsciiClass::IDENT_START).union(AsciiClass::IDENT_CONTINUE);
    }
    if b.is_ascii_digit() {
        c = c.union(AsciiClass::IDENT_CONTINUE).union(AsciiClass::DIGIT);
    }
    if b.is_ascii_hexdigit() {
        c = c.union(AsciiClass::HEX_DIGIT);
    }
    if b == b' ' || b == b'\t' || b == 0x0b || b == 0x0c {
        c = c.union(AsciiClass::WHITE_SPACE);
    }
    if b == b'\n' || b == b'\r' {
        c = c.union(AsciiClass::LINE_TERMINATOR);
    }
    c
}

const fn build_table() -> [AsciiClass; 128] {
    let mut table = [AsciiClass::empty(); 128];
    let mut i = 0;
    while i < 128 {
        table[i] = classify(i as u8);
        i += 1;
    }
    table
}

static ASCII_RANGE_CHAR_MAP: [AsciiClass; 128] = build_table();

fn ascii_class(c: char) -> Option<AsciiClass> {
    if (c as u32) < 128 { Some(ASCII_RANGE_CHAR_MAP[c as usize]) } else { None }
}

#[must_use]
pub fn is_identifier_start(c: char) -> bool {
    match ascii_class(c) {
        Some(class) => class.contains(AsciiClass::IDENT_START),
        None => c.is_alphabetic(),
    }
}

#[must_use]
pub fn is_identifier_continue(c: char) -> bool {
    match ascii_class(c) {
        Some(class) => class.contains(AsciiClass::IDENT_CONTINUE),
        None => c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}',
    }
}

#[must_use]
pub fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[must_use]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// ECMAScript `WhiteSpace`, excluding line terminators (spec's scanner must
/// tell the two apart for `hasLineTerminator`).
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    match ascii_class(c) {
        Some(class) => class.contains(AsciiClass::WHITE_SPACE),
        None => matches!(c, '\u{a0}' | '\u{feff}') || (c.is_whitespace() && !is_line_terminator(c)),
    }
}

#[must_use]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_and_underscore_start_identifiers() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('1'));
    }

    #[test]
    fn digits_continue_but_not_start_identifiers() {
        assert!(is_identifier_continue('1'));
        assert!(!is_identifier_start('1'));
    }

    #[test]
    fn line_terminators_are_not_whitespace() {
        assert!(!is_whitespace('\n'));
        assert!(is_line_terminator('\n'));
        assert!(is_whitespace(' '));
    }

    #[test]
    fn non_ascii_letters_start_identifiers() {
        assert!(is_identifier_start('é'));
    }
}
