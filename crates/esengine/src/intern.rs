//! Identifier and literal interning.
//!
//! Grounded on the teacher's `intern.rs`: a vector-backed interner returning
//! small integer ids, so identifiers and string literals can be compared and
//! stored cheaply instead of cloning `String`s through the AST and scope
//! tree. Unlike the teacher (which pre-interns 128 ASCII single-char strings
//! plus a large static-keyword table for Python builtins), our static table
//! is the ~40 ECMAScript keywords plus a handful of well-known names
//! (`arguments`, `eval`, `let`, `yield`, `of`, `async`, `get`, `set`,
//! `static`, `constructor`, `prototype`) that the parser tests by identity
//! on every identifier token.

use ahash::AHashMap;

/// Index into the interner's storage. `u32` to keep scope/AST records small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct StringId(pub(crate) u32);

impl StringId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for StringId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Names consulted by identity during parsing/strict-mode reclassification.
/// Interned once at interner construction so comparisons are `StringId`
/// equality rather than string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    Arguments,
    Eval,
    Let,
    Yield,
    Async,
    Await,
    Of,
    Get,
    Set,
    Static,
    Constructor,
    Prototype,
}

const WELL_KNOWN: &[(&str, WellKnown)] = &[
    ("arguments", WellKnown::Arguments),
    ("eval", WellKnown::Eval),
    ("let", WellKnown::Let),
    ("yield", WellKnown::Yield),
    ("async", WellKnown::Async),
    ("await", WellKnown::Await),
    ("of", WellKnown::Of),
    ("get", WellKnown::Get),
    ("set", WellKnown::Set),
    ("static", WellKnown::Static),
    ("constructor", WellKnown::Constructor),
    ("prototype", WellKnown::Prototype),
];

/// String interner populated during scanning/parsing.
///
/// Identifiers, string-literal cooked values, and template cooked/raw
/// strings are all interned here. Owned by the `Parser` for the duration
/// of a parse and handed off to the AST/scope tree as `StringId`s.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: AHashMap<Box<str>, StringId>,
    well_known: AHashMap<WellKnown, StringId>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        let mut this = Self::default();
        for (text, tag) in WELL_KNOWN {
            let id = this.intern(text);
            this.well_known.insert(*tag, id);
        }
        this
    }

    pub fn intern(&mut self, text: &str) -> StringId {
        if let Some(&id) = self.lookup.get(text) {
            return id;
        }
        let id = StringId(u32::try_from(self.strings.len()).expect("interner overflow"));
        let boxed: Box<str> = text.into();
        self.lookup.insert(boxed.clone(), id);
        self.strings.push(boxed);
        id
    }

    #[must_use]
    pub fn get(&self, id: StringId) -> &str {
        &self.strings[id.index()]
    }

    #[must_use]
    pub fn well_known(&self, tag: WellKnown) -> StringId {
        self.well_known[&tag]
    }

    #[must_use]
    pub fn is_well_known(&self, id: StringId, tag: WellKnown) -> bool {
        self.well_known.get(&tag) == Some(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedupes() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.get(a), "foo");
    }

    #[test]
    fn well_known_identity() {
        let mut interner = Interner::new();
        let let_id = interner.intern("let");
        assert!(interner.is_well_known(let_id, WellKnown::Let));
        assert!(!interner.is_well_known(let_id, WellKnown::Yield));
    }
}
