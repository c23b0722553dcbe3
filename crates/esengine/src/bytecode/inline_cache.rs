//! Inline caches (spec §3.6): a per-call-site cache of recently seen
//! shapes, consulted before falling back to a full property lookup.
//!
//! Grounded on the teacher's `bytecode/vm/attr.rs`, which caches resolved
//! attribute lookups per call site rather than re-walking the MRO on every
//! access; here the cache key is a `ShapeId` instead of a Python type.
//! Spec's simple/complex split ("a small fixed-size array of recently seen
//! shapes... falls back to a heap-allocated table once the simple cache is
//! exhausted") is modeled with `smallvec` the way the teacher bounds its own
//! small buffers.

use smallvec::SmallVec;

use super::shape::ShapeId;

/// How many distinct shapes the simple cache holds before a site is
/// considered "megamorphic" and spills to the complex cache.
const SIMPLE_CACHE_SLOTS: usize = 4;

/// One cached `(shape, slot)` entry for a property read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GetCacheEntry {
    shape: ShapeId,
    slot: u32,
}

/// Inline cache for a `GetByInlineCache` site. Starts as a small inline
/// array; once it overflows, every subsequent shape is tracked in a
/// heap-allocated table instead of growing the inline array unbounded
/// (spec §3.6: "a complex cache keyed on the full hidden-class chain").
#[derive(Debug, Default)]
pub struct GetObjectInlineCache {
    simple: SmallVec<[GetCacheEntry; SIMPLE_CACHE_SLOTS]>,
    complex: Option<ahash::AHashMap<ShapeId, u32>>,
}

impl GetObjectInlineCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_megamorphic(&self) -> bool {
        self.complex.is_some()
    }

    #[must_use]
    pub fn lookup(&self, shape: ShapeId) -> Option<u32> {
        if let Some(complex) = &self.complex {
            return complex.get(&shape).copied();
        }
        self.simple.iter().find(|e| e.shape == shape).map(|e| e.slot)
    }

    /// Records a resolved `(shape, slot)` pair, spilling to the complex
    /// cache once the simple array is full and a new shape shows up.
    pub fn record(&mut self, shape: ShapeId, slot: u32) {
        if let Some(complex) = &mut self.complex {
            complex.entry(shape).or_insert(slot);
            return;
        }
        if self.simple.iter().any(|e| e.shape == shape) {
            return;
        }
        if self.simple.len() < SIMPLE_CACHE_SLOTS {
            self.simple.push(GetCacheEntry { shape, slot });
            return;
        }
        let mut complex: ahash::AHashMap<ShapeId, u32> =
            self.simple.iter().map(|e| (e.shape, e.slot)).collect();
        complex.insert(shape, slot);
        self.complex = Some(complex);
    }
}

/// Inline cache for a `SetByInlineCache` site. Additionally remembers the
/// shape transition a set caused, so a subsequent identical write skips
/// `ShapeTable::transition`'s hash lookup (spec §3.6, §4.4).
#[derive(Debug, Default)]
pub struct SetObjectInlineCache {
    simple: SmallVec<[(ShapeId, ShapeId, u32); SIMPLE_CACHE_SLOTS]>,
    complex: Option<ahash::AHashMap<ShapeId, (ShapeId, u32)>>,
}

impl SetObjectInlineCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lookup(&self, from: ShapeId) -> Option<(ShapeId, u32)> {
        if let Some(complex) = &self.complex {
            return complex.get(&from).copied();
        }
        self.simple
            .iter()
            .find(|(s, ..)| *s == from)
            .map(|&(_, to, slot)| (to, slot))
    }

    pub fn record(&mut self, from: ShapeId, to: ShapeId, slot: u32) {
        if let Some(complex) = &mut self.complex {
            complex.entry(from).or_insert((to, slot));
            return;
        }
        if self.simple.iter().any(|(s, ..)| *s == from) {
            return;
        }
        if self.simple.len() < SIMPLE_CACHE_SLOTS {
            self.simple.push((from, to, slot));
            return;
        }
        let mut complex: ahash::AHashMap<ShapeId, (ShapeId, u32)> =
            self.simple.iter().map(|&(s, to, slot)| (s, (to, slot))).collect();
        complex.insert(from, (to, slot));
        self.complex = Some(complex);
    }
}

/// A single call site's cache, either a property read or write. Indexed by
/// `Opcode::GetByInlineCache`/`SetByInlineCache`'s `site` field.
#[derive(Debug)]
pub enum InlineCacheSite {
    Get(GetObjectInlineCache),
    Set(SetObjectInlineCache),
}

#[cfg(test)]
mod tests {
    use super::super::shape::ShapeTable;
    use super::*;

    /// Builds `count` mutually distinct shapes off a shared root by
    /// transitioning on a distinct property name each time.
    fn distinct_shapes(table: &mut ShapeTable, count: u32) -> Vec<ShapeId> {
        let root = table.root();
        (0..count)
            .map(|i| table.transition(root, crate::intern::StringId::from(i)))
            .collect()
    }

    #[test]
    fn simple_cache_holds_up_to_four_shapes() {
        let mut table = ShapeTable::new();
        let shapes = distinct_shapes(&mut table, 4);
        let mut cache = GetObjectInlineCache::new();
        for (i, &shape) in shapes.iter().enumerate() {
            cache.record(shape, i as u32);
        }
        assert!(!cache.is_megamorphic());
        assert_eq!(cache.lookup(shapes[2]), Some(2));
    }

    #[test]
    fn fifth_distinct_shape_spills_to_complex_cache() {
        let mut table = ShapeTable::new();
        let shapes = distinct_shapes(&mut table, 5);
        let mut cache = GetObjectInlineCache::new();
        for (i, &shape) in shapes.iter().enumerate() {
            cache.record(shape, i as u32);
        }
        assert!(cache.is_megamorphic());
        assert_eq!(cache.lookup(shapes[4]), Some(4));
        assert_eq!(cache.lookup(shapes[0]), Some(0));
    }

    #[test]
    fn set_cache_remembers_shape_transition() {
        let mut table = ShapeTable::new();
        let shapes = distinct_shapes(&mut table, 2);
        let mut cache = SetObjectInlineCache::new();
        cache.record(shapes[0], shapes[1], 3);
        assert_eq!(cache.lookup(shapes[0]), Some((shapes[1], 3)));
    }
}
