//! The tagged runtime value (spec §3.1, component C1).
//!
//! The teacher's own `Value` (`value.rs`) is a plain Rust sum type with
//! heap values referenced by an arena index (`HeapId`) rather than a raw
//! pointer — safe, and exactly the "two-word packing" alternative spec §9
//! allows ("A compliant implementation MAY use only the main packing
//! everywhere at a memory cost; behavior is identical"). We follow the same
//! shape here rather than hand-rolling unsafe NaN-boxing: `Value` is a
//! tagged enum, heap payloads are reached through `HeapRef<T>` (a cheap
//! `Rc`-based handle — the GC itself is out of scope per spec §1, treated as
//! the black box spec describes), and every heap-object struct still opens
//! with a `HeapHeader` so the O(1) `is_object`/`is_string`/`is_symbol`/
//! `is_bigint` tests spec §3.1 requires can read the tag without going
//! through a vtable, exactly like `PointerValue.h`'s discipline and
//! `trynova-nova`'s `value_discriminant` helper. See DESIGN.md for the
//! NaN-boxing open question.

use std::rc::Rc;

use bitflags::bitflags;
use num_bigint::BigInt;

bitflags! {
    /// Disjoint type-tag bits read from a heap object's first word without
    /// vtable dispatch (spec §3.1 invariant 3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeapTag: u8 {
        const OBJECT = 0b0001;
        const STRING = 0b0010;
        const SYMBOL = 0b0100;
        const BIG_INT = 0b1000;
    }
}

/// First field of every heap-allocated value. Reading `.tag` never requires
/// knowing the concrete payload type, which is what lets `Value::is_object`
/// etc. avoid a vtable call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct HeapHeader {
    pub tag: HeapTag,
}

impl HeapHeader {
    #[must_use]
    pub const fn new(tag: HeapTag) -> Self {
        Self { tag }
    }
}

/// A heap-allocated object payload. `repr(C)` with the header first
/// guarantees `HeapHeader` is at offset 0 regardless of `T`.
#[derive(Debug)]
#[repr(C)]
pub struct HeapBox<T> {
    pub header: HeapHeader,
    pub data: T,
}

/// A cheap, cloneable handle to a heap-allocated value.
///
/// The garbage collector that owns the backing storage is out of scope for
/// this core (spec §1: "treated as a black box"); `Rc` stands in for "object
/// lives as long as anything reachable holds it" without committing this
/// crate to a tracing-GC implementation. An embedder wiring in a real GC
/// replaces this type, not the `Value` enum's shape.
#[derive(Debug)]
pub struct HeapRef<T>(Rc<HeapBox<T>>);

impl<T> Clone for HeapRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for HeapRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl<T> Eq for HeapRef<T> {}

impl<T> HeapRef<T> {
    pub fn new(tag: HeapTag, data: T) -> Self {
        Self(Rc::new(HeapBox {
            header: HeapHeader::new(tag),
            data,
        }))
    }

    /// Reads the type tag without touching `T`: the literal grounding for
    /// spec §3.1's "read without vtable dispatch" invariant.
    #[must_use]
    pub fn tag(&self) -> HeapTag {
        self.0.header.tag
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.0.data
    }
}

pub type StringRef = HeapRef<Box<str>>;
pub type SymbolRef = HeapRef<Option<Box<str>>>;
pub type BigIntRef = HeapRef<BigInt>;
/// Placeholder for the full Object implementation (spec's Non-goals: "The
/// full Object / Array / ... object implementations" are out of scope). The
/// core only needs the tag and a property-shape pointer to drive inline
/// caches (see `bytecode::inline_cache`).
pub type ObjectRef = HeapRef<crate::bytecode::ShapeId>;

/// A boxed double, used whenever a number can't be represented as `Int32`.
pub type DoubleRef = HeapRef<f64>;

/// The packed runtime value shared by every stage downstream of the parser
/// (spec §3.1, §4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Uninitialized slot. Must never escape to user-visible code (spec
    /// §3.1 invariant 1).
    Empty,
    /// Tombstone in hashed structures.
    Deleted,
    Undefined,
    Null,
    Boolean(bool),
    Int32(i32),
    /// A non-integer double, or an integer outside `i32` range that the
    /// platform chose to box rather than keep unboxed. Canonicalized NaN
    /// lives here (spec §4.1 "NaN handling").
    Double(DoubleRef),
    String(StringRef),
    Symbol(SymbolRef),
    BigInt(BigIntRef),
    Object(ObjectRef),
}

/// A single canonical quiet-NaN bit pattern, so every NaN produced by
/// arithmetic compares bit-identical (spec §4.1 "NaN handling").
pub const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

#[must_use]
pub fn canonicalize_double(d: f64) -> f64 {
    if d.is_nan() { f64::from_bits(CANONICAL_NAN_BITS) } else { d }
}

impl Value {
    #[must_use]
    pub const fn from_int32(i: i32) -> Self {
        Self::Int32(i)
    }

    /// Per spec §4.1 `fromDouble`: an exact int32 is returned unboxed.
    #[must_use]
    pub fn from_double(d: f64) -> Self {
        let canonical = canonicalize_double(d);
        if canonical.fract() == 0.0
            && canonical >= f64::from(i32::MIN)
            && canonical <= f64::from(i32::MAX)
            && !(canonical == 0.0 && canonical.is_sign_negative())
        {
            Self::Int32(canonical as i32)
        } else {
            Self::Double(DoubleRef::new(HeapTag::empty(), canonical))
        }
    }

    #[must_use]
    pub fn from_string(s: impl Into<Box<str>>) -> Self {
        Self::String(StringRef::new(HeapTag::STRING, s.into()))
    }

    #[must_use]
    pub fn from_bigint(b: BigInt) -> Self {
        Self::BigInt(BigIntRef::new(HeapTag::BIG_INT, b))
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    #[must_use]
    pub const fn is_bigint(&self) -> bool {
        matches!(self, Self::BigInt(_))
    }

    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int32(_) | Self::Double(_))
    }

    #[must_use]
    pub fn as_int32(&self) -> Option<i32> {
        match self {
            Self::Int32(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int32(i) => Some(f64::from(*i)),
            Self::Double(d) => Some(*d.get()),
            _ => None,
        }
    }

    /// `===` per spec §4.1: same tag and payload, `NaN !== NaN`, `+0 === -0`,
    /// pointer equality for heap values.
    #[must_use]
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => {
                let (a, b) = (*a.get(), *b.get());
                if a.is_nan() || b.is_nan() { false } else { a == b }
            }
            (Self::Int32(a), Self::Double(b)) | (Self::Double(b), Self::Int32(a)) => {
                let b = *b.get();
                !b.is_nan() && f64::from(*a) == b
            }
            (Self::String(a), Self::String(b)) => a.get() == b.get(),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a.get() == b.get(),
            _ => false,
        }
    }
}

/// `toInt32`: truncating modulo 2^32 then reinterpreting as signed, per
/// spec's round-trip invariant (spec §3.1 invariant 4, §8 property 12).
#[must_use]
pub fn to_int32(d: f64) -> i32 {
    if !d.is_finite() {
        return 0;
    }
    let truncated = d.trunc();
    let modulo = truncated.rem_euclid(4_294_967_296.0);
    if modulo >= 2_147_483_648.0 {
        (modulo - 4_294_967_296.0) as i32
    } else {
        modulo as i32
    }
}

/// `toUint32`, per ECMAScript ToUint32.
#[must_use]
pub fn to_uint32(d: f64) -> u32 {
    if !d.is_finite() {
        return 0;
    }
    let truncated = d.trunc();
    truncated.rem_euclid(4_294_967_296.0) as u32
}

/// The denser heap-only packing (spec §3.1 "small value"): a 31-bit tagged
/// integer (low bit set) or an aligned pointer (low bit clear). Orthogonal
/// to `Value` and optional (spec §9's last Open Question); kept here as a
/// `u32`-sized slot type for object property storage, not used by `Value`
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSlot(u32);

const PACKED_TAG_BIT: u32 = 1;

impl PackedSlot {
    #[must_use]
    pub const fn from_small_int(i: i32) -> Self {
        // Narrow to 31 bits, dropping the sign-extended high bit; callers
        // are expected to only use this for values already range-checked
        // against `is_small_int`.
        Self((((i as u32) << 1) & 0xffff_fffe) | PACKED_TAG_BIT)
    }

    #[must_use]
    pub const fn is_small_int(i: i32) -> bool {
        i >= -(1 << 30) && i < (1 << 30)
    }

    #[must_use]
    pub const fn is_int(self) -> bool {
        self.0 & PACKED_TAG_BIT != 0
    }

    #[must_use]
    pub const fn as_small_int(self) -> Option<i32> {
        if self.is_int() {
            Some((self.0 as i32) >> 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_tag_readable_without_payload_knowledge() {
        let s = StringRef::new(HeapTag::STRING, Box::from("hi"));
        assert_eq!(s.tag(), HeapTag::STRING);
        let b = BigIntRef::new(HeapTag::BIG_INT, BigInt::from(1));
        assert_eq!(b.tag(), HeapTag::BIG_INT);
    }

    #[test]
    fn int32_round_trip() {
        for i in [-2_147_483_648i32, -1, 0, 1, 2_147_483_647] {
            let v = Value::from_int32(i);
            assert_eq!(v.as_int32(), Some(i));
            assert_eq!(to_int32(f64::from(to_uint32(f64::from(i))) - if i < 0 { 4_294_967_296.0 } else { 0.0 }), i);
        }
    }

    #[test]
    fn from_double_boxes_non_integers() {
        let v = Value::from_double(1.5);
        assert!(matches!(v, Value::Double(_)));
        assert_eq!(v.as_f64(), Some(1.5));
    }

    #[test]
    fn from_double_unboxes_exact_integers() {
        let v = Value::from_double(42.0);
        assert_eq!(v, Value::Int32(42));
    }

    #[test]
    fn nan_is_canonicalized_and_unequal_to_itself() {
        let a = Value::from_double(f64::NAN);
        let b = Value::from_double(-f64::NAN);
        assert!(!a.strict_equals(&b));
        assert_eq!(a.as_f64().unwrap().to_bits(), b.as_f64().unwrap().to_bits());
    }

    #[test]
    fn strict_equals_distinguishes_null_and_undefined() {
        assert!(!Value::Null.strict_equals(&Value::Undefined));
    }

    #[test]
    fn packed_slot_round_trips_small_ints() {
        for i in [-5i32, 0, 12345] {
            let slot = PackedSlot::from_small_int(i);
            assert_eq!(slot.as_small_int(), Some(i));
        }
    }
}
