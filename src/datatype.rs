//! The closed family of element types the harness can sort.
//!
//! Every member is plain old data: fixed-size, `Copy`, valid when
//! zero-initialized. The layout layer relies on that to hand out freshly
//! mapped buffers without a construction pass. Algorithms never see the
//! concrete type; they see the key traits declared here and get a fully
//! monomorphized code path per combination.

use std::cmp::Ordering;

/// Capability contract for sortable element types.
///
/// `HAS_UNSIGNED_KEY` and `SIMPLE_KEY` are the key-extraction traits that
/// algorithm capability predicates test at combination-selection time: an
/// algorithm requiring radix-style unsigned keys is never instantiated for
/// a type that cannot provide them.
pub trait Datatype: Copy + Default + Send + Sync + 'static {
    /// Stable name used by CLI filters and the result stream.
    const NAME: &'static str;

    /// True iff `unsigned_key` yields a radix-sortable `u64` whose numeric
    /// order equals the datatype's order.
    const HAS_UNSIGNED_KEY: bool;

    /// True iff the element is nothing but its key (no payload to carry).
    const SIMPLE_KEY: bool;

    /// Build an element from a synthetic key sample.
    fn from_key(key: u64) -> Self;

    /// Build an element from a key/payload pair. Key-only types drop the
    /// payload.
    fn from_pair(key: u64, value: u64) -> Self {
        let _ = value;
        Self::from_key(key)
    }

    /// Build an element from a floating-point sample. Only generators whose
    /// capability predicate restricts them to floating-point datatypes call
    /// this with values that must survive exactly.
    fn from_double(value: f64) -> Self {
        Self::from_key(value as u64)
    }

    /// The radix key. Only meaningful when `HAS_UNSIGNED_KEY` is true.
    fn unsigned_key(&self) -> u64;

    /// Total order used by sorting and by the sortedness check.
    fn compare(&self, other: &Self) -> Ordering;

    /// 64-bit element fingerprint for the order-independent permutation
    /// check. Must cover the whole element, payload included, so lost or
    /// corrupted payloads are caught too.
    fn fingerprint(&self) -> u64;
}

/// splitmix64 finalizer. Cheap, well-mixed, good enough for a probabilistic
/// multiset fingerprint.
#[inline]
pub(crate) fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

impl Datatype for u32 {
    const NAME: &'static str = "uint32";
    const HAS_UNSIGNED_KEY: bool = true;
    const SIMPLE_KEY: bool = true;

    #[inline]
    fn from_key(key: u64) -> Self {
        key as u32
    }

    #[inline]
    fn unsigned_key(&self) -> u64 {
        *self as u64
    }

    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn fingerprint(&self) -> u64 {
        mix64(*self as u64)
    }
}

impl Datatype for u64 {
    const NAME: &'static str = "uint64";
    const HAS_UNSIGNED_KEY: bool = true;
    const SIMPLE_KEY: bool = true;

    #[inline]
    fn from_key(key: u64) -> Self {
        key
    }

    #[inline]
    fn unsigned_key(&self) -> u64 {
        *self
    }

    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn fingerprint(&self) -> u64 {
        mix64(*self)
    }
}

impl Datatype for f64 {
    const NAME: &'static str = "double";
    const HAS_UNSIGNED_KEY: bool = false;
    const SIMPLE_KEY: bool = true;

    #[inline]
    fn from_key(key: u64) -> Self {
        key as f64
    }

    #[inline]
    fn from_double(value: f64) -> Self {
        value
    }

    #[inline]
    fn unsigned_key(&self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    #[inline]
    fn fingerprint(&self) -> u64 {
        mix64(self.to_bits())
    }
}

/// A 16-byte key/value record, ordered by key only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct KeyValuePair {
    pub key: u64,
    pub value: u64,
}

impl Datatype for KeyValuePair {
    const NAME: &'static str = "pair";
    const HAS_UNSIGNED_KEY: bool = true;
    const SIMPLE_KEY: bool = false;

    #[inline]
    fn from_key(key: u64) -> Self {
        KeyValuePair { key, value: key }
    }

    #[inline]
    fn from_pair(key: u64, value: u64) -> Self {
        KeyValuePair { key, value }
    }

    #[inline]
    fn unsigned_key(&self) -> u64 {
        self.key
    }

    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }

    #[inline]
    fn fingerprint(&self) -> u64 {
        mix64(self.key ^ mix64(self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_total_order_handles_negatives() {
        assert_eq!((-1.0f64).compare(&1.0), Ordering::Less);
        assert_eq!(0.0f64.compare(&0.0), Ordering::Equal);
    }

    #[test]
    fn pair_orders_by_key_only() {
        let a = KeyValuePair { key: 1, value: 99 };
        let b = KeyValuePair { key: 1, value: 7 };
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn fingerprint_covers_payload() {
        let a = KeyValuePair { key: 1, value: 2 };
        let b = KeyValuePair { key: 1, value: 3 };
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn from_key_round_trips_unsigned_key() {
        assert_eq!(u64::from_key(42).unsigned_key(), 42);
        assert_eq!(u32::from_key(42).unsigned_key(), 42);
        assert_eq!(KeyValuePair::from_key(42).unsigned_key(), 42);
    }
}
