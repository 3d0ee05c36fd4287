//! Key hashing capability.
//!
//! Each supported key type maps itself to a `Digest` through one of three
//! fixed, unsalted algorithms. Digests are deterministic across runs and
//! platforms so bucket placement is reproducible; they make no attempt at
//! resisting adversarial collisions.

use crate::array::DynamicArray;

/// Fixed-width output of a hash function.
pub type Digest = u64;

/// Seed for `djb2`.
pub const DJB2_SEED: Digest = 5328;

/// Fractional part of the golden ratio, used by `golden_ratio`.
pub const GOLDEN_RATIO: f64 = 0.6180339887;

/// Keys usable in a `HashTable`.
///
/// Implementations must be pure: equal values produce equal digests, and a
/// key that is `Borrow`ed as another type must digest the same way as that
/// type (`String` and `str` agree).
pub trait Hashable {
    fn digest(&self) -> Digest;
}

/// djb2 over the UTF-8 bytes of `s`: `acc = acc * 33 + byte`, wrapping.
pub fn djb2(s: &str) -> Digest {
    s.bytes().fold(DJB2_SEED, |acc, b| {
        (acc << 5).wrapping_add(acc).wrapping_add(Digest::from(b))
    })
}

/// Multiplicative hashing: the fractional part of `n * GOLDEN_RATIO`
/// scaled by 2^31. Output is always below 2^31.
///
/// The fractional part is taken with `floor`, so negative inputs land in
/// `[0, 1)` like positive ones.
pub fn golden_ratio(n: i64) -> Digest {
    let x = n as f64 * GOLDEN_RATIO;
    let frac = x - x.floor();
    (frac * (1u64 << 31) as f64) as Digest
}

/// BSD-checksum-style fold: rotate right by one bit, then add the byte.
pub fn bsd_checksum(bytes: &[u8]) -> Digest {
    bytes.iter().fold(0, |acc: Digest, &b| {
        acc.rotate_right(1).wrapping_add(Digest::from(b))
    })
}

impl Hashable for str {
    fn digest(&self) -> Digest {
        djb2(self)
    }
}

impl Hashable for String {
    fn digest(&self) -> Digest {
        djb2(self)
    }
}

impl Hashable for i32 {
    fn digest(&self) -> Digest {
        golden_ratio(i64::from(*self))
    }
}

impl Hashable for u32 {
    fn digest(&self) -> Digest {
        golden_ratio(i64::from(*self))
    }
}

impl Hashable for [u8] {
    fn digest(&self) -> Digest {
        bsd_checksum(self)
    }
}

impl Hashable for Vec<u8> {
    fn digest(&self) -> Digest {
        bsd_checksum(self)
    }
}

impl Hashable for DynamicArray<u8> {
    fn digest(&self) -> Digest {
        bsd_checksum(self.as_slice())
    }
}

impl<T: Hashable + ?Sized> Hashable for &T {
    fn digest(&self) -> Digest {
        (**self).digest()
    }
}
