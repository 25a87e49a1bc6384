//! Deterministic hash-based stub identity.
//!
//! This module provides [`StubHash`], a 64-bit hash identifying one
//! boundary call by its registry name and canonical signature. Hashes are
//! computed deterministically, so both sides of the boundary derive the
//! same identity from the shared registry with no coordination:
//!
//! - Same name + signature = same hash on either side
//! - No registration order dependencies
//! - A signature change changes the hash, so stale stubs cannot silently
//!   target a re-signed call
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants. Parameter position
//! is mixed in with a non-commutative combination so `(handle, i32)` and
//! `(i32, handle)` produce different hashes.

use std::fmt;

use xxhash_rust::xxh64::xxh64;

use crate::kind::{ReturnKind, ValueKind};

/// Domain-specific mixing constants for hash computation.
mod hash_constants {
    /// Separator constant combined between parameter positions.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for boundary-call hashes.
    pub const CALL: u64 = 0x5ea77ffbcdf5f302;

    /// Mixed in when the identifier propagates failure.
    pub const FAILURE: u64 = 0x7d3c8b4a92e15f6d;

    /// Parameter position mixing constants.
    /// Each position gets a unique constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying one boundary call.
///
/// Computed from the registry name plus the canonical signature. The same
/// input always produces the same hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StubHash(pub u64);

impl StubHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: StubHash = StubHash(0);

    /// Compute the hash for a call's name and canonical signature.
    pub fn from_signature(
        name: &str,
        params: &[ValueKind],
        ret: ReturnKind,
        propagates_failure: bool,
    ) -> Self {
        let mut hash = hash_constants::CALL ^ xxh64(name.as_bytes(), 0);
        if propagates_failure {
            hash ^= hash_constants::FAILURE;
        }
        for (i, kind) in params.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps the combination non-commutative so order matters
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ kind_bits(*kind));
        }
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(return_bits(ret));
        StubHash(hash)
    }
}

fn kind_bits(kind: ValueKind) -> u64 {
    match kind {
        ValueKind::Scalar(s) => 0x100 | u8::from(s) as u64,
        ValueKind::Handle => 0x200,
        ValueKind::Enum(backing) => 0x300 | u8::from(backing) as u64,
    }
}

fn return_bits(ret: ReturnKind) -> u64 {
    match ret {
        ReturnKind::Void => 0x400,
        ReturnKind::Value(kind) => kind_bits(kind),
    }
}

impl fmt::Debug for StubHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StubHash({:#018x})", self.0)
    }
}

impl fmt::Display for StubHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::kinds;

    #[test]
    fn same_signature_same_hash() {
        let a = StubHash::from_signature("Lookup", &[kinds::HANDLE, kinds::I32], ReturnKind::Value(kinds::HANDLE), false);
        let b = StubHash::from_signature("Lookup", &[kinds::HANDLE, kinds::I32], ReturnKind::Value(kinds::HANDLE), false);
        assert_eq!(a, b);
    }

    #[test]
    fn parameter_order_matters() {
        let a = StubHash::from_signature("Swap", &[kinds::HANDLE, kinds::I32], ReturnKind::Void, false);
        let b = StubHash::from_signature("Swap", &[kinds::I32, kinds::HANDLE], ReturnKind::Void, false);
        assert_ne!(a, b);
    }

    #[test]
    fn failure_flag_changes_hash() {
        let plain = StubHash::from_signature("Resolve", &[kinds::HANDLE], ReturnKind::Value(kinds::HANDLE), false);
        let failing = StubHash::from_signature("Resolve", &[kinds::HANDLE], ReturnKind::Value(kinds::HANDLE), true);
        assert_ne!(plain, failing);
    }

    #[test]
    fn name_changes_hash() {
        let a = StubHash::from_signature("GetA", &[], ReturnKind::Void, false);
        let b = StubHash::from_signature("GetB", &[], ReturnKind::Void, false);
        assert_ne!(a, b);
    }
}
