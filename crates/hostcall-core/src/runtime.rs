//! Raw boundary values and the native-call capability.
//!
//! The call primitive that actually crosses the boundary is an external
//! collaborator, not part of this crate's core. It is modeled here as the
//! [`BoundaryCall`] trait: a capability taking raw argument slots and
//! returning a raw outcome. Generated stubs drive it through their
//! marshal/unmarshal plans; nothing in this crate dereferences what a
//! [`Handle`] points at.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::hash::StubHash;
use crate::kind::SlotKind;

/// An opaque, address-sized reference to an object that lives on the
/// other side of the boundary.
///
/// The holding side treats it as pure bits: it can be stored, compared,
/// and passed back across the boundary, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// The null handle.
    pub const NULL: Handle = Handle(0);

    /// Wrap raw handle bits received from the boundary.
    pub fn from_bits(bits: u64) -> Self {
        Handle(bits)
    }

    /// The raw bits, for pushing into a word slot.
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Whether this is the null handle.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A raw value occupying one call-primitive slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Address-sized handle bits.
    Word(u64),
}

impl RawValue {
    /// The slot kind this raw value occupies.
    pub fn slot_kind(&self) -> SlotKind {
        match self {
            RawValue::I8(_) => SlotKind::I8,
            RawValue::I16(_) => SlotKind::I16,
            RawValue::I32(_) => SlotKind::I32,
            RawValue::I64(_) => SlotKind::I64,
            RawValue::F32(_) => SlotKind::F32,
            RawValue::F64(_) => SlotKind::F64,
            RawValue::Word(_) => SlotKind::Word,
        }
    }
}

/// Status word returned by the call primitive.
///
/// The boundary is untyped, so the status arrives as a raw byte; stubs
/// whose identifier propagates failure decode it with `try_from` and
/// reconstruct a caller-side failure on [`CallStatus::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CallStatus {
    /// The call completed; the value slot holds the result (if any).
    Ok = 0,
    /// A failure propagated from the other side; the value slot holds the
    /// failure object's handle bits.
    Failed = 1,
}

/// The raw result of one boundary call: a status word plus an optional
/// value slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawOutcome {
    /// Raw status word. Stubs without a failure branch ignore it.
    pub status: u8,
    /// The returned slot, absent for void calls.
    pub value: Option<RawValue>,
}

impl RawOutcome {
    /// A successful call returning a value.
    pub fn value(value: RawValue) -> Self {
        Self {
            status: CallStatus::Ok.into(),
            value: Some(value),
        }
    }

    /// A successful void call.
    pub fn void() -> Self {
        Self {
            status: CallStatus::Ok.into(),
            value: None,
        }
    }

    /// A propagated failure carrying the failure object's handle.
    pub fn failure(token: Handle) -> Self {
        Self {
            status: CallStatus::Failed.into(),
            value: Some(RawValue::Word(token.bits())),
        }
    }
}

/// The native-call capability generated stubs invoke.
///
/// Implementations perform the actual boundary crossing: push the given
/// slots in order, transfer control to the receiving side's dispatcher
/// for `target`, and report the raw outcome. The capability is passed to
/// stub invocation explicitly; there is no process-wide lookup.
pub trait BoundaryCall {
    /// Perform the boundary call identified by `target` with the given
    /// argument slots, in order.
    fn call(&self, target: StubHash, args: &[RawValue]) -> RawOutcome;
}

impl<F> BoundaryCall for F
where
    F: Fn(StubHash, &[RawValue]) -> RawOutcome,
{
    fn call(&self, target: StubHash, args: &[RawValue]) -> RawOutcome {
        (self)(target, args)
    }
}
