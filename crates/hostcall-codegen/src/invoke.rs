//! Stub plan execution against a call capability.
//!
//! A [`GeneratedStub`] is executable intermediate representation:
//! [`invoke_stub`] runs its marshaling plan over typed caller values,
//! drives the [`BoundaryCall`] capability, and runs its unmarshaling plan
//! over the raw outcome. The capability is passed in explicitly; nothing
//! here consults process-wide state.
//!
//! Plan-execution errors indicate a caller bug (a validated stub can only
//! see them when fed arguments that disagree with its own plan); a
//! propagated boundary failure surfaces as [`InvokeError::Propagated`]
//! with the failure object reconstructed as an opaque caller-side handle.

use hostcall_core::{
    BoundaryCall, CallStatus, Handle, InvokeError, RawOutcome, RawValue, ScalarKind, SlotKind,
};

use crate::stub::{Decode, GeneratedStub, MarshalOp, MarshalStep};

/// A typed caller-side value entering or leaving a stub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallerValue {
    Void,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// An opaque handle; only its bits cross the boundary.
    Handle(Handle),
    /// A fixed-width enumeration's raw value, widened to 64 bits. Range
    /// exhaustiveness is the caller's concern.
    Enum(i64),
}

/// Execute one stub call: marshal, cross the boundary, unmarshal.
pub fn invoke_stub(
    stub: &GeneratedStub,
    boundary: &dyn BoundaryCall,
    args: &[CallerValue],
) -> Result<CallerValue, InvokeError> {
    if args.len() != stub.marshal.len() {
        return Err(InvokeError::ArityMismatch {
            name: stub.name.clone(),
            expected: stub.marshal.len(),
            got: args.len(),
        });
    }

    let mut raw_args = Vec::with_capacity(args.len());
    for (op, value) in stub.marshal.iter().zip(args) {
        raw_args.push(marshal_arg(stub, op, *value)?);
    }

    let outcome = boundary.call(stub.hash, &raw_args);
    unmarshal_outcome(stub, outcome)
}

fn marshal_arg(
    stub: &GeneratedStub,
    op: &MarshalOp,
    value: CallerValue,
) -> Result<RawValue, InvokeError> {
    let mismatch = || InvokeError::ArgumentMismatch {
        name: stub.name.clone(),
        position: op.position as usize,
        expected: op.kind,
    };

    match op.step {
        MarshalStep::Scalar => {
            let hostcall_core::ValueKind::Scalar(scalar) = op.kind else {
                return Err(mismatch());
            };
            marshal_scalar(scalar, value).ok_or_else(mismatch)
        }
        MarshalStep::HandleBits => match value {
            CallerValue::Handle(handle) => Ok(RawValue::Word(handle.bits())),
            _ => Err(mismatch()),
        },
        MarshalStep::EnumToBacking => match value {
            CallerValue::Enum(raw) => Ok(int_slot(op.slot, raw)),
            _ => Err(mismatch()),
        },
    }
}

fn marshal_scalar(scalar: ScalarKind, value: CallerValue) -> Option<RawValue> {
    match (scalar, value) {
        (ScalarKind::Bool, CallerValue::Bool(v)) => Some(RawValue::I8(v as i8)),
        (ScalarKind::I8, CallerValue::I8(v)) => Some(RawValue::I8(v)),
        (ScalarKind::I16, CallerValue::I16(v)) => Some(RawValue::I16(v)),
        (ScalarKind::I32, CallerValue::I32(v)) => Some(RawValue::I32(v)),
        (ScalarKind::I64, CallerValue::I64(v)) => Some(RawValue::I64(v)),
        (ScalarKind::U8, CallerValue::U8(v)) => Some(RawValue::I8(v as i8)),
        (ScalarKind::U16, CallerValue::U16(v)) => Some(RawValue::I16(v as i16)),
        (ScalarKind::U32, CallerValue::U32(v)) => Some(RawValue::I32(v as i32)),
        (ScalarKind::U64, CallerValue::U64(v)) => Some(RawValue::I64(v as i64)),
        (ScalarKind::F32, CallerValue::F32(v)) => Some(RawValue::F32(v)),
        (ScalarKind::F64, CallerValue::F64(v)) => Some(RawValue::F64(v)),
        _ => None,
    }
}

/// Truncate a widened enum value into its backing slot.
fn int_slot(slot: SlotKind, raw: i64) -> RawValue {
    match slot {
        SlotKind::I8 => RawValue::I8(raw as i8),
        SlotKind::I16 => RawValue::I16(raw as i16),
        SlotKind::I32 => RawValue::I32(raw as i32),
        _ => RawValue::I64(raw),
    }
}

fn unmarshal_outcome(
    stub: &GeneratedStub,
    outcome: RawOutcome,
) -> Result<CallerValue, InvokeError> {
    if stub.unmarshal.checks_failure {
        let status =
            CallStatus::try_from(outcome.status).map_err(|_| InvokeError::UnknownStatus {
                name: stub.name.clone(),
                status: outcome.status,
            })?;
        if status == CallStatus::Failed {
            let token = match outcome.value {
                Some(RawValue::Word(bits)) => Handle::from_bits(bits),
                _ => Handle::NULL,
            };
            return Err(InvokeError::Propagated {
                name: stub.name.clone(),
                failure: token,
            });
        }
    }

    match stub.unmarshal.decode {
        Decode::Void => match outcome.value {
            None => Ok(CallerValue::Void),
            Some(_) => Err(InvokeError::UnexpectedResult {
                name: stub.name.clone(),
            }),
        },
        Decode::Scalar(scalar) => {
            let raw = expect_slot(stub, outcome, scalar.slot())?;
            Ok(unmarshal_scalar(scalar, raw))
        }
        Decode::Handle => {
            let raw = expect_slot(stub, outcome, SlotKind::Word)?;
            match raw {
                RawValue::Word(bits) => Ok(CallerValue::Handle(Handle::from_bits(bits))),
                _ => unreachable!("slot checked above"),
            }
        }
        Decode::Enum(backing) => {
            let raw = expect_slot(stub, outcome, backing.slot())?;
            Ok(CallerValue::Enum(widen_int(raw)))
        }
    }
}

fn expect_slot(
    stub: &GeneratedStub,
    outcome: RawOutcome,
    expected: SlotKind,
) -> Result<RawValue, InvokeError> {
    let raw = outcome.value.ok_or_else(|| InvokeError::MissingResult {
        name: stub.name.clone(),
        expected,
    })?;
    if raw.slot_kind() != expected {
        return Err(InvokeError::ResultMismatch {
            name: stub.name.clone(),
            expected,
            got: raw.slot_kind(),
        });
    }
    Ok(raw)
}

fn unmarshal_scalar(scalar: ScalarKind, raw: RawValue) -> CallerValue {
    match (scalar, raw) {
        (ScalarKind::Bool, RawValue::I8(v)) => CallerValue::Bool(v != 0),
        (ScalarKind::I8, RawValue::I8(v)) => CallerValue::I8(v),
        (ScalarKind::I16, RawValue::I16(v)) => CallerValue::I16(v),
        (ScalarKind::I32, RawValue::I32(v)) => CallerValue::I32(v),
        (ScalarKind::I64, RawValue::I64(v)) => CallerValue::I64(v),
        (ScalarKind::U8, RawValue::I8(v)) => CallerValue::U8(v as u8),
        (ScalarKind::U16, RawValue::I16(v)) => CallerValue::U16(v as u16),
        (ScalarKind::U32, RawValue::I32(v)) => CallerValue::U32(v as u32),
        (ScalarKind::U64, RawValue::I64(v)) => CallerValue::U64(v as u64),
        (ScalarKind::F32, RawValue::F32(v)) => CallerValue::F32(v),
        (ScalarKind::F64, RawValue::F64(v)) => CallerValue::F64(v),
        _ => unreachable!("slot checked before decode"),
    }
}

fn widen_int(raw: RawValue) -> i64 {
    match raw {
        RawValue::I8(v) => v as i64,
        RawValue::I16(v) => v as i64,
        RawValue::I32(v) => v as i64,
        RawValue::I64(v) => v,
        _ => unreachable!("slot checked before decode"),
    }
}
