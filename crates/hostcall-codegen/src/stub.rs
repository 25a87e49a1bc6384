//! The generated stub artifact.
//!
//! A [`GeneratedStub`] is the per-declaration output of the generator: an
//! ordered marshaling plan (how each parameter becomes a boundary-call
//! slot) and an unmarshaling plan (how the raw outcome becomes a
//! caller-side value). The struct itself is the intermediate
//! representation; [`GeneratedStub::encode`] additionally produces a
//! compact binary form for build steps that persist artifacts, and the
//! `Display` impl renders a human-readable listing.
//!
//! Both forms are deterministic: the same validated declaration always
//! produces byte-identical output.

use std::fmt::{self, Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use hostcall_core::{ScalarKind, SlotKind, StubHash, ValueKind};

/// How one parameter's bits reach its argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MarshalStep {
    /// Copy a primitive scalar into a same-width slot.
    Scalar = 0,
    /// Push a handle's raw bits into an address-sized slot, without
    /// dereferencing.
    HandleBits,
    /// Lower a fixed-width enumeration to its backing integer. Value
    /// ranges are not checked at generation time; exhaustiveness is the
    /// caller's runtime concern.
    EnumToBacking,
}

impl MarshalStep {
    /// The step used for a canonical kind.
    pub fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Scalar(_) => MarshalStep::Scalar,
            ValueKind::Handle => MarshalStep::HandleBits,
            ValueKind::Enum(_) => MarshalStep::EnumToBacking,
        }
    }
}

/// One entry of the marshaling plan.
///
/// Entries are ordered by `position` and pushed in exactly that order;
/// the receiving side's dispatcher reads slots in registry-defined order,
/// not by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarshalOp {
    /// Zero-based parameter position.
    pub position: u16,
    /// The canonical kind of the parameter.
    pub kind: ValueKind,
    /// The slot the parameter occupies.
    pub slot: SlotKind,
    /// How the parameter's bits reach the slot.
    pub step: MarshalStep,
}

/// How the raw result slot becomes a caller-side value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// The call produces nothing.
    Void,
    /// Pass a primitive scalar through from its slot.
    Scalar(ScalarKind),
    /// Reconstruct a handle from word-slot bits.
    Handle,
    /// Reinterpret the backing integer as the enumeration's raw value.
    Enum(ScalarKind),
}

/// The unmarshaling plan for one stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmarshalPlan {
    /// The decode step for the result slot.
    pub decode: Decode,
    /// Whether the plan discriminates a successful result from a
    /// propagated failure before decoding. Present exactly when the
    /// identifier's failure-propagation flag is set; a plan without the
    /// branch ignores the status word entirely.
    pub checks_failure: bool,
}

/// The emitted artifact for one validated declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStub {
    /// Registry name of the call this stub performs.
    pub name: String,
    /// Deterministic identity derived from name + canonical signature.
    pub hash: StubHash,
    /// Ordered marshaling plan, one entry per parameter.
    pub marshal: Vec<MarshalOp>,
    /// Unmarshaling plan for the raw outcome.
    pub unmarshal: UnmarshalPlan,
}

/// Errors decoding a binary stub artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StubCodecError {
    /// The buffer ended before the artifact did.
    #[error("truncated stub artifact at offset {offset}")]
    Truncated { offset: usize },

    /// A tag byte is not a recognized encoding.
    #[error("invalid tag byte {tag:#04x} at offset {offset}")]
    InvalidTag { tag: u8, offset: usize },

    /// The stub name is not valid UTF-8.
    #[error("stub name is not valid UTF-8")]
    BadName,

    /// Bytes remain after the artifact.
    #[error("{remaining} trailing byte(s) after stub artifact")]
    TrailingBytes { remaining: usize },
}

// Kind tag bytes used by the binary encoding.
const KIND_SCALAR: u8 = 0;
const KIND_HANDLE: u8 = 1;
const KIND_ENUM: u8 = 2;

const DECODE_VOID: u8 = 0;
const DECODE_SCALAR: u8 = 1;
const DECODE_HANDLE: u8 = 2;
const DECODE_ENUM: u8 = 3;

impl GeneratedStub {
    /// Encode to the compact binary artifact form.
    ///
    /// Layout (all multi-byte fields big-endian): stub hash (u64), name
    /// length (u16) + name bytes, entry count (u16), then per entry the
    /// kind tag + kind payload + slot + step bytes, then the decode tag +
    /// payload and the failure-branch flag.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.name.len() + self.marshal.len() * 4);
        out.extend_from_slice(&self.hash.0.to_be_bytes());
        out.extend_from_slice(&(self.name.len() as u16).to_be_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(&(self.marshal.len() as u16).to_be_bytes());
        for op in &self.marshal {
            let (tag, payload) = encode_kind(op.kind);
            out.push(tag);
            out.push(payload);
            out.push(op.slot.into());
            out.push(op.step.into());
        }
        let (tag, payload) = encode_decode(self.unmarshal.decode);
        out.push(tag);
        out.push(payload);
        out.push(self.unmarshal.checks_failure as u8);
        out
    }

    /// Decode a binary stub artifact.
    pub fn decode(bytes: &[u8]) -> Result<Self, StubCodecError> {
        let mut reader = Reader { bytes, offset: 0 };
        let hash = StubHash(reader.read_u64()?);
        let name_len = reader.read_u16()? as usize;
        let name = std::str::from_utf8(reader.read_slice(name_len)?)
            .map_err(|_| StubCodecError::BadName)?
            .to_string();
        let count = reader.read_u16()? as usize;
        let mut marshal = Vec::with_capacity(count);
        for position in 0..count {
            let kind = decode_kind(&mut reader)?;
            let slot = reader.read_tag(SlotKind::try_from)?;
            let step = reader.read_tag(MarshalStep::try_from)?;
            marshal.push(MarshalOp {
                position: position as u16,
                kind,
                slot,
                step,
            });
        }
        let decode = decode_decode(&mut reader)?;
        let checks_failure = reader.read_u8()? != 0;
        if reader.offset != bytes.len() {
            return Err(StubCodecError::TrailingBytes {
                remaining: bytes.len() - reader.offset,
            });
        }
        Ok(GeneratedStub {
            name,
            hash,
            marshal,
            unmarshal: UnmarshalPlan {
                decode,
                checks_failure,
            },
        })
    }
}

fn encode_kind(kind: ValueKind) -> (u8, u8) {
    match kind {
        ValueKind::Scalar(s) => (KIND_SCALAR, s.into()),
        ValueKind::Handle => (KIND_HANDLE, 0),
        ValueKind::Enum(backing) => (KIND_ENUM, backing.into()),
    }
}

fn encode_decode(decode: Decode) -> (u8, u8) {
    match decode {
        Decode::Void => (DECODE_VOID, 0),
        Decode::Scalar(s) => (DECODE_SCALAR, s.into()),
        Decode::Handle => (DECODE_HANDLE, 0),
        Decode::Enum(backing) => (DECODE_ENUM, backing.into()),
    }
}

fn decode_kind(reader: &mut Reader<'_>) -> Result<ValueKind, StubCodecError> {
    let offset = reader.offset;
    let tag = reader.read_u8()?;
    let payload = reader.read_u8()?;
    match tag {
        KIND_SCALAR => Ok(ValueKind::Scalar(scalar_from(payload, offset + 1)?)),
        KIND_HANDLE => Ok(ValueKind::Handle),
        KIND_ENUM => Ok(ValueKind::Enum(scalar_from(payload, offset + 1)?)),
        _ => Err(StubCodecError::InvalidTag { tag, offset }),
    }
}

fn decode_decode(reader: &mut Reader<'_>) -> Result<Decode, StubCodecError> {
    let offset = reader.offset;
    let tag = reader.read_u8()?;
    let payload = reader.read_u8()?;
    match tag {
        DECODE_VOID => Ok(Decode::Void),
        DECODE_SCALAR => Ok(Decode::Scalar(scalar_from(payload, offset + 1)?)),
        DECODE_HANDLE => Ok(Decode::Handle),
        DECODE_ENUM => Ok(Decode::Enum(scalar_from(payload, offset + 1)?)),
        _ => Err(StubCodecError::InvalidTag { tag, offset }),
    }
}

fn scalar_from(payload: u8, offset: usize) -> Result<ScalarKind, StubCodecError> {
    ScalarKind::try_from(payload).map_err(|_| StubCodecError::InvalidTag {
        tag: payload,
        offset,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn read_u8(&mut self) -> Result<u8, StubCodecError> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or(StubCodecError::Truncated {
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_u16(&mut self) -> Result<u16, StubCodecError> {
        let slice = self.read_slice(2)?;
        Ok(u16::from_be_bytes([slice[0], slice[1]]))
    }

    fn read_u64(&mut self) -> Result<u64, StubCodecError> {
        let slice = self.read_slice(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(slice);
        Ok(u64::from_be_bytes(buf))
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], StubCodecError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(StubCodecError::Truncated {
                offset: self.offset,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_tag<T, E>(&mut self, parse: impl FnOnce(u8) -> Result<T, E>) -> Result<T, StubCodecError> {
        let offset = self.offset;
        let tag = self.read_u8()?;
        parse(tag).map_err(|_| StubCodecError::InvalidTag { tag, offset })
    }
}

impl Display for GeneratedStub {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "stub {} {}", self.name, self.hash)?;
        for op in &self.marshal {
            let step = match op.step {
                MarshalStep::Scalar => "scalar copy",
                MarshalStep::HandleBits => "handle bits",
                MarshalStep::EnumToBacking => "enum to backing",
            };
            writeln!(
                f,
                "  push arg {}: {} -> {} slot ({step})",
                op.position, op.kind, op.slot
            )?;
        }
        writeln!(f, "  call {}", self.name)?;
        if self.unmarshal.checks_failure {
            writeln!(f, "  branch: failure -> reconstruct failure handle")?;
        }
        match self.unmarshal.decode {
            Decode::Void => write!(f, "  decode: void"),
            Decode::Scalar(s) => write!(f, "  decode: {s}"),
            Decode::Handle => write!(f, "  decode: handle"),
            Decode::Enum(backing) => write!(f, "  decode: enum({backing})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcall_core::kinds;

    fn sample() -> GeneratedStub {
        GeneratedStub {
            name: "Lookup".into(),
            hash: StubHash(0x1234_5678_9abc_def0),
            marshal: vec![
                MarshalOp {
                    position: 0,
                    kind: kinds::HANDLE,
                    slot: SlotKind::Word,
                    step: MarshalStep::HandleBits,
                },
                MarshalOp {
                    position: 1,
                    kind: kinds::I32,
                    slot: SlotKind::I32,
                    step: MarshalStep::Scalar,
                },
            ],
            unmarshal: UnmarshalPlan {
                decode: Decode::Handle,
                checks_failure: false,
            },
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let stub = sample();
        let bytes = stub.encode();
        assert_eq!(GeneratedStub::decode(&bytes).unwrap(), stub);
    }

    #[test]
    fn truncated_artifact_is_rejected() {
        let bytes = sample().encode();
        let err = GeneratedStub::decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, StubCodecError::Truncated { .. }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = sample().encode();
        bytes.push(0);
        assert_eq!(
            GeneratedStub::decode(&bytes).unwrap_err(),
            StubCodecError::TrailingBytes { remaining: 1 }
        );
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let mut bytes = sample().encode();
        // First marshal entry's kind tag sits after hash + name field.
        let kind_tag_offset = 8 + 2 + "Lookup".len() + 2;
        bytes[kind_tag_offset] = 0x7f;
        assert!(matches!(
            GeneratedStub::decode(&bytes).unwrap_err(),
            StubCodecError::InvalidTag { tag: 0x7f, .. }
        ));
    }

    #[test]
    fn rendering_lists_slots_in_order() {
        let rendered = format!("{}", sample());
        let push_lines: Vec<_> = rendered
            .lines()
            .filter(|line| line.trim_start().starts_with("push"))
            .collect();
        assert_eq!(push_lines.len(), 2);
        assert!(push_lines[0].contains("arg 0"));
        assert!(push_lines[0].contains("word"));
        assert!(push_lines[1].contains("arg 1"));
        assert!(push_lines[1].contains("i32"));
    }
}
