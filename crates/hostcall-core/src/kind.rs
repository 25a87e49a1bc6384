//! Boundary type kinds and admissibility.
//!
//! Two independently managed heaps communicate only through a restricted
//! call primitive, so every argument and return value has to be reduced to
//! a raw slot the primitive can carry. This module defines:
//!
//! - [`ScalarKind`] - primitive scalars with a fixed width
//! - [`ValueKind`] - canonical kinds a registry signature is made of
//! - [`ReturnKind`] - a signature's return position (may be void)
//! - [`SlotKind`] - the raw slot widths of the call primitive
//! - [`DeclaredType`] - the source-language typed form a front-end reports
//!
//! Admissibility is a derived judgment, not stored state: a declared type
//! is boundary-admissible when [`DeclaredType::admissible_kind`] returns
//! `Some`. Strings and object graphs are never admissible directly; they
//! must cross as handles or through an adapter maintained outside this
//! crate.

use std::fmt::{self, Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// A primitive scalar with a fixed width.
///
/// The `u8` representation is stable; it is used as a tag byte in the
/// binary stub encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ScalarKind {
    /// Boolean, carried in an 8-bit slot.
    Bool = 0,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Whether this scalar is a fixed-width integer.
    ///
    /// Only fixed-width integers may back a boundary-crossing enumeration.
    pub fn is_fixed_width_int(self) -> bool {
        !matches!(self, ScalarKind::Bool | ScalarKind::F32 | ScalarKind::F64)
    }

    /// The call-primitive slot this scalar is carried in (same width).
    pub fn slot(self) -> SlotKind {
        match self {
            ScalarKind::Bool | ScalarKind::I8 | ScalarKind::U8 => SlotKind::I8,
            ScalarKind::I16 | ScalarKind::U16 => SlotKind::I16,
            ScalarKind::I32 | ScalarKind::U32 => SlotKind::I32,
            ScalarKind::I64 | ScalarKind::U64 => SlotKind::I64,
            ScalarKind::F32 => SlotKind::F32,
            ScalarKind::F64 => SlotKind::F64,
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// A canonical, boundary-admissible value kind.
///
/// Registry signatures are built from these. Everything a signature names
/// is either a primitive scalar, an opaque handle, or a fixed-width
/// enumeration lowered to its backing integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A primitive scalar.
    Scalar(ScalarKind),
    /// An opaque, address-sized reference to an object on the other side
    /// of the boundary. Never dereferenced on the holding side.
    Handle,
    /// A fixed-width enumeration, carried as its backing integer.
    /// The backing scalar must be a fixed-width integer; registry
    /// construction rejects anything else.
    Enum(ScalarKind),
}

impl ValueKind {
    /// The call-primitive slot a value of this kind occupies.
    pub fn slot(self) -> SlotKind {
        match self {
            ValueKind::Scalar(s) => s.slot(),
            ValueKind::Handle => SlotKind::Word,
            ValueKind::Enum(backing) => backing.slot(),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(s) => write!(f, "{s}"),
            ValueKind::Handle => write!(f, "handle"),
            ValueKind::Enum(backing) => write!(f, "enum({backing})"),
        }
    }
}

/// The return position of a canonical signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReturnKind {
    /// The call produces no value.
    #[default]
    Void,
    /// The call produces a value of the given kind.
    Value(ValueKind),
}

impl Display for ReturnKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReturnKind::Void => write!(f, "void"),
            ReturnKind::Value(kind) => write!(f, "{kind}"),
        }
    }
}

/// A raw argument/result slot of the call primitive.
///
/// The receiving side's dispatcher reads slots in registry-defined order,
/// so slot kinds and their order are load-bearing. The `u8` representation
/// is stable and used in the binary stub encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SlotKind {
    I8 = 0,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Address-sized slot for handle bits.
    Word,
}

impl Display for SlotKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::I8 => "i8",
            SlotKind::I16 => "i16",
            SlotKind::I32 => "i32",
            SlotKind::I64 => "i64",
            SlotKind::F32 => "f32",
            SlotKind::F64 => "f64",
            SlotKind::Word => "word",
        };
        write!(f, "{name}")
    }
}

/// A declared type as reported by the front-end, in source-language form.
///
/// Declarations arrive typed the way the source language types them; the
/// validator lowers each declared type to its canonical [`ValueKind`]
/// through [`DeclaredType::admissible_kind`] before comparing against the
/// registry signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// A primitive scalar.
    Scalar(ScalarKind),
    /// A named opaque handle type (a typed word standing in for an object
    /// that lives on the other side of the boundary).
    Handle(String),
    /// A named fixed-width enumeration with its backing scalar.
    Enum {
        /// Source-language name of the enumeration.
        name: String,
        /// The scalar the enumeration is backed by.
        backing: ScalarKind,
    },
    /// A string. Not admissible; must cross as a handle or through an
    /// encode/decode adapter outside this crate.
    Str,
    /// An arbitrary object graph, by type name. Not admissible.
    Object(String),
}

impl DeclaredType {
    /// The admissibility judgment: the canonical kind this declared type
    /// lowers to, or `None` when it cannot cross the boundary directly.
    ///
    /// An enumeration backed by anything other than a fixed-width integer
    /// is inadmissible.
    pub fn admissible_kind(&self) -> Option<ValueKind> {
        match self {
            DeclaredType::Scalar(s) => Some(ValueKind::Scalar(*s)),
            DeclaredType::Handle(_) => Some(ValueKind::Handle),
            DeclaredType::Enum { backing, .. } => {
                backing.is_fixed_width_int().then_some(ValueKind::Enum(*backing))
            }
            DeclaredType::Str | DeclaredType::Object(_) => None,
        }
    }

    /// Shorthand for a scalar declared type.
    pub fn scalar(kind: ScalarKind) -> Self {
        DeclaredType::Scalar(kind)
    }

    /// Shorthand for a named handle declared type.
    pub fn handle(name: impl Into<String>) -> Self {
        DeclaredType::Handle(name.into())
    }
}

impl Display for DeclaredType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Scalar(s) => write!(f, "{s}"),
            DeclaredType::Handle(name) => write!(f, "handle({name})"),
            DeclaredType::Enum { name, backing } => write!(f, "enum {name}: {backing}"),
            DeclaredType::Str => write!(f, "string"),
            DeclaredType::Object(name) => write!(f, "object({name})"),
        }
    }
}

/// Canonical kind constants for registry definitions and tests.
pub mod kinds {
    use super::{ScalarKind, ValueKind};

    pub const BOOL: ValueKind = ValueKind::Scalar(ScalarKind::Bool);
    pub const I8: ValueKind = ValueKind::Scalar(ScalarKind::I8);
    pub const I16: ValueKind = ValueKind::Scalar(ScalarKind::I16);
    pub const I32: ValueKind = ValueKind::Scalar(ScalarKind::I32);
    pub const I64: ValueKind = ValueKind::Scalar(ScalarKind::I64);
    pub const U8: ValueKind = ValueKind::Scalar(ScalarKind::U8);
    pub const U16: ValueKind = ValueKind::Scalar(ScalarKind::U16);
    pub const U32: ValueKind = ValueKind::Scalar(ScalarKind::U32);
    pub const U64: ValueKind = ValueKind::Scalar(ScalarKind::U64);
    pub const F32: ValueKind = ValueKind::Scalar(ScalarKind::F32);
    pub const F64: ValueKind = ValueKind::Scalar(ScalarKind::F64);
    pub const HANDLE: ValueKind = ValueKind::Handle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_slots_are_same_width() {
        assert_eq!(ScalarKind::Bool.slot(), SlotKind::I8);
        assert_eq!(ScalarKind::U16.slot(), SlotKind::I16);
        assert_eq!(ScalarKind::I32.slot(), SlotKind::I32);
        assert_eq!(ScalarKind::U64.slot(), SlotKind::I64);
        assert_eq!(ScalarKind::F64.slot(), SlotKind::F64);
    }

    #[test]
    fn handles_occupy_word_slots() {
        assert_eq!(ValueKind::Handle.slot(), SlotKind::Word);
    }

    #[test]
    fn enums_lower_to_their_backing_slot() {
        assert_eq!(ValueKind::Enum(ScalarKind::I16).slot(), SlotKind::I16);
    }

    #[test]
    fn strings_and_objects_are_inadmissible() {
        assert_eq!(DeclaredType::Str.admissible_kind(), None);
        assert_eq!(DeclaredType::Object("Config".into()).admissible_kind(), None);
    }

    #[test]
    fn float_backed_enum_is_inadmissible() {
        let declared = DeclaredType::Enum {
            name: "Mode".into(),
            backing: ScalarKind::F32,
        };
        assert_eq!(declared.admissible_kind(), None);
    }

    #[test]
    fn handle_lowers_to_handle_kind() {
        let declared = DeclaredType::handle("RemoteObject");
        assert_eq!(declared.admissible_kind(), Some(ValueKind::Handle));
    }

    #[test]
    fn slot_kind_tags_round_trip() {
        for slot in [
            SlotKind::I8,
            SlotKind::I16,
            SlotKind::I32,
            SlotKind::I64,
            SlotKind::F32,
            SlotKind::F64,
            SlotKind::Word,
        ] {
            let tag: u8 = slot.into();
            assert_eq!(SlotKind::try_from(tag), Ok(slot));
        }
    }
}
