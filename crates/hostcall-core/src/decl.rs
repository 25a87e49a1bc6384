//! Discovered call-site declarations.
//!
//! A [`CallDeclaration`] is one candidate call site found by a scan pass:
//! a method the front-end marked as implementing a boundary call. It is
//! created per pass, consumed by the guard/validator/emitter in the same
//! pass, and never persisted.

use std::fmt::{self, Display, Formatter};

use crate::kind::DeclaredType;
use crate::span::Span;

/// Which side of the boundary a declaration belongs to.
///
/// Determined structurally at scan time from the enclosing owner's role,
/// not by comparing owner names against a well-known dispatcher path. The
/// receiving side's own dispatch implementation is tagged [`Receiver`] and
/// excluded from caller-side stub generation.
///
/// [`Receiver`]: DeclSide::Receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclSide {
    /// A caller-side declaration; a stub is generated for it.
    Caller,
    /// Part of the boundary's own receiving/dispatch implementation;
    /// silently excluded from generation.
    Receiver,
}

/// The declared return of a call site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReturnDecl {
    /// The declared return type, or `None` for void.
    pub ty: Option<DeclaredType>,
    /// Whether the declaration accounts for a failure propagated across
    /// the boundary (declares an explicit failure channel).
    pub fallible: bool,
}

impl ReturnDecl {
    /// A void return with no failure channel.
    pub fn void() -> Self {
        Self::default()
    }

    /// A value return with no failure channel.
    pub fn value(ty: DeclaredType) -> Self {
        Self {
            ty: Some(ty),
            fallible: false,
        }
    }

    /// Mark this return as carrying an explicit failure channel.
    pub fn fallible(mut self) -> Self {
        self.fallible = true;
        self
    }
}

impl Display for ReturnDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{ty}")?,
            None => write!(f, "void")?,
        }
        if self.fallible {
            write!(f, " !")?;
        }
        Ok(())
    }
}

/// A discovered candidate call site.
///
/// Produced by the scanner, filtered by the entry-point guard, checked by
/// the validator, and turned into a stub by the emitter. The declared
/// types are in source-language form; lowering to canonical kinds happens
/// during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDeclaration {
    /// The registry identifier this declaration claims to implement.
    pub claimed: String,
    /// Declared parameter types, in source order.
    pub params: Vec<DeclaredType>,
    /// Declared return type and failure channel.
    pub ret: ReturnDecl,
    /// Name of the enclosing owner, for diagnostics.
    pub owner: String,
    /// Which side of the boundary the enclosing owner implements.
    pub side: DeclSide,
    /// Where the declaration appears in the compilation unit.
    pub span: Span,
}
