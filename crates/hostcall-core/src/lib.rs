//! Core data model for boundary-call stub generation.
//!
//! Two independently managed heaps that share no object identity
//! communicate only through a restricted call primitive. This crate holds
//! everything the generator's phases agree on:
//!
//! - [`span`]: source locations for diagnostics
//! - [`kind`]: boundary type kinds and the admissibility judgment
//! - [`hash`]: deterministic stub identity
//! - [`sig`]: canonical signatures and registry identifiers
//! - [`decl`]: discovered call-site declarations
//! - [`error`]: the full error taxonomy and diagnostics channel
//! - [`runtime`]: raw slot values and the native-call capability trait

pub mod decl;
pub mod error;
pub mod hash;
pub mod kind;
pub mod runtime;
pub mod sig;
pub mod span;

pub use decl::{CallDeclaration, DeclSide, ReturnDecl};
pub use error::{
    DeclarationError, Diagnostic, Diagnostics, HostCallError, InvokeError, RegistryError,
    ScanError, ValidateError,
};
pub use hash::StubHash;
pub use kind::{DeclaredType, ReturnKind, ScalarKind, SlotKind, ValueKind, kinds};
pub use runtime::{BoundaryCall, CallStatus, Handle, RawOutcome, RawValue};
pub use sig::{CallIdentifier, CallSignature};
pub use span::Span;
