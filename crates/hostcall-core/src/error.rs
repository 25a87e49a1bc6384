//! Unified error types for boundary-call stub generation.
//!
//! This module provides a consistent error type hierarchy for all phases
//! of a generation pass: registry construction, declaration scanning,
//! signature validation, and stub invocation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! HostCallError (top-level wrapper)
//! ├── RegistryError - registry construction/consistency errors (pass-fatal)
//! ├── ScanError     - marker parsing errors (per-declaration)
//! ├── ValidateError - signature validation errors (per-declaration)
//! └── InvokeError   - stub plan execution errors (runtime)
//! ```
//!
//! Per-declaration failures are collected into [`Diagnostics`] and reported
//! together after the full scan; a registry error aborts the pass before
//! any stub is emitted.

use thiserror::Error;

use crate::decl::ReturnDecl;
use crate::kind::{DeclaredType, ReturnKind, ScalarKind, SlotKind, ValueKind};
use crate::runtime::Handle;
use crate::span::Span;

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors that make the shared registry internally contradictory.
///
/// Any of these is fatal for an entire pass: the registry and the
/// declarations were built from mismatched or broken definitions, so any
/// partial result would be misleading. Surfaced at registry build time,
/// before a pass exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two definitions share the same identifier name.
    #[error("duplicate call identifier definition '{name}'")]
    DuplicateIdentifier { name: String },

    /// An identifier was defined with an empty name.
    #[error("call identifier defined with an empty name")]
    EmptyName,

    /// An enum kind in a canonical signature is backed by something other
    /// than a fixed-width integer.
    #[error("identifier '{name}': enum backed by {backing}, expected a fixed-width integer")]
    InvalidEnumBacking { name: String, backing: ScalarKind },
}

// ============================================================================
// Scan Errors
// ============================================================================

/// Errors that occur while scanning a compilation unit for declarations.
///
/// Scan failures are per-declaration: the offending declaration is
/// excluded from downstream passes and the scan continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A boundary-call marker is present but its identifier reference is
    /// missing or unparsable.
    #[error("malformed boundary-call marker at {span}: {detail}")]
    MalformedMarker { detail: String, span: Span },
}

impl ScanError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ScanError::MalformedMarker { span, .. } => *span,
        }
    }
}

// ============================================================================
// Validation Errors
// ============================================================================

/// Errors that occur while checking a declaration against the registry.
///
/// Three families: an unresolvable identifier, a signature mismatch
/// (arity, parameter kind, admissibility, return kind, or a missing
/// failure channel), and a duplicate claim. All are fatal for the
/// declaration and never coerced; validation of other declarations
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// The claimed identifier is not present in the registry. The registry
    /// and the declarations were built from mismatched versions.
    #[error("unknown call identifier '{name}'")]
    UnknownIdentifier { name: String },

    /// Parameter count differs from the canonical signature.
    /// `position` is the first missing or first extra position.
    #[error(
        "'{name}' expects {expected} parameter(s), declaration has {declared} (first mismatch at position {position})"
    )]
    ArityMismatch {
        name: String,
        declared: usize,
        expected: usize,
        position: usize,
    },

    /// A declared parameter lowers to a kind other than the canonical one.
    #[error("'{name}' parameter {position}: declared {declared}, registry expects {expected}")]
    ParamKindMismatch {
        name: String,
        position: usize,
        declared: DeclaredType,
        expected: ValueKind,
    },

    /// A declared parameter cannot cross the boundary directly.
    #[error(
        "'{name}' parameter {position}: {declared} is not boundary-admissible (pass it as a handle or through an adapter)"
    )]
    InadmissibleParam {
        name: String,
        position: usize,
        declared: DeclaredType,
    },

    /// The declared return lowers to a kind other than the canonical one.
    #[error("'{name}' return: declared {declared}, registry expects {expected}")]
    ReturnKindMismatch {
        name: String,
        declared: ReturnDecl,
        expected: ReturnKind,
    },

    /// The declared return type cannot cross the boundary directly.
    #[error("'{name}' return: {declared} is not boundary-admissible")]
    InadmissibleReturn { name: String, declared: DeclaredType },

    /// The identifier propagates failure but the declaration has no
    /// failure channel to receive it.
    #[error("'{name}' propagates failure but the declaration has no failure channel")]
    MissingFailureChannel { name: String },

    /// A different declaration already claimed this identifier with a
    /// conflicting signature. Fatal for the later-discovered declaration.
    #[error("duplicate claim of '{name}' with a conflicting signature (first claimed at {first})")]
    DuplicateClaim { name: String, first: Span },
}

impl ValidateError {
    /// The claimed identifier name this error is about.
    pub fn identifier(&self) -> &str {
        match self {
            ValidateError::UnknownIdentifier { name }
            | ValidateError::ArityMismatch { name, .. }
            | ValidateError::ParamKindMismatch { name, .. }
            | ValidateError::InadmissibleParam { name, .. }
            | ValidateError::ReturnKindMismatch { name, .. }
            | ValidateError::InadmissibleReturn { name, .. }
            | ValidateError::MissingFailureChannel { name }
            | ValidateError::DuplicateClaim { name, .. } => name,
        }
    }

    /// The offending parameter position, where applicable.
    pub fn position(&self) -> Option<usize> {
        match self {
            ValidateError::ArityMismatch { position, .. }
            | ValidateError::ParamKindMismatch { position, .. }
            | ValidateError::InadmissibleParam { position, .. } => Some(*position),
            _ => None,
        }
    }
}

// ============================================================================
// Invocation Errors
// ============================================================================

/// Errors raised while executing a generated stub's plans at runtime.
///
/// Arity and kind mismatches here indicate a caller bug (validated stubs
/// cannot produce them from registry-conforming callers); `Propagated`
/// carries a failure raised on the other side of the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    /// Wrong number of caller arguments for the marshaling plan.
    #[error("stub '{name}' takes {expected} argument(s), {got} supplied")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A caller argument does not match its marshaling slot.
    #[error("stub '{name}' argument {position}: expected {expected}")]
    ArgumentMismatch {
        name: String,
        position: usize,
        expected: ValueKind,
    },

    /// The call produced no raw value but the plan decodes one.
    #[error("stub '{name}': call produced no value but the plan expects {expected}")]
    MissingResult { name: String, expected: SlotKind },

    /// The call produced a raw value of the wrong slot kind.
    #[error("stub '{name}': call produced a {got} slot, plan expects {expected}")]
    ResultMismatch {
        name: String,
        expected: SlotKind,
        got: SlotKind,
    },

    /// The call produced a raw value but the plan decodes void.
    #[error("stub '{name}': call produced a value but the plan decodes void")]
    UnexpectedResult { name: String },

    /// The raw status word is not a recognized call status.
    #[error("stub '{name}': unrecognized status word {status}")]
    UnknownStatus { name: String, status: u8 },

    /// The call failed on the other side of the boundary; the failure
    /// object was reconstructed caller-side as an opaque handle.
    #[error("call '{name}' failed on the other side of the boundary (failure handle {failure})")]
    Propagated { name: String, failure: Handle },
}

// ============================================================================
// Diagnostics
// ============================================================================

/// A per-declaration failure from scanning or validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The declaration's marker could not be parsed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The declaration failed validation against the registry.
    #[error(transparent)]
    Validate(#[from] ValidateError),
}

/// One structured message for one failed declaration.
///
/// Carries the claimed identifier name (when it was resolvable), the
/// source location, and the failure itself. The offending parameter
/// position, where applicable, lives on the underlying error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The claimed identifier name, if the marker was parsable that far.
    pub identifier: Option<String>,
    /// Where the failing declaration appears.
    pub span: Span,
    /// What went wrong.
    pub error: DeclarationError,
}

impl Diagnostic {
    /// Build a diagnostic from a scan failure (no resolvable identifier).
    pub fn scan(error: ScanError) -> Self {
        let span = error.span();
        Self {
            identifier: None,
            span,
            error: DeclarationError::Scan(error),
        }
    }

    /// Build a diagnostic from a validation failure.
    pub fn validate(span: Span, error: ValidateError) -> Self {
        Self {
            identifier: Some(error.identifier().to_string()),
            span,
            error: DeclarationError::Validate(error),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at {}: {}", self.span, self.error)
    }
}

/// All per-declaration failures collected over one pass.
///
/// The pass does not stop at the first failure; every failing declaration
/// in the unit gets its own entry, maximizing diagnostic value per run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Whether any failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded failures in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Merge another collection into this one, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error wrapper for unified handling across phases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostCallError {
    /// The shared registry is internally contradictory.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A marker failed to parse.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// A declaration failed validation.
    #[error("validation error: {0}")]
    Validate(#[from] ValidateError),

    /// A stub plan failed to execute.
    #[error("invocation error: {0}")]
    Invoke(#[from] InvokeError),

    /// The pass completed but produced per-declaration failures; the
    /// unit's stub set is not a usable artifact.
    #[error("stub generation failed with {count} diagnostic(s):\n{0}", count = .0.len())]
    Generation(Diagnostics),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::kinds;

    #[test]
    fn validate_error_reports_position() {
        let err = ValidateError::ParamKindMismatch {
            name: "Lookup".into(),
            position: 1,
            declared: DeclaredType::scalar(ScalarKind::I64),
            expected: kinds::I32,
        };
        assert_eq!(err.position(), Some(1));
        assert_eq!(err.identifier(), "Lookup");
        let message = format!("{err}");
        assert!(message.contains("parameter 1"));
        assert!(message.contains("i64"));
        assert!(message.contains("i32"));
    }

    #[test]
    fn diagnostics_render_one_per_line() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::validate(
            Span::new(3, 5, 10),
            ValidateError::UnknownIdentifier {
                name: "DoesNotExist".into(),
            },
        ));
        diags.push(Diagnostic::scan(ScanError::MalformedMarker {
            detail: "missing identifier".into(),
            span: Span::new(9, 1, 4),
        }));
        let rendered = format!("{diags}");
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("at 3:5"));
        assert!(rendered.contains("DoesNotExist"));
    }

    #[test]
    fn scan_diagnostic_has_no_identifier() {
        let diag = Diagnostic::scan(ScanError::MalformedMarker {
            detail: "empty marker body".into(),
            span: Span::point(2, 1),
        });
        assert!(diag.identifier.is_none());
    }
}
