//! The batch generation pass.
//!
//! One pass per compilation unit: guard, duplicate-claim tracking,
//! validation, emission. The registry is read-only for the pass's
//! lifetime and declarations are independent of each other, so processing
//! order only affects which of two conflicting claims is reported (the
//! later-discovered one fails).
//!
//! Per-declaration failures are collected, not thrown: the pass always
//! sees the whole unit and reports every failing declaration at once.
//! A unit with any failure has no usable artifact - [`GenerationResult`]
//! surfaces its stubs only when the diagnostics list is empty.

use rustc_hash::FxHashMap;

use hostcall_core::{
    CallDeclaration, Diagnostic, Diagnostics, DeclaredType, ReturnDecl, Span, ValidateError,
};
use hostcall_registry::CallRegistry;

use crate::emit::StubEmitter;
use crate::guard::EntryPointGuard;
use crate::stub::GeneratedStub;
use crate::validate::SignatureValidator;

/// Everything one pass produced: emitted stubs plus all per-declaration
/// failures, each in discovery order.
#[derive(Debug, Default)]
pub struct GenerationResult {
    /// Stubs for declarations that survived guard and validation.
    pub stubs: Vec<GeneratedStub>,
    /// Per-declaration failures.
    pub diagnostics: Diagnostics,
}

impl GenerationResult {
    /// Whether the pass completed without any per-declaration failure.
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Surface the stub set as a usable artifact.
    ///
    /// A unit with any failing declaration yields its diagnostics
    /// instead; partially generated stubs are never handed out.
    pub fn into_stubs(self) -> Result<Vec<GeneratedStub>, Diagnostics> {
        if self.diagnostics.is_empty() {
            Ok(self.stubs)
        } else {
            Err(self.diagnostics)
        }
    }
}

/// The first claim recorded for an identifier within one pass.
#[derive(Debug)]
struct ClaimRecord {
    params: Vec<DeclaredType>,
    ret: ReturnDecl,
    span: Span,
}

/// Drives guard, validation, and emission over one unit's declarations.
pub struct GenerationPass<'r> {
    registry: &'r CallRegistry,
}

impl<'r> GenerationPass<'r> {
    /// Create a pass over a registry.
    ///
    /// The registry arrives as an explicit reference; a broken registry
    /// never reaches this point because its builder refuses to produce
    /// one.
    pub fn new(registry: &'r CallRegistry) -> Self {
        Self { registry }
    }

    /// Run the pass over a unit's declarations, in discovery order.
    pub fn run(&self, decls: impl IntoIterator<Item = CallDeclaration>) -> GenerationResult {
        let validator = SignatureValidator::new(self.registry);
        let mut claims: FxHashMap<String, ClaimRecord> = FxHashMap::default();
        let mut result = GenerationResult::default();

        for decl in decls {
            if !EntryPointGuard::is_caller_side(&decl) {
                continue;
            }

            // A claim of an unknown identifier is reported as such and
            // never recorded; duplicate tracking only applies to names
            // the registry actually defines.
            if !self.registry.contains(&decl.claimed) {
                result.diagnostics.push(Diagnostic::validate(
                    decl.span,
                    ValidateError::UnknownIdentifier {
                        name: decl.claimed.clone(),
                    },
                ));
                continue;
            }

            if let Some(first) = claims.get(&decl.claimed) {
                if first.params != decl.params || first.ret != decl.ret {
                    result.diagnostics.push(Diagnostic::validate(
                        decl.span,
                        ValidateError::DuplicateClaim {
                            name: decl.claimed.clone(),
                            first: first.span,
                        },
                    ));
                    continue;
                }
            } else {
                claims.insert(
                    decl.claimed.clone(),
                    ClaimRecord {
                        params: decl.params.clone(),
                        ret: decl.ret.clone(),
                        span: decl.span,
                    },
                );
            }

            let span = decl.span;
            match validator.validate(decl) {
                Ok(validated) => result.stubs.push(StubEmitter::emit(&validated)),
                Err(error) => result.diagnostics.push(Diagnostic::validate(span, error)),
            }
        }

        result
    }
}
