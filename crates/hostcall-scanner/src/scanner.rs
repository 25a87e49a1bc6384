//! Declaration discovery over a compilation unit.
//!
//! [`UnitScanner`] walks a unit's owners and emits one [`CallDeclaration`]
//! per marked method. Scanning is non-recursive: only methods explicitly
//! carrying a boundary-call marker are emitted, and unmarked methods are
//! skipped silently. A marker whose identifier reference cannot be parsed
//! is a per-declaration failure; the scan continues for the rest of the
//! unit.
//!
//! The [`DeclarationSource`] trait keeps the downstream passes independent
//! of this particular tree shape: any front-end able to produce a finite
//! sequence of declaration records can drive the generator.

use hostcall_core::{CallDeclaration, DeclSide, Diagnostic, Diagnostics, ReturnDecl};

use crate::marker::parse_marker;
use crate::unit::{OwnerRole, Unit};

/// Everything one scan pass discovered: declaration records in discovery
/// order plus per-declaration scan failures.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Discovered declarations, in source order.
    pub declarations: Vec<CallDeclaration>,
    /// Malformed-marker failures, in source order.
    pub diagnostics: Diagnostics,
}

/// A finite source of declaration records for one compilation unit.
///
/// Restartable: `scan` may be called again for a fresh pass over the same
/// unit; it is not resumable mid-scan.
pub trait DeclarationSource {
    /// Run one scan pass.
    fn scan(&self) -> ScanOutput;
}

/// Scans a [`Unit`] tree.
pub struct UnitScanner<'ast> {
    unit: Unit<'ast>,
}

impl<'ast> UnitScanner<'ast> {
    /// Create a scanner over a unit.
    pub fn new(unit: Unit<'ast>) -> Self {
        Self { unit }
    }
}

impl DeclarationSource for UnitScanner<'_> {
    fn scan(&self) -> ScanOutput {
        let mut output = ScanOutput::default();
        for owner in self.unit.owners() {
            let side = match owner.role {
                OwnerRole::Caller => DeclSide::Caller,
                OwnerRole::Dispatcher => DeclSide::Receiver,
            };
            for method in owner.methods {
                let Some(marker) = method.marker else {
                    continue;
                };
                let claimed = match parse_marker(marker.args, marker.span) {
                    Ok(name) => name,
                    Err(error) => {
                        // The dispatcher's own implementation is never a
                        // caller-side error source; its methods are
                        // excluded silently whatever their shape.
                        if side == DeclSide::Caller {
                            output.diagnostics.push(Diagnostic::scan(error));
                        }
                        continue;
                    }
                };
                output.declarations.push(CallDeclaration {
                    claimed,
                    params: method.params.iter().map(|p| p.ty.to_declared()).collect(),
                    ret: ReturnDecl {
                        ty: method.ret.map(|ty| ty.to_declared()),
                        fallible: method.fallible,
                    },
                    owner: owner.name.name.to_string(),
                    side,
                    span: method.span,
                });
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{MethodBuilder, OwnerBuilder, TypeExpr, UnitBuilder};
    use bumpalo::Bump;
    use hostcall_core::{DeclaredType, ScalarKind, Span};

    #[test]
    fn emits_only_marked_methods() {
        let arena = Bump::new();
        let unit = UnitBuilder::new(&arena, "u")
            .owner(
                OwnerBuilder::new(&arena, "Calls", OwnerRole::Caller)
                    .method(
                        MethodBuilder::new(&arena, "lookup")
                            .marker("id = \"Lookup\"")
                            .param("obj", TypeExpr::Handle("Remote"))
                            .returns(TypeExpr::Handle("Remote"))
                            .finish(),
                    )
                    .method(MethodBuilder::new(&arena, "helper").finish())
                    .finish(),
            )
            .finish();

        let output = UnitScanner::new(unit).scan();
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.declarations.len(), 1);
        let decl = &output.declarations[0];
        assert_eq!(decl.claimed, "Lookup");
        assert_eq!(decl.owner, "Calls");
        assert_eq!(decl.side, DeclSide::Caller);
        assert_eq!(decl.params, vec![DeclaredType::handle("Remote")]);
    }

    #[test]
    fn malformed_marker_is_reported_and_scan_continues() {
        let arena = Bump::new();
        let unit = UnitBuilder::new(&arena, "u")
            .owner(
                OwnerBuilder::new(&arena, "Calls", OwnerRole::Caller)
                    .method(
                        MethodBuilder::new(&arena, "broken")
                            .at(Span::new(3, 1, 6))
                            .marker("id =")
                            .finish(),
                    )
                    .method(
                        MethodBuilder::new(&arena, "shutdown")
                            .marker("id = \"Shutdown\"")
                            .finish(),
                    )
                    .finish(),
            )
            .finish();

        let output = UnitScanner::new(unit).scan();
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.declarations.len(), 1);
        assert_eq!(output.declarations[0].claimed, "Shutdown");
        let diag = output.diagnostics.iter().next().unwrap();
        assert!(diag.identifier.is_none());
        assert_eq!(diag.span, Span::new(3, 1, 6));
    }

    #[test]
    fn dispatcher_methods_are_tagged_receiver_side() {
        let arena = Bump::new();
        let unit = UnitBuilder::new(&arena, "u")
            .owner(
                OwnerBuilder::new(&arena, "EntryPoints", OwnerRole::Dispatcher)
                    .method(
                        MethodBuilder::new(&arena, "lookup")
                            .marker("id = \"Lookup\"")
                            .finish(),
                    )
                    .finish(),
            )
            .finish();

        let output = UnitScanner::new(unit).scan();
        assert_eq!(output.declarations.len(), 1);
        assert_eq!(output.declarations[0].side, DeclSide::Receiver);
    }

    #[test]
    fn dispatcher_marker_problems_are_silent() {
        let arena = Bump::new();
        let unit = UnitBuilder::new(&arena, "u")
            .owner(
                OwnerBuilder::new(&arena, "EntryPoints", OwnerRole::Dispatcher)
                    .method(MethodBuilder::new(&arena, "broken").marker("??").finish())
                    .finish(),
            )
            .finish();

        let output = UnitScanner::new(unit).scan();
        assert!(output.diagnostics.is_empty());
        assert!(output.declarations.is_empty());
    }

    #[test]
    fn scan_is_restartable() {
        let arena = Bump::new();
        let unit = UnitBuilder::new(&arena, "u")
            .owner(
                OwnerBuilder::new(&arena, "Calls", OwnerRole::Caller)
                    .method(
                        MethodBuilder::new(&arena, "get_flag")
                            .marker("id = GetFlag")
                            .returns(TypeExpr::Scalar(ScalarKind::Bool))
                            .finish(),
                    )
                    .finish(),
            )
            .finish();

        let scanner = UnitScanner::new(unit);
        let first = scanner.scan();
        let second = scanner.scan();
        assert_eq!(first.declarations, second.declarations);
    }
}
