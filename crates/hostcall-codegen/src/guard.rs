//! Entry-point exclusion.
//!
//! The registry's receiving-side dispatcher also names every call it
//! handles, so a naive scan would pick its implementation methods up as
//! caller-side declarations and generate stubs that call themselves. The
//! guard is the structural filter that prevents this: a pure predicate
//! over the side tag the scanner derived from the enclosing owner's role.

use hostcall_core::{CallDeclaration, DeclSide};

/// Excludes the boundary's own receiving-side implementation from
/// caller-side stub generation.
pub struct EntryPointGuard;

impl EntryPointGuard {
    /// Whether this declaration should be treated as caller-side.
    ///
    /// Receiver-side declarations are excluded silently, whatever their
    /// signatures look like; they are the dispatch implementation, not
    /// call sites. Applied once per declaration, before validation.
    pub fn is_caller_side(decl: &CallDeclaration) -> bool {
        decl.side == DeclSide::Caller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcall_core::{ReturnDecl, Span};

    fn decl(side: DeclSide) -> CallDeclaration {
        CallDeclaration {
            claimed: "Lookup".into(),
            params: vec![],
            ret: ReturnDecl::void(),
            owner: "EntryPoints".into(),
            side,
            span: Span::default(),
        }
    }

    #[test]
    fn caller_side_passes() {
        assert!(EntryPointGuard::is_caller_side(&decl(DeclSide::Caller)));
    }

    #[test]
    fn receiver_side_is_excluded() {
        assert!(!EntryPointGuard::is_caller_side(&decl(DeclSide::Receiver)));
    }
}
