//! hostcall - compile-time stub generation for cross-heap calls.
//!
//! Calls that cross the boundary between two independently managed heaps
//! bypass the normal type system: arguments are pushed onto a low-level
//! call stack in an exact order and width, and nothing at runtime can
//! assert that the caller and the receiving dispatcher agree. Hand-written
//! crossing code is therefore error-prone in exactly the ways that are
//! hardest to debug.
//!
//! This crate generates the crossing code instead. A shared
//! [`CallRegistry`] defines every boundary call's canonical signature;
//! marked declarations in a compilation unit are scanned, checked against
//! the registry, and compiled into per-call stubs whose marshaling and
//! unmarshaling plans are provably arity- and kind-correct.
//!
//! # Pipeline
//!
//! ```text
//! Unit tree -> UnitScanner -> EntryPointGuard -> SignatureValidator -> StubEmitter
//!                  |                                      |
//!                  +-- malformed markers ----+------------+-- mismatches
//!                                            v
//!                                       Diagnostics
//! ```
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use hostcall::prelude::*;
//!
//! let registry = CallRegistry::builder()
//!     .define(CallIdentifier::new(
//!         "Lookup",
//!         CallSignature::new(vec![kinds::HANDLE, kinds::I32], ReturnKind::Value(kinds::HANDLE)),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let arena = Bump::new();
//! let unit = UnitBuilder::new(&arena, "compiler_calls")
//!     .owner(
//!         OwnerBuilder::new(&arena, "HostCalls", OwnerRole::Caller)
//!             .method(
//!                 MethodBuilder::new(&arena, "lookup")
//!                     .marker("id = \"Lookup\"")
//!                     .param("obj", TypeExpr::Handle("RemoteObject"))
//!                     .param("index", TypeExpr::Scalar(ScalarKind::I32))
//!                     .returns(TypeExpr::Handle("RemoteObject"))
//!                     .finish(),
//!             )
//!             .finish(),
//!     )
//!     .finish();
//!
//! let result = StubGenerator::new(&registry).generate(&UnitScanner::new(unit));
//! let stubs = result.into_stubs().unwrap();
//! assert_eq!(stubs.len(), 1);
//! assert_eq!(stubs[0].marshal.len(), 2);
//! ```

mod generator;

pub use generator::{StubGenerator, generate_stubs};

// Unit trees are arena-allocated; builders take a reference to this.
pub use bumpalo::Bump;

pub use hostcall_codegen::{
    CallerValue, Decode, EntryPointGuard, GeneratedStub, GenerationPass, GenerationResult,
    MarshalOp, MarshalStep, SignatureValidator, StubCodecError, StubEmitter, UnmarshalPlan,
    ValidatedCall, invoke_stub,
};
pub use hostcall_core::{
    BoundaryCall, CallDeclaration, CallIdentifier, CallSignature, CallStatus, DeclSide,
    DeclarationError, DeclaredType, Diagnostic, Diagnostics, Handle, HostCallError, InvokeError,
    RawOutcome, RawValue, RegistryError, ReturnDecl, ReturnKind, ScalarKind, ScanError, SlotKind,
    Span, StubHash, ValidateError, ValueKind, kinds,
};
pub use hostcall_registry::{CallRegistry, CallRegistryBuilder};
pub use hostcall_scanner::{
    DeclarationSource, Ident, MarkerAttr, MethodBuilder, MethodDecl, OwnerBuilder, OwnerDecl,
    OwnerRole, ParamDecl, ScanOutput, TypeExpr, Unit, UnitBuilder, UnitScanner, parse_marker,
};

/// Everything needed for the common registry-build-scan-generate flow.
pub mod prelude {
    pub use crate::generator::{StubGenerator, generate_stubs};
    pub use hostcall_codegen::{CallerValue, GeneratedStub, GenerationResult, invoke_stub};
    pub use hostcall_core::{
        BoundaryCall, CallIdentifier, CallSignature, Handle, RawOutcome, RawValue, ReturnKind,
        ScalarKind, Span, kinds,
    };
    pub use hostcall_registry::CallRegistry;
    pub use hostcall_scanner::{
        MethodBuilder, OwnerBuilder, OwnerRole, TypeExpr, UnitBuilder, UnitScanner,
    };
}
