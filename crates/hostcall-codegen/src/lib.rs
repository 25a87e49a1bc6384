//! Stub generation for boundary-crossing calls.
//!
//! This crate turns scanned declarations into per-call stubs with provable
//! type and arity correctness:
//!
//! - [`guard`]: excludes the boundary's own receiving-side implementation
//! - [`validate`]: checks each declaration against the shared registry
//! - [`emit`]: builds one deterministic stub per validated declaration
//! - [`stub`]: the stub IR, its binary encoding, and its rendering
//! - [`invoke`]: executes a stub's plans against a call capability
//! - [`pass`]: the batch driver collecting diagnostics across a unit

pub mod emit;
pub mod guard;
pub mod invoke;
pub mod pass;
pub mod stub;
pub mod validate;

pub use emit::StubEmitter;
pub use guard::EntryPointGuard;
pub use invoke::{CallerValue, invoke_stub};
pub use pass::{GenerationPass, GenerationResult};
pub use stub::{Decode, GeneratedStub, MarshalOp, MarshalStep, StubCodecError, UnmarshalPlan};
pub use validate::{SignatureValidator, ValidatedCall};
