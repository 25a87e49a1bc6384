//! The end-to-end generation pipeline.
//!
//! [`StubGenerator`] ties the phases together for the common case: scan a
//! compilation unit, filter and validate the declarations, emit stubs,
//! and report every per-declaration failure from the whole run in one
//! result.

use hostcall_codegen::{GenerationPass, GenerationResult};
use hostcall_core::Diagnostics;
use hostcall_registry::CallRegistry;
use hostcall_scanner::DeclarationSource;

/// Generates stubs for one compilation unit at a time.
///
/// Holds only a reference to the shared registry; each [`generate`] call
/// is an independent, deterministic batch pass.
///
/// [`generate`]: StubGenerator::generate
pub struct StubGenerator<'r> {
    registry: &'r CallRegistry,
}

impl<'r> StubGenerator<'r> {
    /// Create a generator over a registry.
    pub fn new(registry: &'r CallRegistry) -> Self {
        Self { registry }
    }

    /// Run the full pipeline over one declaration source.
    ///
    /// Scan failures come first in the combined diagnostics, then
    /// validation failures, each group in discovery order.
    pub fn generate(&self, source: &impl DeclarationSource) -> GenerationResult {
        let scan = source.scan();
        let generated = GenerationPass::new(self.registry).run(scan.declarations);

        let mut diagnostics = scan.diagnostics;
        diagnostics.extend(generated.diagnostics);
        GenerationResult {
            stubs: generated.stubs,
            diagnostics,
        }
    }

    /// The registry this generator validates against.
    pub fn registry(&self) -> &'r CallRegistry {
        self.registry
    }
}

/// Convenience wrapper returning the stubs or the combined diagnostics.
///
/// Equivalent to `generate(..).into_stubs()`. A unit with any failing
/// declaration yields `Err` with every failure from the run; partial stub
/// sets are never handed out.
pub fn generate_stubs(
    registry: &CallRegistry,
    source: &impl DeclarationSource,
) -> Result<Vec<hostcall_codegen::GeneratedStub>, Diagnostics> {
    StubGenerator::new(registry).generate(source).into_stubs()
}
