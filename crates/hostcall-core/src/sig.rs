//! Canonical call signatures and registry identifiers.
//!
//! A [`CallIdentifier`] is one member of the closed enumeration both sides
//! of the boundary link against: a unique name plus a fixed
//! [`CallSignature`]. Identifiers are defined once at build time and never
//! mutated; declarations reference them by name.

use std::fmt::{self, Display, Formatter};

use crate::hash::StubHash;
use crate::kind::{ReturnKind, ValueKind};

/// The canonical signature of one boundary call.
///
/// Parameter kinds are positional and load-bearing: the receiving side's
/// dispatcher reads argument slots in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignature {
    /// Ordered parameter kinds.
    pub params: Vec<ValueKind>,
    /// Return kind.
    pub ret: ReturnKind,
    /// Whether failures raised on the receiving side are expected to
    /// propagate back across the boundary to the caller.
    pub propagates_failure: bool,
}

impl CallSignature {
    /// Create a signature with no failure propagation.
    pub fn new(params: Vec<ValueKind>, ret: ReturnKind) -> Self {
        Self {
            params,
            ret,
            propagates_failure: false,
        }
    }

    /// Create a signature whose failures propagate across the boundary.
    pub fn with_failure(params: Vec<ValueKind>, ret: ReturnKind) -> Self {
        Self {
            params,
            ret,
            propagates_failure: true,
        }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for CallSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, kind) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}")?;
        }
        write!(f, ") -> {}", self.ret)?;
        if self.propagates_failure {
            write!(f, " !")?;
        }
        Ok(())
    }
}

/// One member of the shared call registry.
///
/// Both sides of the boundary are built against an identical set of
/// identifiers; the name is the link between a declaration and its
/// canonical signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallIdentifier {
    /// Unique registry name.
    pub name: String,
    /// Canonical signature.
    pub signature: CallSignature,
}

impl CallIdentifier {
    /// Define an identifier from a name and signature.
    pub fn new(name: impl Into<String>, signature: CallSignature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    /// The deterministic stub identity for this identifier.
    ///
    /// Derived from name plus canonical signature, so a signature change
    /// cannot leave a stale stub silently targeting the old shape.
    pub fn stub_hash(&self) -> StubHash {
        StubHash::from_signature(
            &self.name,
            &self.signature.params,
            self.signature.ret,
            self.signature.propagates_failure,
        )
    }
}

impl Display for CallIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::kinds;

    #[test]
    fn signature_renders_positionally() {
        let sig = CallSignature::new(vec![kinds::HANDLE, kinds::I32], ReturnKind::Value(kinds::HANDLE));
        assert_eq!(format!("{sig}"), "(handle, i32) -> handle");
    }

    #[test]
    fn failing_signature_renders_marker() {
        let sig = CallSignature::with_failure(vec![], ReturnKind::Void);
        assert_eq!(format!("{sig}"), "() -> void !");
    }

    #[test]
    fn identifier_hash_tracks_signature() {
        let a = CallIdentifier::new("Lookup", CallSignature::new(vec![kinds::HANDLE], ReturnKind::Void));
        let b = CallIdentifier::new("Lookup", CallSignature::new(vec![kinds::I64], ReturnKind::Void));
        assert_ne!(a.stub_hash(), b.stub_hash());
    }
}
