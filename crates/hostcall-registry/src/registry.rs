//! CallRegistry - the canonical enumeration of boundary calls.
//!
//! This module provides [`CallRegistry`], the shared source of truth both
//! sides of the boundary link against. Each identifier carries a fixed
//! signature; declarations reference identifiers by name and are checked
//! against these signatures during validation.
//!
//! # Storage Model
//!
//! - Identifiers are stored by name in an `FxHashMap` for O(1) lookup.
//! - Definition order is kept separately so exhaustive passes iterate
//!   deterministically.
//!
//! # Consistency
//!
//! The registry is built once through [`CallRegistryBuilder`] and is
//! read-only afterwards. `build()` rejects inconsistent definitions
//! (duplicate names, empty names, enums with non-integer backings) -
//! any of these means the registry artifact itself is broken, which is
//! fatal for every pass that would use it.
//!
//! # Example
//!
//! ```
//! use hostcall_core::{CallIdentifier, CallSignature, ReturnKind, kinds};
//! use hostcall_registry::CallRegistry;
//!
//! let registry = CallRegistry::builder()
//!     .define(CallIdentifier::new(
//!         "Lookup",
//!         CallSignature::new(vec![kinds::HANDLE, kinds::I32], ReturnKind::Value(kinds::HANDLE)),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.get("Lookup").is_some());
//! assert!(registry.get("Missing").is_none());
//! ```

use rustc_hash::FxHashMap;

use hostcall_core::{CallIdentifier, RegistryError, ValueKind};

/// The canonical, read-only enumeration of boundary calls.
///
/// Passed by explicit reference to every pass that needs it; there is no
/// process-wide registry lookup. An absent identifier is an `Option`, and
/// what that absence means is the caller's decision.
#[derive(Debug, Default)]
pub struct CallRegistry {
    /// Identifiers by name (primary storage).
    identifiers: FxHashMap<String, CallIdentifier>,
    /// Names in definition order, for deterministic iteration.
    order: Vec<String>,
}

impl CallRegistry {
    /// Start building a registry.
    pub fn builder() -> CallRegistryBuilder {
        CallRegistryBuilder::default()
    }

    /// Look up an identifier by name.
    pub fn get(&self, name: &str) -> Option<&CallIdentifier> {
        self.identifiers.get(name)
    }

    /// Whether an identifier with this name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.identifiers.contains_key(name)
    }

    /// Iterate over all identifiers in definition order.
    ///
    /// Identifiers with zero declarations are expected; names may be
    /// reserved for future use.
    pub fn iter(&self) -> impl Iterator<Item = &CallIdentifier> {
        self.order.iter().map(|name| &self.identifiers[name])
    }

    /// Number of defined identifiers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Accumulates identifier definitions and checks consistency at build.
#[derive(Debug, Default)]
pub struct CallRegistryBuilder {
    definitions: Vec<CallIdentifier>,
}

impl CallRegistryBuilder {
    /// Add one identifier definition.
    pub fn define(mut self, identifier: CallIdentifier) -> Self {
        self.definitions.push(identifier);
        self
    }

    /// Add many identifier definitions.
    pub fn define_all(mut self, identifiers: impl IntoIterator<Item = CallIdentifier>) -> Self {
        self.definitions.extend(identifiers);
        self
    }

    /// Check consistency and produce the read-only registry.
    ///
    /// Fails on the first contradictory definition: a duplicate or empty
    /// name, or an enum kind backed by a non-integer. Such a registry
    /// cannot meaningfully validate anything, so no pass is allowed to
    /// start from it.
    pub fn build(self) -> Result<CallRegistry, RegistryError> {
        let mut registry = CallRegistry::default();
        for identifier in self.definitions {
            if identifier.name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            check_enum_backings(&identifier)?;
            if registry.identifiers.contains_key(&identifier.name) {
                return Err(RegistryError::DuplicateIdentifier {
                    name: identifier.name,
                });
            }
            registry.order.push(identifier.name.clone());
            registry
                .identifiers
                .insert(identifier.name.clone(), identifier);
        }
        Ok(registry)
    }
}

fn check_enum_backings(identifier: &CallIdentifier) -> Result<(), RegistryError> {
    let ret_kind = match identifier.signature.ret {
        hostcall_core::ReturnKind::Value(kind) => Some(kind),
        hostcall_core::ReturnKind::Void => None,
    };
    for kind in identifier.signature.params.iter().copied().chain(ret_kind) {
        if let ValueKind::Enum(backing) = kind {
            if !backing.is_fixed_width_int() {
                return Err(RegistryError::InvalidEnumBacking {
                    name: identifier.name.clone(),
                    backing,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcall_core::{CallSignature, ReturnKind, ScalarKind, kinds};

    fn lookup() -> CallIdentifier {
        CallIdentifier::new(
            "Lookup",
            CallSignature::new(
                vec![kinds::HANDLE, kinds::I32],
                ReturnKind::Value(kinds::HANDLE),
            ),
        )
    }

    #[test]
    fn lookup_by_name() {
        let registry = CallRegistry::builder().define(lookup()).build().unwrap();
        assert_eq!(registry.len(), 1);
        let id = registry.get("Lookup").unwrap();
        assert_eq!(id.signature.arity(), 2);
        assert!(registry.get("Shutdown").is_none());
    }

    #[test]
    fn iteration_follows_definition_order() {
        let registry = CallRegistry::builder()
            .define(CallIdentifier::new("B", CallSignature::new(vec![], ReturnKind::Void)))
            .define(CallIdentifier::new("A", CallSignature::new(vec![], ReturnKind::Void)))
            .define(CallIdentifier::new("C", CallSignature::new(vec![], ReturnKind::Void)))
            .build()
            .unwrap();
        let names: Vec<_> = registry.iter().map(|id| id.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn duplicate_definition_is_fatal() {
        let result = CallRegistry::builder()
            .define(lookup())
            .define(CallIdentifier::new(
                "Lookup",
                CallSignature::new(vec![], ReturnKind::Void),
            ))
            .build();
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateIdentifier {
                name: "Lookup".into()
            }
        );
    }

    #[test]
    fn empty_name_is_fatal() {
        let result = CallRegistry::builder()
            .define(CallIdentifier::new("", CallSignature::new(vec![], ReturnKind::Void)))
            .build();
        assert_eq!(result.unwrap_err(), RegistryError::EmptyName);
    }

    #[test]
    fn float_backed_enum_is_fatal() {
        let result = CallRegistry::builder()
            .define(CallIdentifier::new(
                "SetMode",
                CallSignature::new(
                    vec![ValueKind::Enum(ScalarKind::F64)],
                    ReturnKind::Void,
                ),
            ))
            .build();
        assert_eq!(
            result.unwrap_err(),
            RegistryError::InvalidEnumBacking {
                name: "SetMode".into(),
                backing: ScalarKind::F64,
            }
        );
    }
}
