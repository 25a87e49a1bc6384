//! Signature validation against the shared registry.
//!
//! Every surviving declaration is checked against its claimed
//! identifier's canonical signature before a stub is emitted:
//!
//! 1. the claimed identifier must resolve in the registry;
//! 2. declared parameters must match the canonical kinds positionally,
//!    with every declared type boundary-admissible;
//! 3. the declared return must match the canonical return kind, and a
//!    failure-propagating identifier requires an explicit failure channel
//!    on the declaration (the only permitted widening is the reverse:
//!    declaring a channel the identifier never uses).
//!
//! Validation is deterministic and total over its input; a mismatch is
//! always an error naming the first offending position, never a coercion.

use hostcall_core::{CallDeclaration, CallIdentifier, ReturnKind, ValidateError};
use hostcall_registry::CallRegistry;

/// A declaration that passed validation, paired with its registry
/// identifier. The emitter builds plans from the canonical signature.
#[derive(Debug)]
pub struct ValidatedCall<'r> {
    /// The validated declaration.
    pub decl: CallDeclaration,
    /// The registry identifier it implements.
    pub identifier: &'r CallIdentifier,
}

/// Checks declarations against the registry.
pub struct SignatureValidator<'r> {
    registry: &'r CallRegistry,
}

impl<'r> SignatureValidator<'r> {
    /// Create a validator over a registry.
    pub fn new(registry: &'r CallRegistry) -> Self {
        Self { registry }
    }

    /// Validate one declaration.
    pub fn validate(&self, decl: CallDeclaration) -> Result<ValidatedCall<'r>, ValidateError> {
        let identifier =
            self.registry
                .get(&decl.claimed)
                .ok_or_else(|| ValidateError::UnknownIdentifier {
                    name: decl.claimed.clone(),
                })?;
        let signature = &identifier.signature;

        // Positional comparison over the common prefix; a kind or
        // admissibility mismatch there wins over an arity citation.
        let common = decl.params.len().min(signature.params.len());
        for position in 0..common {
            let declared = &decl.params[position];
            let expected = signature.params[position];
            match declared.admissible_kind() {
                None => {
                    return Err(ValidateError::InadmissibleParam {
                        name: decl.claimed.clone(),
                        position,
                        declared: declared.clone(),
                    });
                }
                Some(kind) if kind != expected => {
                    return Err(ValidateError::ParamKindMismatch {
                        name: decl.claimed.clone(),
                        position,
                        declared: declared.clone(),
                        expected,
                    });
                }
                Some(_) => {}
            }
        }
        if decl.params.len() != signature.params.len() {
            // First missing or first extra position.
            return Err(ValidateError::ArityMismatch {
                name: decl.claimed.clone(),
                declared: decl.params.len(),
                expected: signature.params.len(),
                position: common,
            });
        }

        match (&decl.ret.ty, signature.ret) {
            (None, ReturnKind::Void) => {}
            (Some(declared), ReturnKind::Value(expected)) => match declared.admissible_kind() {
                None => {
                    return Err(ValidateError::InadmissibleReturn {
                        name: decl.claimed.clone(),
                        declared: declared.clone(),
                    });
                }
                Some(kind) if kind != expected => {
                    return Err(ValidateError::ReturnKindMismatch {
                        name: decl.claimed.clone(),
                        declared: decl.ret.clone(),
                        expected: signature.ret,
                    });
                }
                Some(_) => {}
            },
            _ => {
                return Err(ValidateError::ReturnKindMismatch {
                    name: decl.claimed.clone(),
                    declared: decl.ret.clone(),
                    expected: signature.ret,
                });
            }
        }

        if signature.propagates_failure && !decl.ret.fallible {
            return Err(ValidateError::MissingFailureChannel {
                name: decl.claimed.clone(),
            });
        }

        Ok(ValidatedCall { decl, identifier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcall_core::{
        CallSignature, DeclSide, DeclaredType, ReturnDecl, ScalarKind, Span, kinds,
    };

    fn registry() -> CallRegistry {
        CallRegistry::builder()
            .define(CallIdentifier::new(
                "Lookup",
                CallSignature::new(
                    vec![kinds::HANDLE, kinds::I32],
                    ReturnKind::Value(kinds::HANDLE),
                ),
            ))
            .define(CallIdentifier::new(
                "Resolve",
                CallSignature::with_failure(
                    vec![kinds::HANDLE],
                    ReturnKind::Value(kinds::HANDLE),
                ),
            ))
            .build()
            .unwrap()
    }

    fn lookup_decl(params: Vec<DeclaredType>, ret: ReturnDecl) -> CallDeclaration {
        CallDeclaration {
            claimed: "Lookup".into(),
            params,
            ret,
            owner: "Calls".into(),
            side: DeclSide::Caller,
            span: Span::new(1, 1, 0),
        }
    }

    #[test]
    fn conforming_declaration_validates() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![
                DeclaredType::handle("Remote"),
                DeclaredType::scalar(ScalarKind::I32),
            ],
            ReturnDecl::value(DeclaredType::handle("Remote")),
        );
        let validated = validator.validate(decl).unwrap();
        assert_eq!(validated.identifier.name, "Lookup");
    }

    #[test]
    fn unknown_identifier_is_fatal() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let mut decl = lookup_decl(vec![], ReturnDecl::void());
        decl.claimed = "DoesNotExist".into();
        assert_eq!(
            validator.validate(decl).unwrap_err(),
            ValidateError::UnknownIdentifier {
                name: "DoesNotExist".into()
            }
        );
    }

    #[test]
    fn kind_mismatch_cites_position() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![
                DeclaredType::handle("Remote"),
                DeclaredType::scalar(ScalarKind::I64),
            ],
            ReturnDecl::value(DeclaredType::handle("Remote")),
        );
        let err = validator.validate(decl).unwrap_err();
        assert_eq!(err.position(), Some(1));
        assert!(matches!(err, ValidateError::ParamKindMismatch { .. }));
    }

    #[test]
    fn missing_parameter_cites_first_absent_position() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![DeclaredType::handle("Remote")],
            ReturnDecl::value(DeclaredType::handle("Remote")),
        );
        let err = validator.validate(decl).unwrap_err();
        assert_eq!(
            err,
            ValidateError::ArityMismatch {
                name: "Lookup".into(),
                declared: 1,
                expected: 2,
                position: 1,
            }
        );
    }

    #[test]
    fn extra_parameter_cites_first_extra_position() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![
                DeclaredType::handle("Remote"),
                DeclaredType::scalar(ScalarKind::I32),
                DeclaredType::scalar(ScalarKind::Bool),
            ],
            ReturnDecl::value(DeclaredType::handle("Remote")),
        );
        let err = validator.validate(decl).unwrap_err();
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn string_parameter_is_inadmissible() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![DeclaredType::Str, DeclaredType::scalar(ScalarKind::I32)],
            ReturnDecl::value(DeclaredType::handle("Remote")),
        );
        let err = validator.validate(decl).unwrap_err();
        assert!(matches!(
            err,
            ValidateError::InadmissibleParam { position: 0, .. }
        ));
    }

    #[test]
    fn missing_failure_channel_is_fatal() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = CallDeclaration {
            claimed: "Resolve".into(),
            params: vec![DeclaredType::handle("Remote")],
            ret: ReturnDecl::value(DeclaredType::handle("Remote")),
            owner: "Calls".into(),
            side: DeclSide::Caller,
            span: Span::default(),
        };
        assert_eq!(
            validator.validate(decl).unwrap_err(),
            ValidateError::MissingFailureChannel {
                name: "Resolve".into()
            }
        );
    }

    #[test]
    fn declared_failure_channel_on_plain_identifier_is_widening() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![
                DeclaredType::handle("Remote"),
                DeclaredType::scalar(ScalarKind::I32),
            ],
            ReturnDecl::value(DeclaredType::handle("Remote")).fallible(),
        );
        assert!(validator.validate(decl).is_ok());
    }

    #[test]
    fn void_versus_value_return_is_a_mismatch() {
        let registry = registry();
        let validator = SignatureValidator::new(&registry);
        let decl = lookup_decl(
            vec![
                DeclaredType::handle("Remote"),
                DeclaredType::scalar(ScalarKind::I32),
            ],
            ReturnDecl::void(),
        );
        assert!(matches!(
            validator.validate(decl).unwrap_err(),
            ValidateError::ReturnKindMismatch { .. }
        ));
    }
}
