//! Stub emission.
//!
//! The emitter turns one validated declaration into its [`GeneratedStub`].
//! Plans are built from the canonical signature (validation already proved
//! the declaration equal to it), in canonical parameter order, with no
//! cross-declaration state: the same validated declaration always emits a
//! byte-identical stub.

use hostcall_core::{ReturnKind, ValueKind};

use crate::stub::{Decode, GeneratedStub, MarshalOp, MarshalStep, UnmarshalPlan};
use crate::validate::ValidatedCall;

/// Builds stubs from validated declarations.
pub struct StubEmitter;

impl StubEmitter {
    /// Emit the stub for one validated declaration.
    pub fn emit(call: &ValidatedCall<'_>) -> GeneratedStub {
        let identifier = call.identifier;
        let signature = &identifier.signature;

        let marshal = signature
            .params
            .iter()
            .enumerate()
            .map(|(position, kind)| MarshalOp {
                position: position as u16,
                kind: *kind,
                slot: kind.slot(),
                step: MarshalStep::for_kind(*kind),
            })
            .collect();

        let decode = match signature.ret {
            ReturnKind::Void => Decode::Void,
            ReturnKind::Value(ValueKind::Scalar(s)) => Decode::Scalar(s),
            ReturnKind::Value(ValueKind::Handle) => Decode::Handle,
            ReturnKind::Value(ValueKind::Enum(backing)) => Decode::Enum(backing),
        };

        GeneratedStub {
            name: identifier.name.clone(),
            hash: identifier.stub_hash(),
            marshal,
            unmarshal: UnmarshalPlan {
                decode,
                checks_failure: signature.propagates_failure,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::SignatureValidator;
    use hostcall_core::{
        CallDeclaration, CallIdentifier, CallSignature, DeclSide, DeclaredType, ReturnDecl,
        ScalarKind, SlotKind, Span, kinds,
    };
    use hostcall_registry::CallRegistry;

    fn emit_for(identifier: CallIdentifier, decl: CallDeclaration) -> GeneratedStub {
        let registry = CallRegistry::builder().define(identifier).build().unwrap();
        let validated = SignatureValidator::new(&registry).validate(decl).unwrap();
        StubEmitter::emit(&validated)
    }

    #[test]
    fn marshal_plan_follows_canonical_order() {
        let stub = emit_for(
            CallIdentifier::new(
                "Store",
                CallSignature::new(
                    vec![kinds::HANDLE, kinds::I32, kinds::F64],
                    ReturnKind::Void,
                ),
            ),
            CallDeclaration {
                claimed: "Store".into(),
                params: vec![
                    DeclaredType::handle("Remote"),
                    DeclaredType::scalar(ScalarKind::I32),
                    DeclaredType::scalar(ScalarKind::F64),
                ],
                ret: ReturnDecl::void(),
                owner: "Calls".into(),
                side: DeclSide::Caller,
                span: Span::default(),
            },
        );

        assert_eq!(stub.marshal.len(), 3);
        let kinds_in_order: Vec<_> = stub.marshal.iter().map(|op| op.kind).collect();
        assert_eq!(kinds_in_order, [kinds::HANDLE, kinds::I32, kinds::F64]);
        let slots: Vec<_> = stub.marshal.iter().map(|op| op.slot).collect();
        assert_eq!(slots, [SlotKind::Word, SlotKind::I32, SlotKind::F64]);
        assert_eq!(stub.unmarshal.decode, Decode::Void);
        assert!(!stub.unmarshal.checks_failure);
    }

    #[test]
    fn enum_parameter_lowers_to_backing_slot() {
        let stub = emit_for(
            CallIdentifier::new(
                "SetMode",
                CallSignature::new(
                    vec![hostcall_core::ValueKind::Enum(ScalarKind::U8)],
                    ReturnKind::Void,
                ),
            ),
            CallDeclaration {
                claimed: "SetMode".into(),
                params: vec![DeclaredType::Enum {
                    name: "Mode".into(),
                    backing: ScalarKind::U8,
                }],
                ret: ReturnDecl::void(),
                owner: "Calls".into(),
                side: DeclSide::Caller,
                span: Span::default(),
            },
        );
        let op = &stub.marshal[0];
        assert_eq!(op.slot, SlotKind::I8);
        assert_eq!(op.step, MarshalStep::EnumToBacking);
    }

    #[test]
    fn failure_propagation_adds_discrimination_branch() {
        let stub = emit_for(
            CallIdentifier::new(
                "Resolve",
                CallSignature::with_failure(
                    vec![kinds::HANDLE],
                    ReturnKind::Value(kinds::HANDLE),
                ),
            ),
            CallDeclaration {
                claimed: "Resolve".into(),
                params: vec![DeclaredType::handle("Remote")],
                ret: ReturnDecl::value(DeclaredType::handle("Remote")).fallible(),
                owner: "Calls".into(),
                side: DeclSide::Caller,
                span: Span::default(),
            },
        );
        assert!(stub.unmarshal.checks_failure);
        assert_eq!(stub.unmarshal.decode, Decode::Handle);
    }

    #[test]
    fn emission_is_deterministic() {
        let make = || {
            emit_for(
                CallIdentifier::new(
                    "GetFlag",
                    CallSignature::new(vec![], ReturnKind::Value(kinds::BOOL)),
                ),
                CallDeclaration {
                    claimed: "GetFlag".into(),
                    params: vec![],
                    ret: ReturnDecl::value(DeclaredType::scalar(ScalarKind::Bool)),
                    owner: "Calls".into(),
                    side: DeclSide::Caller,
                    span: Span::default(),
                },
            )
        };
        assert_eq!(make().encode(), make().encode());
    }
}
