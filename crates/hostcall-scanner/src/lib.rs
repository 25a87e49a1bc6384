//! Declaration scanning for boundary-call stub generation.
//!
//! An external front-end supplies a compilation-unit tree ([`unit`]); the
//! scanner walks it and produces one [`CallDeclaration`] record per
//! marked method, reporting malformed markers as per-declaration
//! diagnostics without aborting the unit.
//!
//! [`CallDeclaration`]: hostcall_core::CallDeclaration

pub mod marker;
pub mod scanner;
pub mod unit;

pub use marker::parse_marker;
pub use scanner::{DeclarationSource, ScanOutput, UnitScanner};
pub use unit::{
    Ident, MarkerAttr, MethodBuilder, MethodDecl, OwnerBuilder, OwnerDecl, OwnerRole, ParamDecl,
    TypeExpr, Unit, UnitBuilder,
};
