//! Compilation-unit tree over which declarations are discovered.
//!
//! The generator never depends on a specific source-language reflection
//! mechanism; an external front-end supplies a [`Unit`]: owners (types)
//! containing methods, some of which carry a boundary-call marker. All
//! nodes are allocated in an arena and borrow from it for the lifetime of
//! the scan.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use hostcall_core::ScalarKind;
//! use hostcall_scanner::unit::{MethodBuilder, OwnerBuilder, OwnerRole, TypeExpr, UnitBuilder};
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
//! assert_eq!(unit.owners().len(), 1);
//! ```

use bumpalo::Bump;

use hostcall_core::{DeclaredType, ScalarKind, Span};

/// An identifier with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The identifier text.
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

/// Which side of the boundary an owner implements.
///
/// The front-end tags the boundary's own receiving/dispatch type as
/// [`Dispatcher`]; everything else is a potential caller. The tag is
/// structural, carried on the owner itself, so renaming or relocating the
/// dispatcher type cannot silently break the exclusion.
///
/// [`Dispatcher`]: OwnerRole::Dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerRole {
    /// An ordinary type; its marked methods become caller-side stubs.
    #[default]
    Caller,
    /// The registry's designated receiving-side dispatcher type.
    Dispatcher,
}

/// A type expression as written in the source language.
///
/// Borrowed names keep the tree `Copy`; the scanner converts to the owned
/// [`DeclaredType`] when it builds declaration records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExpr<'ast> {
    /// A primitive scalar.
    Scalar(ScalarKind),
    /// A named opaque handle type.
    Handle(&'ast str),
    /// A named fixed-width enumeration with its backing scalar.
    Enum {
        name: &'ast str,
        backing: ScalarKind,
    },
    /// A string.
    Str,
    /// An arbitrary object graph, by type name.
    Object(&'ast str),
}

impl TypeExpr<'_> {
    /// Convert to the owned declared-type form.
    pub fn to_declared(self) -> DeclaredType {
        match self {
            TypeExpr::Scalar(kind) => DeclaredType::Scalar(kind),
            TypeExpr::Handle(name) => DeclaredType::Handle(name.to_string()),
            TypeExpr::Enum { name, backing } => DeclaredType::Enum {
                name: name.to_string(),
                backing,
            },
            TypeExpr::Str => DeclaredType::Str,
            TypeExpr::Object(name) => DeclaredType::Object(name.to_string()),
        }
    }
}

/// A boundary-call marker attached to a method.
///
/// The argument text is kept raw; the scanner parses it and reports a
/// malformed marker when the identifier reference cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerAttr<'ast> {
    /// Raw marker argument text, e.g. `id = "Lookup"`.
    pub args: &'ast str,
    /// Source location of the marker.
    pub span: Span,
}

/// A method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDecl<'ast> {
    /// Parameter name.
    pub name: Ident<'ast>,
    /// Declared type.
    pub ty: TypeExpr<'ast>,
    /// Source location.
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDecl<'ast> {
    /// Method name.
    pub name: Ident<'ast>,
    /// Boundary-call marker, if the method carries one. Unmarked methods
    /// are never scanned as declarations.
    pub marker: Option<MarkerAttr<'ast>>,
    /// Parameters, in declared order.
    pub params: &'ast [ParamDecl<'ast>],
    /// Declared return type (`None` for void).
    pub ret: Option<TypeExpr<'ast>>,
    /// Whether the declaration has an explicit failure channel.
    pub fallible: bool,
    /// Source location.
    pub span: Span,
}

/// An owner (type) containing methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerDecl<'ast> {
    /// Owner name.
    pub name: Ident<'ast>,
    /// Which side of the boundary this owner implements.
    pub role: OwnerRole,
    /// The owner's methods.
    pub methods: &'ast [MethodDecl<'ast>],
    /// Source location.
    pub span: Span,
}

/// A compilation unit: the root the scanner walks.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'ast> {
    name: &'ast str,
    owners: &'ast [OwnerDecl<'ast>],
    span: Span,
}

impl<'ast> Unit<'ast> {
    /// The unit's name.
    pub fn name(&self) -> &'ast str {
        self.name
    }

    /// The unit's owners.
    pub fn owners(&self) -> &'ast [OwnerDecl<'ast>] {
        self.owners
    }

    /// The unit's span.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Builds a [`Unit`] in an arena.
pub struct UnitBuilder<'ast> {
    arena: &'ast Bump,
    name: &'ast str,
    owners: Vec<OwnerDecl<'ast>>,
    span: Span,
}

impl<'ast> UnitBuilder<'ast> {
    /// Start a unit.
    pub fn new(arena: &'ast Bump, name: &str) -> Self {
        Self {
            arena,
            name: arena.alloc_str(name),
            owners: Vec::new(),
            span: Span::default(),
        }
    }

    /// Set the unit's span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Add an owner.
    pub fn owner(mut self, owner: OwnerDecl<'ast>) -> Self {
        self.owners.push(owner);
        self
    }

    /// Allocate the finished unit.
    pub fn finish(self) -> Unit<'ast> {
        Unit {
            name: self.name,
            owners: self.arena.alloc_slice_copy(&self.owners),
            span: self.span,
        }
    }
}

/// Builds an [`OwnerDecl`] in an arena.
pub struct OwnerBuilder<'ast> {
    arena: &'ast Bump,
    name: Ident<'ast>,
    role: OwnerRole,
    methods: Vec<MethodDecl<'ast>>,
    span: Span,
}

impl<'ast> OwnerBuilder<'ast> {
    /// Start an owner with the given role.
    pub fn new(arena: &'ast Bump, name: &str, role: OwnerRole) -> Self {
        Self {
            arena,
            name: Ident {
                name: arena.alloc_str(name),
                span: Span::default(),
            },
            role,
            methods: Vec::new(),
            span: Span::default(),
        }
    }

    /// Set the owner's span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self.name.span = span;
        self
    }

    /// Add a method.
    pub fn method(mut self, method: MethodDecl<'ast>) -> Self {
        self.methods.push(method);
        self
    }

    /// Allocate the finished owner.
    pub fn finish(self) -> OwnerDecl<'ast> {
        OwnerDecl {
            name: self.name,
            role: self.role,
            methods: self.arena.alloc_slice_copy(&self.methods),
            span: self.span,
        }
    }
}

/// Builds a [`MethodDecl`] in an arena.
pub struct MethodBuilder<'ast> {
    arena: &'ast Bump,
    name: Ident<'ast>,
    marker: Option<MarkerAttr<'ast>>,
    params: Vec<ParamDecl<'ast>>,
    ret: Option<TypeExpr<'ast>>,
    fallible: bool,
    span: Span,
}

impl<'ast> MethodBuilder<'ast> {
    /// Start a method. Without a marker it is skipped by the scanner.
    pub fn new(arena: &'ast Bump, name: &str) -> Self {
        Self {
            arena,
            name: Ident {
                name: arena.alloc_str(name),
                span: Span::default(),
            },
            marker: None,
            params: Vec::new(),
            ret: None,
            fallible: false,
            span: Span::default(),
        }
    }

    /// Set the method's span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self.name.span = span;
        self
    }

    /// Attach a boundary-call marker with the given raw argument text.
    pub fn marker(mut self, args: &str) -> Self {
        self.marker = Some(MarkerAttr {
            args: self.arena.alloc_str(args),
            span: self.span,
        });
        self
    }

    /// Attach a marker with an explicit span.
    pub fn marker_at(mut self, args: &str, span: Span) -> Self {
        self.marker = Some(MarkerAttr {
            args: self.arena.alloc_str(args),
            span,
        });
        self
    }

    /// Add a parameter.
    pub fn param(mut self, name: &str, ty: TypeExpr<'ast>) -> Self {
        self.params.push(ParamDecl {
            name: Ident {
                name: self.arena.alloc_str(name),
                span: self.span,
            },
            ty,
            span: self.span,
        });
        self
    }

    /// Set the declared return type.
    pub fn returns(mut self, ty: TypeExpr<'ast>) -> Self {
        self.ret = Some(ty);
        self
    }

    /// Declare an explicit failure channel on the return.
    pub fn fallible(mut self) -> Self {
        self.fallible = true;
        self
    }

    /// Allocate the finished method.
    pub fn finish(self) -> MethodDecl<'ast> {
        MethodDecl {
            name: self.name,
            marker: self.marker,
            params: self.arena.alloc_slice_copy(&self.params),
            ret: self.ret,
            fallible: self.fallible,
            span: self.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_allocate_into_arena() {
        let arena = Bump::new();
        let unit = UnitBuilder::new(&arena, "u")
            .owner(
                OwnerBuilder::new(&arena, "Calls", OwnerRole::Caller)
                    .method(
                        MethodBuilder::new(&arena, "shutdown")
                            .marker("id = \"Shutdown\"")
                            .finish(),
                    )
                    .finish(),
            )
            .finish();
        assert_eq!(unit.name(), "u");
        let owner = &unit.owners()[0];
        assert_eq!(owner.role, OwnerRole::Caller);
        assert_eq!(owner.methods.len(), 1);
        assert!(owner.methods[0].marker.is_some());
    }

    #[test]
    fn type_expr_converts_to_declared() {
        let expr = TypeExpr::Enum {
            name: "Mode",
            backing: ScalarKind::U8,
        };
        assert_eq!(
            expr.to_declared(),
            DeclaredType::Enum {
                name: "Mode".into(),
                backing: ScalarKind::U8,
            }
        );
    }
}
