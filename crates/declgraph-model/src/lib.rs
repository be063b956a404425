//! declgraph-model: the declaration graph data model
//!
//! Plain data containers for the deduplicated declaration graph built
//! from a compiler front-end node stream: namespaces, classes, enums,
//! typedefs, functions and their types, plus the query API downstream
//! consumers use to look elements up by name.
//!
//! All cross-references are lightweight handles ([`DeclId`], [`TypeId`])
//! into arenas owned by [`DeclGraph`]; nothing in the model owns another
//! declaration through a pointer.

mod attr;
mod comment;
mod decl;
mod graph;
mod query;
mod span;
mod types;

pub use attr::{Attribute, AttributeKind, MetaAttributeMap, MetaValue};
pub use comment::{Comment, CommentKind};
pub use decl::{
    BaseClass, ClassDecl, ClassKind, Decl, EnumDecl, EnumItem, Field, FunctionDecl, FunctionFlags,
    Literal, Members, NamespaceDecl, Parameter, Property, StorageQualifier, TemplateArgument,
    TemplateArgumentValue, TemplateKind, TemplateParameter, TranslationUnitDecl, TypedefDecl,
    Visibility,
};
pub use graph::{DeclGraph, DeclId, TypeId};
pub use span::Span;
pub use types::{CallingConvention, FunctionType, PrimitiveKind, TypeNode, TypeQualifier};

/// Separator used by fully-qualified lookup.
pub const NAMESPACE_SEPARATOR: &str = "::";
