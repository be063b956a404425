//! Declaration containers
//!
//! Every declaration variant carries the shared trailer (span, comment,
//! raw attributes, parsed metadata) plus its kind-specific payload.
//! Member lists hold handles; the graph owns the storage.

use crate::attr::{Attribute, MetaAttributeMap};
use crate::comment::Comment;
use crate::graph::{DeclId, TypeId};
use crate::span::Span;
use crate::types::CallingConvention;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Not explicitly specified by the source
    #[default]
    Default,
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageQualifier {
    #[default]
    None,
    Extern,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Struct,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemplateKind {
    /// An ordinary, non-templated declaration
    #[default]
    None,
    /// A primary template declaration
    Template,
    /// A partial specialization, still carrying free parameters
    PartialSpecialization,
    /// A full specialization, all parameters bound
    Specialization,
}

/// A literal constant, as evaluated by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A template parameter declared on a template or specialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateParameter {
    /// `template<typename T>`
    Type { name: String },
    /// `template<int N>`
    NonType { name: String, ty: TypeId },
    /// `template<template<typename> class C>`
    Template { name: String },
}

impl TemplateParameter {
    pub fn name(&self) -> &str {
        match self {
            TemplateParameter::Type { name }
            | TemplateParameter::NonType { name, .. }
            | TemplateParameter::Template { name } => name,
        }
    }
}

/// The value bound to a template parameter on a specialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateArgumentValue {
    Type(TypeId),
    Integral(i64),
    /// An argument we could only keep textually
    Text(String),
}

/// A template argument positionally bound to its declaring parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateArgument {
    pub parameter: TemplateParameter,
    pub value: TemplateArgumentValue,
    /// True when the argument actually specializes the parameter (it is
    /// not itself a free template parameter type).
    pub is_specialized: bool,
}

/// A direct base class of a class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseClass {
    pub ty: TypeId,
    pub visibility: Visibility,
    pub is_virtual: bool,
}

/// A data member of a class or union
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub visibility: Visibility,
    pub storage: StorageQualifier,
    pub is_anonymous: bool,
    pub is_bit_field: bool,
    pub bit_width: Option<u32>,
    pub bit_offset: Option<u64>,
    pub default_value: Option<Literal>,
    pub default_expression: Option<String>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
}

/// A synthesized property member linking a getter/setter pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
    pub getter_name: Option<String>,
    pub setter_name: Option<String>,
    /// Resolved method handles, filled once the owning class definition
    /// has been fully visited
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
}

/// A single enumerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: i64,
    /// The initializer expression, re-joined from its source tokens
    pub value_expression: Option<String>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
}

/// A function or method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeId,
    pub default_value: Option<Literal>,
    pub default_expression: Option<String>,
    pub span: Span,
}

/// Function traits, kept as plain booleans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionFlags {
    pub is_method: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_const: bool,
    pub is_inline: bool,
    pub is_variadic: bool,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    pub is_function_template: bool,
}

/// Member handle lists shared by every declaration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Members {
    pub namespaces: Vec<DeclId>,
    pub classes: Vec<DeclId>,
    pub enums: Vec<DeclId>,
    pub typedefs: Vec<DeclId>,
    pub functions: Vec<DeclId>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
}

impl Members {
    /// Handles of all named member declarations, in category order.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.namespaces
            .iter()
            .chain(&self.classes)
            .chain(&self.enums)
            .chain(&self.typedefs)
            .chain(&self.functions)
            .copied()
    }
}

/// The root container of one scope (user or system)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnitDecl {
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub is_inline: bool,
    pub parent: Option<DeclId>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub class_kind: ClassKind,
    pub visibility: Visibility,
    pub is_anonymous: bool,
    pub is_abstract: bool,
    /// True once a defining occurrence has been merged in
    pub is_definition: bool,
    pub size_of: Option<u64>,
    pub align_of: Option<u64>,
    pub parent: Option<DeclId>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
    pub bases: Vec<BaseClass>,
    pub template_kind: TemplateKind,
    pub template_parameters: Vec<TemplateParameter>,
    pub template_arguments: Vec<TemplateArgument>,
    /// The primary template this declaration specializes, if any
    pub specialized_template: Option<DeclId>,
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_anonymous: bool,
    pub is_scoped: bool,
    pub is_definition: bool,
    pub integer_type: Option<TypeId>,
    pub parent: Option<DeclId>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
    pub items: Vec<EnumItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedefDecl {
    pub name: String,
    pub visibility: Visibility,
    pub underlying: TypeId,
    pub parent: Option<DeclId>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub visibility: Visibility,
    pub storage: StorageQualifier,
    pub flags: FunctionFlags,
    pub calling_convention: CallingConvention,
    pub return_type: TypeId,
    pub parameters: Vec<Parameter>,
    pub template_parameters: Vec<TemplateParameter>,
    pub parent: Option<DeclId>,
    pub span: Span,
    pub comment: Option<Comment>,
    pub attributes: Vec<Attribute>,
    pub metadata: MetaAttributeMap,
}

/// A declaration stored in the graph arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    TranslationUnit(TranslationUnitDecl),
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    Function(FunctionDecl),
}

impl Decl {
    /// The declared name, empty for translation units and anonymous
    /// declarations.
    pub fn name(&self) -> &str {
        match self {
            Decl::TranslationUnit(_) => "",
            Decl::Namespace(d) => &d.name,
            Decl::Class(d) => &d.name,
            Decl::Enum(d) => &d.name,
            Decl::Typedef(d) => &d.name,
            Decl::Function(d) => &d.name,
        }
    }

    pub fn parent(&self) -> Option<DeclId> {
        match self {
            Decl::TranslationUnit(_) => None,
            Decl::Namespace(d) => d.parent,
            Decl::Class(d) => d.parent,
            Decl::Enum(d) => d.parent,
            Decl::Typedef(d) => d.parent,
            Decl::Function(d) => d.parent,
        }
    }

    pub fn set_parent(&mut self, parent: DeclId) {
        match self {
            Decl::TranslationUnit(_) => {}
            Decl::Namespace(d) => d.parent = Some(parent),
            Decl::Class(d) => d.parent = Some(parent),
            Decl::Enum(d) => d.parent = Some(parent),
            Decl::Typedef(d) => d.parent = Some(parent),
            Decl::Function(d) => d.parent = Some(parent),
        }
    }

    /// Member lists, for declarations that can contain other
    /// declarations.
    pub fn members(&self) -> Option<&Members> {
        match self {
            Decl::TranslationUnit(d) => Some(&d.members),
            Decl::Namespace(d) => Some(&d.members),
            Decl::Class(d) => Some(&d.members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Members> {
        match self {
            Decl::TranslationUnit(d) => Some(&mut d.members),
            Decl::Namespace(d) => Some(&mut d.members),
            Decl::Class(d) => Some(&mut d.members),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&Comment> {
        match self {
            Decl::TranslationUnit(_) => None,
            Decl::Namespace(d) => d.comment.as_ref(),
            Decl::Class(d) => d.comment.as_ref(),
            Decl::Enum(d) => d.comment.as_ref(),
            Decl::Typedef(d) => d.comment.as_ref(),
            Decl::Function(d) => d.comment.as_ref(),
        }
    }

    pub fn metadata(&self) -> Option<&MetaAttributeMap> {
        match self {
            Decl::TranslationUnit(_) => None,
            Decl::Namespace(d) => Some(&d.metadata),
            Decl::Class(d) => Some(&d.metadata),
            Decl::Enum(d) => Some(&d.metadata),
            Decl::Typedef(d) => Some(&d.metadata),
            Decl::Function(d) => Some(&d.metadata),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::TranslationUnit(_) => "translation unit",
            Decl::Namespace(_) => "namespace",
            Decl::Class(_) => "class",
            Decl::Enum(_) => "enum",
            Decl::Typedef(_) => "typedef",
            Decl::Function(_) => "function",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DeclId;

    #[test]
    fn test_members_decl_ids_order() {
        let mut members = Members::default();
        members.classes.push(DeclId::from_raw(3));
        members.namespaces.push(DeclId::from_raw(2));
        members.functions.push(DeclId::from_raw(7));
        let ids: Vec<_> = members.decl_ids().collect();
        assert_eq!(
            ids,
            vec![DeclId::from_raw(2), DeclId::from_raw(3), DeclId::from_raw(7)]
        );
    }
}
