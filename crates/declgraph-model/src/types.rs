//! Type graph nodes

use crate::graph::{DeclId, TypeId};
use serde::{Deserialize, Serialize};

/// Canonical primitive kinds, mapped 1:1 from the front-end's builtin
/// type kinds. Each has a fixed, pre-seeded [`TypeId`] in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    WChar,
    Char16,
    Char32,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    Float16,
    Float,
    Double,
    LongDouble,
}

impl PrimitiveKind {
    /// All primitive kinds, in the order they are seeded into the graph.
    pub const ALL: &'static [PrimitiveKind] = &[
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::SChar,
        PrimitiveKind::UChar,
        PrimitiveKind::WChar,
        PrimitiveKind::Char16,
        PrimitiveKind::Char32,
        PrimitiveKind::Short,
        PrimitiveKind::UShort,
        PrimitiveKind::Int,
        PrimitiveKind::UInt,
        PrimitiveKind::Long,
        PrimitiveKind::ULong,
        PrimitiveKind::LongLong,
        PrimitiveKind::ULongLong,
        PrimitiveKind::Int128,
        PrimitiveKind::UInt128,
        PrimitiveKind::Float16,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::LongDouble,
    ];

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Bool
                | PrimitiveKind::Char
                | PrimitiveKind::SChar
                | PrimitiveKind::UChar
                | PrimitiveKind::WChar
                | PrimitiveKind::Char16
                | PrimitiveKind::Char32
                | PrimitiveKind::Short
                | PrimitiveKind::UShort
                | PrimitiveKind::Int
                | PrimitiveKind::UInt
                | PrimitiveKind::Long
                | PrimitiveKind::ULong
                | PrimitiveKind::LongLong
                | PrimitiveKind::ULongLong
                | PrimitiveKind::Int128
                | PrimitiveKind::UInt128
        )
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::UChar
                | PrimitiveKind::UShort
                | PrimitiveKind::UInt
                | PrimitiveKind::ULong
                | PrimitiveKind::ULongLong
                | PrimitiveKind::UInt128
        )
    }
}

/// `const` / `volatile` wrapper discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeQualifier {
    Const,
    Volatile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallingConvention {
    #[default]
    Default,
    C,
    StdCall,
    FastCall,
    ThisCall,
}

/// A function prototype type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    pub return_type: TypeId,
    /// Parameter names paired with their types. Names come from sibling
    /// parameter-declaration nodes, not from the type itself, and may
    /// be empty.
    pub parameters: Vec<(String, TypeId)>,
    pub is_variadic: bool,
    pub calling_convention: CallingConvention,
}

/// One node of the type graph.
///
/// `Pointer`/`Reference`/`Qualified`/`Array` own their single element
/// type (by handle); `Class`/`Enum`/`Typedef` are non-owning references
/// into the declaration arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeNode {
    Primitive(PrimitiveKind),
    Pointer {
        pointee: TypeId,
        /// Front-end-reported pointer size in bytes, when known
        size: Option<u64>,
    },
    Reference {
        pointee: TypeId,
    },
    Qualified {
        qualifier: TypeQualifier,
        inner: TypeId,
    },
    Array {
        element: TypeId,
        /// `None` for incomplete arrays
        size: Option<u64>,
    },
    Function(FunctionType),
    TemplateParameter {
        name: String,
    },
    Class(DeclId),
    Enum(DeclId),
    Typedef(DeclId),
    /// An opaque type the front-end could not (or we chose not to)
    /// expose structurally; carries its textual spelling.
    Unexposed {
        spelling: String,
        size: Option<u64>,
        template_args: Vec<TypeId>,
    },
}

impl TypeNode {
    pub fn is_unexposed(&self) -> bool {
        matches!(self, TypeNode::Unexposed { .. })
    }

    /// The declaration this type refers to, if it is a declaration
    /// reference (class, enum or typedef).
    pub fn referenced_decl(&self) -> Option<DeclId> {
        match self {
            TypeNode::Class(id) | TypeNode::Enum(id) | TypeNode::Typedef(id) => Some(*id),
            _ => None,
        }
    }
}
