//! Raw types as reported by the front-end

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Handle to a raw type in a [`crate::TranslationUnit`]'s type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef(pub u32);

/// Raw type kinds, one per front-end type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Void,
    Bool,
    CharS,
    CharU,
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
    Pointer,
    BlockPointer,
    LValueReference,
    RValueReference,
    Record,
    Enum,
    Typedef,
    Elaborated,
    ConstantArray,
    IncompleteArray,
    DependentSizedArray,
    FunctionProto,
    FunctionNoProto,
    Unexposed,
    Attributed,
    Auto,
    TypeParam,
}

/// One template argument as the front-end reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawTemplateArgument {
    Type(TypeRef),
    Integral(i64),
    /// Any other argument kind, kept textually with its kind name
    Other { kind: String, text: String },
}

/// A constant the front-end managed to evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvalResult {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A raw type record.
///
/// Which optional fields are set depends on `kind`: pointers and
/// references carry `pointee`, arrays carry `element` and maybe
/// `array_size`, function prototypes carry `result` and `parameters`,
/// and so on. Unused fields stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawType {
    pub kind: TypeKind,
    pub spelling: String,
    pub is_const: bool,
    pub is_volatile: bool,
    pub size: Option<u64>,
    pub align: Option<u64>,
    /// Pointee for pointer/reference kinds
    pub pointee: Option<TypeRef>,
    /// Element type for array kinds
    pub element: Option<TypeRef>,
    /// Return type for function kinds
    pub result: Option<TypeRef>,
    /// Parameter types for function kinds
    pub parameters: Vec<TypeRef>,
    pub is_variadic: bool,
    /// The canonical form, for sugar kinds that need a fallback
    pub canonical: Option<TypeRef>,
    /// The wrapped type for `Attributed`
    pub modified: Option<TypeRef>,
    /// Underlying type for `Typedef` and the named type for `Elaborated`
    pub underlying: Option<TypeRef>,
    pub array_size: Option<u64>,
    /// The declaration node this type refers to (records, enums,
    /// typedefs, and concrete unexposed specializations)
    pub declaration: Option<NodeId>,
    pub template_args: Vec<RawTemplateArgument>,
}

impl RawType {
    pub fn new(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            is_const: false,
            is_volatile: false,
            size: None,
            align: None,
            pointee: None,
            element: None,
            result: None,
            parameters: Vec::new(),
            is_variadic: false,
            canonical: None,
            modified: None,
            underlying: None,
            array_size: None,
            declaration: None,
            template_args: Vec::new(),
        }
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn volatile(mut self) -> Self {
        self.is_volatile = true;
        self
    }

    pub fn sized(mut self, size: u64, align: u64) -> Self {
        self.size = Some(size);
        self.align = Some(align);
        self
    }

    pub fn pointee(mut self, pointee: TypeRef) -> Self {
        self.pointee = Some(pointee);
        self
    }

    pub fn element(mut self, element: TypeRef) -> Self {
        self.element = Some(element);
        self
    }

    pub fn result(mut self, result: TypeRef) -> Self {
        self.result = Some(result);
        self
    }

    pub fn underlying(mut self, underlying: TypeRef) -> Self {
        self.underlying = Some(underlying);
        self
    }

    pub fn canonical(mut self, canonical: TypeRef) -> Self {
        self.canonical = Some(canonical);
        self
    }

    pub fn declaration(mut self, node: NodeId) -> Self {
        self.declaration = Some(node);
        self
    }
}
