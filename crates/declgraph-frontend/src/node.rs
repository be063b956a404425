//! Declaration nodes as reported by the front-end

use declgraph_model::{Attribute, Comment, Span, StorageQualifier, Visibility};
use serde::{Deserialize, Serialize};

use crate::ty::{EvalResult, RawTemplateArgument, TypeRef};

/// Handle to a node in a [`crate::TranslationUnit`]'s node table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// The kind tag on every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    LinkageSpec,
    UnexposedDecl,
    ClassDecl,
    StructDecl,
    UnionDecl,
    ClassTemplate,
    ClassTemplatePartialSpecialization,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    VarDecl,
    FunctionDecl,
    Method,
    Constructor,
    Destructor,
    FunctionTemplate,
    ParmDecl,
    TypedefDecl,
    TypeAliasDecl,
    TypeRef,
    BaseSpecifier,
    AccessSpecifier,
    TemplateTypeParameter,
    NonTypeTemplateParameter,
    TemplateTemplateParameter,
    PropertyDecl,
    /// An attribute node the dispatcher silently skips
    Attribute,
}

impl NodeKind {
    pub fn is_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDecl
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Destructor
                | NodeKind::FunctionTemplate
        )
    }

    pub fn is_class(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassDecl
                | NodeKind::StructDecl
                | NodeKind::UnionDecl
                | NodeKind::ClassTemplate
                | NodeKind::ClassTemplatePartialSpecialization
        )
    }

    pub fn is_template_parameter(&self) -> bool {
        matches!(
            self,
            NodeKind::TemplateTypeParameter
                | NodeKind::NonTypeTemplateParameter
                | NodeKind::TemplateTemplateParameter
        )
    }
}

/// Function traits reported on function-like nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionTraits {
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_const: bool,
    pub is_inlined: bool,
    pub is_variadic: bool,
    pub is_deleted: bool,
    pub is_defaulted: bool,
}

/// One node of the front-end stream.
///
/// A node carries everything the front-end knows about one declaration
/// occurrence. Most fields only apply to some kinds and keep their
/// defaults elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Simple spelling (`Vector3`)
    pub spelling: String,
    /// Display name including template arguments (`List<int>`); falls
    /// back to `spelling` when empty
    pub display_name: String,
    /// Unified symbol reference, the front-end's stable cross-TU name
    pub usr: String,
    pub semantic_parent: Option<NodeId>,
    pub lexical_parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub is_definition: bool,
    pub is_anonymous: bool,
    /// Abstract class flag for class-like nodes
    pub is_abstract: bool,
    /// Front-end structural hash, the tie-breaker for anonymous nodes
    pub structural_hash: u64,
    pub in_system_header: bool,
    pub is_inline_namespace: bool,
    pub is_scoped_enum: bool,
    pub visibility: Visibility,
    pub storage: StorageQualifier,
    /// This node's own type (field/variable/parameter/function)
    pub ty: Option<TypeRef>,
    /// Underlying type for typedef and alias nodes
    pub underlying_type: Option<TypeRef>,
    /// Integer type for enum nodes
    pub integer_type: Option<TypeRef>,
    /// The primary template a specialization node instantiates
    pub specialized_template: Option<NodeId>,
    pub template_args: Vec<RawTemplateArgument>,
    /// Enumerator value for enum-constant nodes
    pub enum_value: i64,
    /// Evaluated initializer, when the front-end could fold it
    pub eval: Option<EvalResult>,
    /// Initializer/value expression tokens, in source order
    pub expr_tokens: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
    pub traits: FunctionTraits,
    /// Calling convention name for function nodes, empty for default
    pub calling_convention: String,
    pub is_bit_field: bool,
    pub bit_width: Option<u32>,
    pub bit_offset: Option<u64>,
    /// Virtual base flag for base-specifier nodes
    pub is_virtual_base: bool,
    pub size: Option<u64>,
    pub align: Option<u64>,
    /// Getter method name for property nodes
    pub getter_name: Option<String>,
    /// Setter method name for property nodes
    pub setter_name: Option<String>,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            spelling: name.clone(),
            display_name: name,
            usr: String::new(),
            semantic_parent: None,
            lexical_parent: None,
            children: Vec::new(),
            is_definition: false,
            is_anonymous: false,
            is_abstract: false,
            structural_hash: 0,
            in_system_header: false,
            is_inline_namespace: false,
            is_scoped_enum: false,
            visibility: Visibility::Default,
            storage: StorageQualifier::None,
            ty: None,
            underlying_type: None,
            integer_type: None,
            specialized_template: None,
            template_args: Vec::new(),
            enum_value: 0,
            eval: None,
            expr_tokens: Vec::new(),
            attributes: Vec::new(),
            comment: None,
            traits: FunctionTraits::default(),
            calling_convention: String::new(),
            is_bit_field: false,
            bit_width: None,
            bit_offset: None,
            is_virtual_base: false,
            size: None,
            align: None,
            getter_name: None,
            setter_name: None,
            span: Span::dummy(),
        }
    }

    /// The name used for identity when no USR is available.
    pub fn display_or_spelling(&self) -> &str {
        if self.display_name.is_empty() {
            &self.spelling
        } else {
            &self.display_name
        }
    }

    pub fn definition(mut self) -> Self {
        self.is_definition = true;
        self
    }

    pub fn anonymous(mut self, structural_hash: u64) -> Self {
        self.is_anonymous = true;
        self.structural_hash = structural_hash;
        self
    }

    pub fn system(mut self) -> Self {
        self.in_system_header = true;
        self
    }

    pub fn usr(mut self, usr: impl Into<String>) -> Self {
        self.usr = usr.into();
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn underlying(mut self, ty: TypeRef) -> Self {
        self.underlying_type = Some(ty);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn storage(mut self, storage: StorageQualifier) -> Self {
        self.storage = storage;
        self
    }

    pub fn spanned(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn commented(mut self, comment: Comment) -> Self {
        self.comment = Some(comment);
        self
    }
}
