//! The declaration graph arena
//!
//! Declarations and types live in two flat arenas indexed by [`DeclId`]
//! and [`TypeId`]. Two translation-unit roots are seeded at
//! construction, one for user code and one for system headers, followed
//! by one node per primitive kind so primitive lookups never allocate.

use crate::decl::{ClassDecl, Decl, EnumDecl, FunctionDecl, NamespaceDecl, TranslationUnitDecl, TypedefDecl};
use crate::types::{PrimitiveKind, TypeNode};
use serde::{Deserialize, Serialize};

/// Handle to a declaration in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(u32);

impl DeclId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to a type node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// The complete cross-referenced declaration graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclGraph {
    decls: Vec<Decl>,
    types: Vec<TypeNode>,
    user_root: DeclId,
    system_root: DeclId,
}

impl DeclGraph {
    pub fn new() -> Self {
        let decls = vec![
            Decl::TranslationUnit(TranslationUnitDecl::default()),
            Decl::TranslationUnit(TranslationUnitDecl::default()),
        ];
        let types = PrimitiveKind::ALL
            .iter()
            .map(|kind| TypeNode::Primitive(*kind))
            .collect();
        Self {
            decls,
            types,
            user_root: DeclId(0),
            system_root: DeclId(1),
        }
    }

    /// Root container for declarations found in user code
    pub fn user_root(&self) -> DeclId {
        self.user_root
    }

    /// Root container for declarations found in system headers
    pub fn system_root(&self) -> DeclId {
        self.system_root
    }

    /// The pre-seeded type node for a primitive kind
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        let index = PrimitiveKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_else(|| panic!("primitive kind {kind:?} missing from seed table"));
        TypeId(index as u32)
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn alloc_type(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(node);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    pub fn type_node(&self, id: TypeId) -> &TypeNode {
        &self.types[id.0 as usize]
    }

    pub fn type_node_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.types[id.0 as usize]
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn decls(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }

    /// Strip qualifier wrappers, returning the innermost type handle.
    pub fn unqualified(&self, mut id: TypeId) -> TypeId {
        while let TypeNode::Qualified { inner, .. } = self.type_node(id) {
            id = *inner;
        }
        id
    }
}

impl Default for DeclGraph {
    fn default() -> Self {
        Self::new()
    }
}

// Typed accessors. The builder relies on its registry handing back
// declarations of the kind it recorded; a mismatch is a corrupted
// graph, not a recoverable condition.
impl DeclGraph {
    pub fn expect_class(&self, id: DeclId) -> &ClassDecl {
        match self.decl(id) {
            Decl::Class(d) => d,
            other => panic!("declaration {} is a {}, expected a class", id.0, other.kind_name()),
        }
    }

    pub fn expect_class_mut(&mut self, id: DeclId) -> &mut ClassDecl {
        match self.decl_mut(id) {
            Decl::Class(d) => d,
            other => panic!("declaration {} is a {}, expected a class", id.0, other.kind_name()),
        }
    }

    pub fn expect_enum(&self, id: DeclId) -> &EnumDecl {
        match self.decl(id) {
            Decl::Enum(d) => d,
            other => panic!("declaration {} is a {}, expected an enum", id.0, other.kind_name()),
        }
    }

    pub fn expect_enum_mut(&mut self, id: DeclId) -> &mut EnumDecl {
        match self.decl_mut(id) {
            Decl::Enum(d) => d,
            other => panic!("declaration {} is a {}, expected an enum", id.0, other.kind_name()),
        }
    }

    pub fn expect_namespace_mut(&mut self, id: DeclId) -> &mut NamespaceDecl {
        match self.decl_mut(id) {
            Decl::Namespace(d) => d,
            other => panic!("declaration {} is a {}, expected a namespace", id.0, other.kind_name()),
        }
    }

    pub fn expect_typedef(&self, id: DeclId) -> &TypedefDecl {
        match self.decl(id) {
            Decl::Typedef(d) => d,
            other => panic!("declaration {} is a {}, expected a typedef", id.0, other.kind_name()),
        }
    }

    pub fn expect_function(&self, id: DeclId) -> &FunctionDecl {
        match self.decl(id) {
            Decl::Function(d) => d,
            other => panic!("declaration {} is a {}, expected a function", id.0, other.kind_name()),
        }
    }

    pub fn expect_function_mut(&mut self, id: DeclId) -> &mut FunctionDecl {
        match self.decl_mut(id) {
            Decl::Function(d) => d,
            other => panic!("declaration {} is a {}, expected a function", id.0, other.kind_name()),
        }
    }
}
