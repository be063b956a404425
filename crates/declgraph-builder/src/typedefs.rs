//! Typedef resolution, squashing and deferred re-parenting
//!
//! Typedef identity lives in its own map, separate from the container
//! registry, because a typedef can be referenced as a type before its
//! defining occurrence is reached. Both maps must agree when a typedef
//! is squashed into the aggregate it names.

use std::collections::HashMap;

use declgraph_frontend::NodeId;
use declgraph_model::{Decl, DeclId, TemplateParameter, TypeId, TypeNode, TypedefDecl};

use crate::builder::{ModelBuilder, VisitResult};
use crate::identity::{CursorIdentity, Scope};

#[derive(Debug, Default)]
pub struct TypedefResolver {
    map: HashMap<CursorIdentity, TypeId>,
}

impl TypedefResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a typedef type. User-scope keys also probe the system
    /// scope, since user code routinely names typedefs declared in
    /// system headers.
    pub fn resolve(&self, identity: &CursorIdentity) -> Option<TypeId> {
        if let Some(&ty) = self.map.get(identity) {
            return Some(ty);
        }
        if identity.scope == Scope::User {
            return self.map.get(&identity.with_scope(Scope::System)).copied();
        }
        None
    }

    pub fn register(&mut self, identity: CursorIdentity, ty: TypeId) {
        let previous = self.map.insert(identity, ty);
        debug_assert!(
            previous.is_none() || previous == Some(ty),
            "typedef identity re-registered with a different type"
        );
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl ModelBuilder<'_> {
    pub(crate) fn visit_typedef(&mut self, node: NodeId) -> VisitResult {
        self.typedef_type_for(node);
        VisitResult::Continue
    }

    /// Resolve a typedef node to its type, creating and registering it
    /// on first reference. Later occurrences return the cached type.
    pub(crate) fn typedef_type_for(&mut self, node: NodeId) -> TypeId {
        let identity = self.identity_of(node);
        if let Some(existing) = self.typedefs.resolve(&identity) {
            return existing;
        }

        let tu = self.tu();
        let n = tu.node(node);
        let parent = self.parent_container(node);
        let parent_decl = self.registry.record(parent).decl;
        let visibility = self.effective_visibility(parent, n);

        // Template parameter types synthesized below belong to this
        // typedef until its final container is known.
        let enclosing = self.current_typedef.replace(identity);
        self.pending_parameter_names = Some(self.parameter_names_of(n));
        let underlying = match n.underlying_type {
            Some(ty) => self.resolve_type(ty),
            None => {
                self.diagnostics.warning(
                    format!("typedef `{}` carries no underlying type", n.spelling),
                    n.span,
                );
                self.unexposed_placeholder(n.spelling.clone(), None)
            }
        };
        self.pending_parameter_names = None;
        self.current_typedef = enclosing;

        let (attributes, metadata) = self.convert_attributes(n);

        if self.options.auto_squash_typedef {
            if let Some(target) = self.squash_target(underlying, &n.spelling) {
                // The aggregate takes the typedef's name; no separate
                // typedef node exists, both maps point at the aggregate.
                match self.graph.decl_mut(target) {
                    Decl::Class(class) => {
                        class.name = n.spelling.clone();
                        class.is_anonymous = false;
                        class.attributes.extend(attributes);
                        class.metadata.merge(metadata);
                        if class.comment.is_none() {
                            class.comment = n.comment.clone();
                        }
                    }
                    Decl::Enum(decl) => {
                        decl.name = n.spelling.clone();
                        decl.is_anonymous = false;
                        decl.attributes.extend(attributes);
                        decl.metadata.merge(metadata);
                        if decl.comment.is_none() {
                            decl.comment = n.comment.clone();
                        }
                    }
                    other => panic!("typedef squash target is a {}", other.kind_name()),
                }
                self.reattach_parameter_types(identity, target);
                self.typedefs.register(identity, underlying);
                return underlying;
            }
        }

        let decl = self.graph.alloc_decl(Decl::Typedef(TypedefDecl {
            name: n.spelling.clone(),
            visibility,
            underlying,
            parent: Some(parent_decl),
            span: n.span,
            comment: n.comment.clone(),
            attributes,
            metadata,
        }));
        self.attach_member(parent_decl, decl);

        // An unnamed aggregate wrapped by a non-squashed typedef still
        // inherits the typedef's attributes, so consumers that only
        // look at the class see them.
        let unqualified = self.graph.unqualified(underlying);
        if let Some(target) = self.graph.type_node(unqualified).referenced_decl() {
            if self.graph.decl(target).name().is_empty() {
                self.copy_typedef_attributes(decl, target);
            }
        }

        let ty = self.decl_type(decl);
        self.typedefs.register(identity, ty);
        ty
    }

    /// The aggregate to squash into, when the underlying type is a
    /// class or enum whose name is empty or equal to the typedef's.
    fn squash_target(&self, underlying: TypeId, typedef_name: &str) -> Option<DeclId> {
        let unqualified = self.graph.unqualified(underlying);
        let target = self.graph.type_node(unqualified).referenced_decl()?;
        let squashable = match self.graph.decl(target) {
            Decl::Class(class) => class.name.is_empty() || class.name == typedef_name,
            Decl::Enum(decl) => decl.name.is_empty() || decl.name == typedef_name,
            _ => false,
        };
        squashable.then_some(target)
    }

    /// Re-attach template parameter types recorded against a typedef
    /// identity to its final container.
    fn reattach_parameter_types(&mut self, identity: CursorIdentity, target: DeclId) {
        let Some(params) = self.typedef_param_types.remove(&identity) else {
            return;
        };
        let names: Vec<String> = params
            .iter()
            .filter_map(|&p| match self.graph.type_node(p) {
                TypeNode::TemplateParameter { name } => Some(name.clone()),
                _ => None,
            })
            .collect();
        if let Decl::Class(class) = self.graph.decl_mut(target) {
            for name in names {
                if !class.template_parameters.iter().any(|tp| tp.name() == name) {
                    class
                        .template_parameters
                        .push(TemplateParameter::Type { name });
                }
            }
        }
    }

    fn copy_typedef_attributes(&mut self, typedef: DeclId, target: DeclId) {
        let (attributes, metadata) = match self.graph.decl(typedef) {
            Decl::Typedef(t) => (t.attributes.clone(), t.metadata.clone()),
            _ => return,
        };
        match self.graph.decl_mut(target) {
            Decl::Class(class) => {
                class.attributes.extend(attributes);
                class.metadata.merge(metadata);
            }
            Decl::Enum(decl) => {
                decl.attributes.extend(attributes);
                decl.metadata.merge(metadata);
            }
            _ => {}
        }
    }
}
