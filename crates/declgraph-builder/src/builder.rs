//! The model builder: walk state, dispatch and container materialization
//!
//! One [`ModelBuilder`] owns everything a build session needs: the
//! graph under construction, the identity arena, the container
//! registry, the typedef resolver and the diagnostics sink. The walk is
//! single-threaded and synchronous; the front-end stream drives it
//! depth-first and every handler runs to completion before the next
//! sibling is visited.

use std::collections::HashMap;

use declgraph_attrs::parse_named_arguments;
use declgraph_frontend::{Node, NodeId, NodeKind, TranslationUnit};
use declgraph_model::{
    Attribute, AttributeKind, ClassDecl, ClassKind, Decl, DeclGraph, DeclId, EnumDecl,
    MetaAttributeMap, NamespaceDecl, TemplateKind, TypeId, TypeNode, Visibility,
};

use crate::arena::IdentityArena;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::identity::{cursor_identity, CursorIdentity};
use crate::registry::{ContainerId, ContainerKind, ContainerRecord, ContainerRegistry};
use crate::typedefs::TypedefResolver;

/// Post-visit continuation directive returned by every handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Move on to the next sibling
    Continue,
    /// Treat this node's children as if they were the parent's
    Recurse,
    /// Stop visiting siblings
    Break,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Elide typedefs whose underlying aggregate is unnamed or shares
    /// the typedef's name, renaming the aggregate instead
    pub auto_squash_typedef: bool,
    /// Visit declarations from system headers (they land under the
    /// system root either way, this only controls whether they are
    /// walked at all)
    pub parse_system_includes: bool,
    /// Recover `[[...]]` attributes embedded in documentation comments
    pub parse_comment_attributes: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            auto_squash_typedef: true,
            parse_system_includes: false,
            parse_comment_attributes: true,
        }
    }
}

/// The finished graph plus everything the walk complained about
#[derive(Debug)]
pub struct BuildResult {
    pub graph: DeclGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build a declaration graph from a front-end translation unit.
pub fn build(tu: &TranslationUnit, options: BuildOptions) -> BuildResult {
    let mut builder = ModelBuilder::new(tu, options);
    builder.visit_children(tu.root());
    builder.finish()
}

pub struct ModelBuilder<'tu> {
    tu: &'tu TranslationUnit,
    pub(crate) graph: DeclGraph,
    pub(crate) arena: IdentityArena,
    pub(crate) registry: ContainerRegistry,
    pub(crate) typedefs: TypedefResolver,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) options: BuildOptions,
    user_root: ContainerId,
    system_root: ContainerId,
    /// Root in effect for the member currently being dispatched
    current_root: ContainerId,
    /// Set while resolving a typedef's underlying type, so template
    /// parameter types synthesized during that resolution can be
    /// re-attached once the typedef's final container is known
    pub(crate) current_typedef: Option<CursorIdentity>,
    /// Parameter names for the next function prototype resolved, taken
    /// from the declaring node's parameter children. The raw type's own
    /// argument list carries no names.
    pub(crate) pending_parameter_names: Option<Vec<String>>,
    /// Template parameter types already synthesized, per identity
    pub(crate) param_types: HashMap<CursorIdentity, TypeId>,
    /// Parameter types recorded against a typedef identity, pending
    /// re-attachment
    pub(crate) typedef_param_types: HashMap<CursorIdentity, Vec<TypeId>>,
    /// Cache of the one type node referring to each class/enum decl
    decl_types: HashMap<DeclId, TypeId>,
}

impl<'tu> ModelBuilder<'tu> {
    pub fn new(tu: &'tu TranslationUnit, options: BuildOptions) -> Self {
        let graph = DeclGraph::new();
        let mut registry = ContainerRegistry::new();
        let user_root = registry.insert_root(ContainerRecord {
            decl: graph.user_root(),
            kind: ContainerKind::TranslationUnit,
            visited_children: true,
            current_visibility: Visibility::Public,
        });
        let system_root = registry.insert_root(ContainerRecord {
            decl: graph.system_root(),
            kind: ContainerKind::TranslationUnit,
            visited_children: true,
            current_visibility: Visibility::Public,
        });
        Self {
            tu,
            graph,
            arena: IdentityArena::new(),
            registry,
            typedefs: TypedefResolver::new(),
            diagnostics: Diagnostics::new(),
            options,
            user_root,
            system_root,
            current_root: user_root,
            current_typedef: None,
            pending_parameter_names: None,
            param_types: HashMap::new(),
            typedef_param_types: HashMap::new(),
            decl_types: HashMap::new(),
        }
    }

    pub fn finish(self) -> BuildResult {
        BuildResult {
            graph: self.graph,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    pub(crate) fn tu(&self) -> &'tu TranslationUnit {
        self.tu
    }

    /// Visit every child of `parent`, honoring each handler's
    /// continuation directive.
    pub(crate) fn visit_children(&mut self, parent: NodeId) {
        let tu = self.tu;
        for &child in &tu.node(parent).children {
            match self.visit_member(child) {
                VisitResult::Continue => {}
                VisitResult::Recurse => self.visit_children(child),
                VisitResult::Break => break,
            }
        }
    }

    /// Dispatch one member node to its handler.
    ///
    /// This match is the single place that switches on raw node kinds;
    /// handlers own sets of related kinds and everything else produces
    /// a non-fatal diagnostic so one unsupported construct never aborts
    /// the walk.
    pub(crate) fn visit_member(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu;
        let n = tu.node(node);
        if n.in_system_header && !self.options.parse_system_includes {
            return VisitResult::Continue;
        }
        self.current_root = if n.in_system_header {
            self.system_root
        } else {
            self.user_root
        };

        match n.kind {
            NodeKind::Namespace => self.visit_namespace(node),
            NodeKind::ClassDecl
            | NodeKind::StructDecl
            | NodeKind::UnionDecl
            | NodeKind::ClassTemplate
            | NodeKind::ClassTemplatePartialSpecialization => self.visit_class(node),
            NodeKind::EnumDecl => self.visit_enum(node),
            NodeKind::EnumConstantDecl => self.visit_enum_constant(node),
            NodeKind::FieldDecl | NodeKind::VarDecl => self.visit_field_or_variable(node),
            NodeKind::FunctionDecl
            | NodeKind::Method
            | NodeKind::Constructor
            | NodeKind::Destructor
            | NodeKind::FunctionTemplate => self.visit_function(node),
            NodeKind::TypedefDecl | NodeKind::TypeAliasDecl => self.visit_typedef(node),
            NodeKind::BaseSpecifier => self.visit_base_specifier(node),
            NodeKind::AccessSpecifier => self.visit_access_specifier(node),
            NodeKind::PropertyDecl => self.visit_property(node),
            // Linkage specs and unexposed wrappers are transparent:
            // their children belong to the enclosing container.
            NodeKind::LinkageSpec | NodeKind::UnexposedDecl => VisitResult::Recurse,
            // Owned by other handlers or irrelevant at member level.
            NodeKind::ParmDecl
            | NodeKind::TypeRef
            | NodeKind::Attribute
            | NodeKind::TemplateTypeParameter
            | NodeKind::NonTypeTemplateParameter
            | NodeKind::TemplateTemplateParameter => VisitResult::Continue,
            NodeKind::TranslationUnit => {
                self.diagnostics
                    .warning("unhandled declaration kind TranslationUnit", n.span);
                VisitResult::Continue
            }
        }
    }

    pub(crate) fn identity_of(&mut self, node: NodeId) -> CursorIdentity {
        cursor_identity(self.tu, node, &mut self.arena)
    }

    /// Container record for a node's semantic parent, materializing it
    /// (and its ancestors) if this is the first reference.
    pub(crate) fn parent_container(&mut self, node: NodeId) -> ContainerId {
        match self.tu.node(node).semantic_parent {
            Some(parent) => self.get_or_create_container(parent),
            None => self.current_root,
        }
    }

    /// The memoized get-or-create at the heart of deduplication.
    ///
    /// Creation recurses up to the root first, so a parent container is
    /// always allocated before any of its members, and inserts the new
    /// record before populating template state so re-entrant references
    /// land on the same record.
    pub(crate) fn get_or_create_container(&mut self, node: NodeId) -> ContainerId {
        let tu = self.tu;
        let mut node = node;
        // Linkage specs never form containers of their own.
        while tu.node(node).kind == NodeKind::LinkageSpec {
            match tu.node(node).semantic_parent {
                Some(parent) => node = parent,
                None => return self.current_root,
            }
        }

        let n = tu.node(node);
        match n.kind {
            NodeKind::TranslationUnit | NodeKind::UnexposedDecl => return self.current_root,
            NodeKind::Namespace | NodeKind::EnumDecl => {}
            kind if kind.is_class() => {}
            other => {
                // Error severity: the member is kept, reachable from the
                // root, but its recorded parent is wrong.
                self.diagnostics.error(
                    format!("unhandled container kind {other:?}, treating as root"),
                    n.span,
                );
                return self.current_root;
            }
        }

        let identity = self.identity_of(node);
        if let Some(existing) = self.registry.get(&identity) {
            return existing;
        }

        let parent = self.parent_container(node);
        match n.kind {
            NodeKind::Namespace => self.create_namespace_container(node, identity, parent),
            NodeKind::EnumDecl => self.create_enum_container(node, identity, parent),
            _ => self.create_class_container(node, identity, parent),
        }
    }

    fn create_namespace_container(
        &mut self,
        node: NodeId,
        identity: CursorIdentity,
        parent: ContainerId,
    ) -> ContainerId {
        let tu = self.tu;
        let n = tu.node(node);
        let parent_decl = self.registry.record(parent).decl;
        let decl = self.graph.alloc_decl(Decl::Namespace(NamespaceDecl {
            name: n.spelling.clone(),
            is_inline: n.is_inline_namespace,
            parent: Some(parent_decl),
            span: n.span,
            comment: n.comment.clone(),
            attributes: Vec::new(),
            metadata: MetaAttributeMap::new(),
            members: Default::default(),
        }));
        self.attach_member(parent_decl, decl);
        self.registry.insert(
            identity,
            ContainerRecord {
                decl,
                kind: ContainerKind::Namespace,
                visited_children: false,
                current_visibility: Visibility::Public,
            },
        )
    }

    fn create_enum_container(
        &mut self,
        node: NodeId,
        identity: CursorIdentity,
        parent: ContainerId,
    ) -> ContainerId {
        let tu = self.tu;
        let n = tu.node(node);
        let parent_decl = self.registry.record(parent).decl;
        let visibility = self.effective_visibility(parent, n);
        let decl = self.graph.alloc_decl(Decl::Enum(EnumDecl {
            name: n.spelling.clone(),
            visibility,
            is_anonymous: n.is_anonymous,
            is_scoped: n.is_scoped_enum,
            is_definition: false,
            integer_type: None,
            parent: Some(parent_decl),
            span: n.span,
            comment: n.comment.clone(),
            attributes: Vec::new(),
            metadata: MetaAttributeMap::new(),
            items: Vec::new(),
        }));
        self.attach_member(parent_decl, decl);
        self.registry.insert(
            identity,
            ContainerRecord {
                decl,
                kind: ContainerKind::Enum,
                visited_children: false,
                current_visibility: Visibility::Public,
            },
        )
    }

    fn create_class_container(
        &mut self,
        node: NodeId,
        identity: CursorIdentity,
        parent: ContainerId,
    ) -> ContainerId {
        let tu = self.tu;
        let n = tu.node(node);
        let parent_decl = self.registry.record(parent).decl;
        let visibility = self.effective_visibility(parent, n);
        let class_kind = match n.kind {
            NodeKind::StructDecl => ClassKind::Struct,
            NodeKind::UnionDecl => ClassKind::Union,
            _ => ClassKind::Class,
        };
        let template_kind = if n.kind == NodeKind::ClassTemplate {
            TemplateKind::Template
        } else if n.kind == NodeKind::ClassTemplatePartialSpecialization {
            TemplateKind::PartialSpecialization
        } else if n.specialized_template.is_some() {
            TemplateKind::Specialization
        } else {
            TemplateKind::None
        };

        let decl = self.graph.alloc_decl(Decl::Class(ClassDecl {
            name: n.spelling.clone(),
            class_kind,
            visibility,
            is_anonymous: n.is_anonymous,
            is_abstract: n.is_abstract,
            is_definition: false,
            size_of: None,
            align_of: None,
            parent: Some(parent_decl),
            span: n.span,
            comment: n.comment.clone(),
            attributes: Vec::new(),
            metadata: MetaAttributeMap::new(),
            bases: Vec::new(),
            template_kind,
            template_parameters: Vec::new(),
            template_arguments: Vec::new(),
            specialized_template: None,
            members: Default::default(),
        }));
        self.attach_member(parent_decl, decl);

        // Members of a `class` default to private, everything else to
        // public.
        let default_visibility = if n.kind == NodeKind::ClassDecl {
            Visibility::Private
        } else {
            Visibility::Public
        };
        let id = self.registry.insert(
            identity,
            ContainerRecord {
                decl,
                kind: ContainerKind::Class,
                visited_children: false,
                current_visibility: default_visibility,
            },
        );

        // Template state is filled after the record is registered:
        // resolving the primary template or an argument type may reach
        // this identity again, and must land on the record above.
        let params = self.collect_template_parameters(node);
        self.graph.expect_class_mut(decl).template_parameters = params;
        if let Some(primary_node) = n.specialized_template {
            self.bind_specialization(decl, node, primary_node);
        }
        id
    }

    /// A member's effective visibility: the node's own when explicit,
    /// otherwise the container's current access-specifier cursor.
    pub(crate) fn effective_visibility(&self, container: ContainerId, node: &Node) -> Visibility {
        if node.visibility != Visibility::Default {
            node.visibility
        } else {
            self.registry.record(container).current_visibility
        }
    }

    /// Append a declaration handle to its parent's member list.
    pub(crate) fn attach_member(&mut self, parent: DeclId, decl: DeclId) {
        enum Slot {
            Namespace,
            Class,
            Enum,
            Typedef,
            Function,
        }
        let slot = match self.graph.decl(decl) {
            Decl::Namespace(_) => Slot::Namespace,
            Decl::Class(_) => Slot::Class,
            Decl::Enum(_) => Slot::Enum,
            Decl::Typedef(_) => Slot::Typedef,
            Decl::Function(_) => Slot::Function,
            Decl::TranslationUnit(_) => panic!("translation units cannot be members"),
        };
        let parent_kind = self.graph.decl(parent).kind_name();
        let members = match self.graph.decl_mut(parent).members_mut() {
            Some(members) => members,
            None => panic!("a {parent_kind} cannot own members"),
        };
        match slot {
            Slot::Namespace => members.namespaces.push(decl),
            Slot::Class => members.classes.push(decl),
            Slot::Enum => members.enums.push(decl),
            Slot::Typedef => members.typedefs.push(decl),
            Slot::Function => members.functions.push(decl),
        }
    }

    /// The one type node referring to a class or enum declaration.
    pub(crate) fn decl_type(&mut self, decl: DeclId) -> TypeId {
        if let Some(existing) = self.decl_types.get(&decl) {
            return *existing;
        }
        let node = match self.graph.decl(decl) {
            Decl::Class(_) => TypeNode::Class(decl),
            Decl::Enum(_) => TypeNode::Enum(decl),
            Decl::Typedef(_) => TypeNode::Typedef(decl),
            other => panic!("declaration {} has no type-node form", other.kind_name()),
        };
        let id = self.graph.alloc_type(node);
        self.decl_types.insert(decl, id);
        id
    }

    /// Convert a node's raw attributes (plus any recovered from its
    /// comment) into the attribute list and parsed metadata map.
    ///
    /// Malformed annotate arguments abort the build: by the time a node
    /// reaches us its attribute text is machine-generated, so a parse
    /// failure means corrupted input, not a user typo.
    pub(crate) fn convert_attributes(&mut self, node: &Node) -> (Vec<Attribute>, MetaAttributeMap) {
        let mut attributes = node.attributes.clone();
        let mut metadata = MetaAttributeMap::new();
        for attribute in &node.attributes {
            if attribute.kind == AttributeKind::Annotate {
                match parse_named_arguments(&attribute.arguments) {
                    Ok(parsed) => metadata.merge(parsed),
                    Err(err) => panic!(
                        "malformed annotate arguments `{}`: {err}",
                        attribute.arguments
                    ),
                }
            }
        }

        if self.options.parse_comment_attributes {
            if let Some(comment) = &node.comment {
                let text = comment.flatten_text();
                for snippet in extract_bracketed_attributes(&text) {
                    match parse_named_arguments(&snippet) {
                        Ok(parsed) => metadata.merge(parsed),
                        Err(err) => {
                            self.diagnostics.warning(
                                format!("unparseable comment attribute `[[{snippet}]]`: {err}"),
                                node.span,
                            );
                            continue;
                        }
                    }
                    let mut attribute =
                        Attribute::new(snippet.clone(), AttributeKind::Comment, snippet);
                    attribute.span = node.span;
                    attributes.push(attribute);
                }
            }
        }

        (attributes, metadata)
    }
}

/// Extract the contents of every `[[...]]` occurrence in a comment.
fn extract_bracketed_attributes(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("[[") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("]]") else {
            break;
        };
        out.push(after[..end].to_string());
        rest = &after[end + 2..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bracketed_attributes() {
        let text = "Adds numbers. [[category = \"math\"]] and [[fast]] done";
        assert_eq!(
            extract_bracketed_attributes(text),
            vec!["category = \"math\"".to_string(), "fast".to_string()]
        );
        assert!(extract_bracketed_attributes("no attributes here").is_empty());
        assert!(extract_bracketed_attributes("dangling [[ start").is_empty());
    }
}
