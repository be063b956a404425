//! Member handlers
//!
//! One method per owned kind group, all dispatched from
//! `ModelBuilder::visit_member`. Handlers materialize their parent's
//! container first, then mutate the graph through handles.

use declgraph_frontend::{EvalResult, Node, NodeId, NodeKind};
use declgraph_model::{
    BaseClass, CallingConvention, Decl, DeclId, EnumItem, Field, FunctionDecl, FunctionFlags,
    Literal, Parameter, PrimitiveKind, Property, TypeId, Visibility,
};

use crate::builder::{ModelBuilder, VisitResult};

impl ModelBuilder<'_> {
    /// Namespaces reopen freely, so every occurrence lands on the same
    /// container and contributes its members.
    pub(crate) fn visit_namespace(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.get_or_create_container(node);
        let decl = self.registry.record(container).decl;

        let (attributes, metadata) = self.convert_attributes(n);
        let ns = self.graph.expect_namespace_mut(decl);
        if ns.attributes.is_empty() {
            ns.attributes = attributes;
        }
        ns.metadata.merge(metadata);
        if ns.comment.is_none() {
            ns.comment = n.comment.clone();
        }

        self.visit_children(node);
        VisitResult::Continue
    }

    /// Class-like kinds. Creation happens in the registry; this handler
    /// only performs the one-time definition promotion.
    pub(crate) fn visit_class(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.get_or_create_container(node);
        let record = self.registry.record(container);
        let decl = record.decl;

        // A forward declaration must not flip the flag; any occurrence
        // after the defining one is a no-op on the cached record.
        if !n.is_definition || record.visited_children {
            return VisitResult::Continue;
        }
        self.registry.record_mut(container).visited_children = true;

        let (attributes, metadata) = self.convert_attributes(n);
        {
            let class = self.graph.expect_class_mut(decl);
            class.is_definition = true;
            class.is_abstract = n.is_abstract;
            class.size_of = n.size;
            class.align_of = n.align;
            class.span = n.span;
            class.attributes = attributes;
            class.metadata.merge(metadata);
            if class.comment.is_none() {
                class.comment = n.comment.clone();
            }
        }

        self.visit_children(node);
        self.resolve_properties(decl);
        VisitResult::Continue
    }

    /// Pair up declared properties with their getter/setter methods by
    /// name, within the class that was just fully visited.
    fn resolve_properties(&mut self, decl: DeclId) {
        let functions: Vec<(String, DeclId)> = self
            .graph
            .expect_class(decl)
            .members
            .functions
            .iter()
            .map(|&f| (self.graph.expect_function(f).name.clone(), f))
            .collect();

        let class = self.graph.expect_class_mut(decl);
        for property in &mut class.members.properties {
            if let Some(name) = &property.getter_name {
                property.getter = functions.iter().find(|(n, _)| n == name).map(|&(_, id)| id);
            }
            if let Some(name) = &property.setter_name {
                property.setter = functions.iter().find(|(n, _)| n == name).map(|&(_, id)| id);
            }
        }
    }

    pub(crate) fn visit_enum(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.get_or_create_container(node);
        let record = self.registry.record(container);
        let decl = record.decl;

        if !n.is_definition || record.visited_children {
            return VisitResult::Continue;
        }
        self.registry.record_mut(container).visited_children = true;

        let integer_type = n.integer_type.map(|t| self.resolve_type(t));
        let (attributes, metadata) = self.convert_attributes(n);
        {
            let decl = self.graph.expect_enum_mut(decl);
            decl.is_definition = true;
            decl.is_scoped = n.is_scoped_enum;
            decl.integer_type = integer_type;
            decl.span = n.span;
            decl.attributes = attributes;
            decl.metadata.merge(metadata);
            if decl.comment.is_none() {
                decl.comment = n.comment.clone();
            }
        }

        self.visit_children(node);
        VisitResult::Continue
    }

    pub(crate) fn visit_enum_constant(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.parent_container(node);
        let decl = self.registry.record(container).decl;
        let (attributes, metadata) = self.convert_attributes(n);

        self.graph.expect_enum_mut(decl).items.push(EnumItem {
            name: n.spelling.clone(),
            value: n.enum_value,
            value_expression: expression_text(n),
            span: n.span,
            comment: n.comment.clone(),
            attributes,
            metadata,
        });
        VisitResult::Continue
    }

    /// Fields and variables, including the anonymous-aggregate reuse:
    /// an unnamed field of an anonymous type followed by a named field
    /// of that same type is one field, not two.
    pub(crate) fn visit_field_or_variable(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.parent_container(node);
        let decl = self.registry.record(container).decl;
        let visibility = self.effective_visibility(container, n);
        let ty = self.member_type(n);
        let (attributes, metadata) = self.convert_attributes(n);

        if self.reuses_previous_anonymous_field(decl, ty) {
            let members = self
                .graph
                .decl_mut(decl)
                .members_mut()
                .unwrap_or_else(|| panic!("field parent cannot own members"));
            let prev = members.fields.last_mut().unwrap_or_else(|| panic!("no previous field"));
            prev.name = n.spelling.clone();
            prev.is_anonymous = n.spelling.is_empty();
            prev.visibility = visibility;
            prev.span = n.span;
            prev.is_bit_field = n.is_bit_field;
            prev.bit_width = n.bit_width;
            prev.bit_offset = n.bit_offset;
            prev.default_value = n.eval.as_ref().map(literal_of);
            prev.default_expression = expression_text(n);
            if !attributes.is_empty() {
                prev.attributes = attributes;
            }
            prev.metadata.merge(metadata);
            return VisitResult::Continue;
        }

        let field = Field {
            name: n.spelling.clone(),
            ty,
            visibility,
            storage: n.storage,
            is_anonymous: n.is_anonymous || n.spelling.is_empty(),
            is_bit_field: n.is_bit_field,
            bit_width: n.bit_width,
            bit_offset: n.bit_offset,
            default_value: n.eval.as_ref().map(literal_of),
            default_expression: expression_text(n),
            span: n.span,
            comment: n.comment.clone(),
            attributes,
            metadata,
        };
        match self.graph.decl_mut(decl).members_mut() {
            Some(members) => members.fields.push(field),
            None => panic!(
                "field declared inside a declaration that cannot own members"
            ),
        }
        VisitResult::Continue
    }

    fn reuses_previous_anonymous_field(&self, container: DeclId, ty: TypeId) -> bool {
        let Some(members) = self.graph.decl(container).members() else {
            return false;
        };
        let Some(prev) = members.fields.last() else {
            return false;
        };
        if !prev.name.is_empty() || !prev.is_anonymous {
            return false;
        }
        let prev_decl = self
            .graph
            .type_node(self.graph.unqualified(prev.ty))
            .referenced_decl();
        let this_decl = self
            .graph
            .type_node(self.graph.unqualified(ty))
            .referenced_decl();
        prev_decl.is_some() && prev_decl == this_decl
    }

    pub(crate) fn visit_function(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);

        // Out-of-line method definitions were already declared inside
        // their class; re-visiting them here would duplicate members.
        if let Some(semantic) = n.semantic_parent {
            if tu.node(semantic).kind.is_class() && n.lexical_parent != n.semantic_parent {
                return VisitResult::Continue;
            }
        }

        let container = self.parent_container(node);
        let parent_decl = self.registry.record(container).decl;
        let visibility = self.effective_visibility(container, n);

        let flags = FunctionFlags {
            is_method: n.kind == NodeKind::Method,
            is_constructor: n.kind == NodeKind::Constructor,
            is_destructor: n.kind == NodeKind::Destructor,
            is_function_template: n.kind == NodeKind::FunctionTemplate,
            is_virtual: n.traits.is_virtual,
            is_pure: n.traits.is_pure,
            is_const: n.traits.is_const,
            is_inline: n.traits.is_inlined,
            is_variadic: n.traits.is_variadic
                || n.ty.map(|t| tu.raw_type(t).is_variadic).unwrap_or(false),
            is_deleted: n.traits.is_deleted,
            is_defaulted: n.traits.is_defaulted,
        };

        let return_type = match n.ty.and_then(|t| tu.raw_type(t).result) {
            Some(result) => self.resolve_type(result),
            // Constructors and destructors have no result type.
            None => self.graph.primitive(PrimitiveKind::Void),
        };

        let mut parameters = Vec::new();
        for &child in &tu.node(node).children {
            let c = tu.node(child);
            if c.kind != NodeKind::ParmDecl {
                continue;
            }
            let ty = self.member_type(c);
            parameters.push(Parameter {
                name: c.spelling.clone(),
                ty,
                default_value: c.eval.as_ref().map(literal_of),
                default_expression: expression_text(c),
                span: c.span,
            });
        }

        // A definition following a forward declaration in the same
        // container updates the declared entry instead of adding one.
        if n.is_definition {
            if let Some(existing) = self.find_declared_function(parent_decl, n, parameters.len()) {
                let function = self.graph.expect_function_mut(existing);
                function.flags = flags;
                function.span = n.span;
                return VisitResult::Continue;
            }
        }

        let calling_convention = self.calling_convention_of(n);
        let template_parameters = if n.kind == NodeKind::FunctionTemplate {
            self.collect_template_parameters(node)
        } else {
            Vec::new()
        };
        let (attributes, metadata) = self.convert_attributes(n);

        let decl = self.graph.alloc_decl(Decl::Function(FunctionDecl {
            name: n.spelling.clone(),
            visibility,
            storage: n.storage,
            flags,
            calling_convention,
            return_type,
            parameters,
            template_parameters,
            parent: Some(parent_decl),
            span: n.span,
            comment: n.comment.clone(),
            attributes,
            metadata,
        }));
        self.attach_member(parent_decl, decl);
        VisitResult::Continue
    }

    fn find_declared_function(
        &self,
        container: DeclId,
        node: &Node,
        parameter_count: usize,
    ) -> Option<DeclId> {
        let members = self.graph.decl(container).members()?;
        members.functions.iter().copied().find(|&id| {
            let function = self.graph.expect_function(id);
            function.name == node.spelling && function.parameters.len() == parameter_count
        })
    }

    pub(crate) fn visit_base_specifier(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.parent_container(node);
        let decl = self.registry.record(container).decl;
        let ty = self.member_type(n);
        let visibility = if n.visibility == Visibility::Default {
            Visibility::Public
        } else {
            n.visibility
        };
        self.graph.expect_class_mut(decl).bases.push(BaseClass {
            ty,
            visibility,
            is_virtual: n.is_virtual_base,
        });
        VisitResult::Continue
    }

    pub(crate) fn visit_access_specifier(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.parent_container(node);
        self.registry.record_mut(container).current_visibility = n.visibility;
        VisitResult::Continue
    }

    pub(crate) fn visit_property(&mut self, node: NodeId) -> VisitResult {
        let tu = self.tu();
        let n = tu.node(node);
        let container = self.parent_container(node);
        let decl = self.registry.record(container).decl;
        let ty = self.member_type(n);
        let (attributes, metadata) = self.convert_attributes(n);

        self.graph
            .expect_class_mut(decl)
            .members
            .properties
            .push(Property {
                name: n.spelling.clone(),
                ty,
                getter_name: n.getter_name.clone(),
                setter_name: n.setter_name.clone(),
                getter: None,
                setter: None,
                span: n.span,
                comment: n.comment.clone(),
                attributes,
                metadata,
            });
        VisitResult::Continue
    }

    /// A member's own type, with a diagnosed placeholder when the
    /// front-end reported none.
    ///
    /// Parameter names for any function prototype inside the type come
    /// from this node's parameter children, so they are staged before
    /// resolution.
    pub(crate) fn member_type(&mut self, node: &Node) -> TypeId {
        match node.ty {
            Some(ty) => {
                self.pending_parameter_names = Some(self.parameter_names_of(node));
                let resolved = self.resolve_type(ty);
                self.pending_parameter_names = None;
                resolved
            }
            None => {
                self.diagnostics.warning(
                    format!("declaration `{}` carries no type", node.spelling),
                    node.span,
                );
                self.unexposed_placeholder(node.spelling.clone(), None)
            }
        }
    }

    /// Names of this node's parameter children, in declaration order.
    pub(crate) fn parameter_names_of(&self, node: &Node) -> Vec<String> {
        let tu = self.tu();
        node.children
            .iter()
            .map(|&child| tu.node(child))
            .filter(|c| c.kind == NodeKind::ParmDecl)
            .map(|c| c.spelling.clone())
            .collect()
    }

    fn calling_convention_of(&mut self, node: &Node) -> CallingConvention {
        match node.calling_convention.as_str() {
            "" | "default" => CallingConvention::Default,
            "c" | "cdecl" => CallingConvention::C,
            "stdcall" => CallingConvention::StdCall,
            "fastcall" => CallingConvention::FastCall,
            "thiscall" => CallingConvention::ThisCall,
            other => {
                self.diagnostics.warning(
                    format!("unhandled calling convention `{other}`"),
                    node.span,
                );
                CallingConvention::Default
            }
        }
    }
}

pub(crate) fn literal_of(eval: &EvalResult) -> Literal {
    match eval {
        EvalResult::Int(v) => Literal::Int(*v),
        EvalResult::Float(v) => Literal::Float(*v),
        EvalResult::Str(v) => Literal::Str(v.clone()),
    }
}

/// The source expression, re-joined from its tokens.
pub(crate) fn expression_text(node: &Node) -> Option<String> {
    if node.expr_tokens.is_empty() {
        None
    } else {
        Some(node.expr_tokens.join(" "))
    }
}
