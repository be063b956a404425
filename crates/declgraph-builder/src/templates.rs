//! Template parameter collection and specialization binding

use declgraph_frontend::{NodeId, NodeKind, RawTemplateArgument};
use declgraph_model::{
    DeclId, TemplateArgument, TemplateArgumentValue, TemplateKind, TemplateParameter, TypeNode,
};

use crate::builder::ModelBuilder;

impl ModelBuilder<'_> {
    /// Gather the template parameters declared on a template node's
    /// children, in declaration order.
    pub(crate) fn collect_template_parameters(&mut self, node: NodeId) -> Vec<TemplateParameter> {
        let tu = self.tu();
        let mut params = Vec::new();
        for &child in &tu.node(node).children {
            let c = tu.node(child);
            match c.kind {
                NodeKind::TemplateTypeParameter => params.push(TemplateParameter::Type {
                    name: c.spelling.clone(),
                }),
                NodeKind::NonTypeTemplateParameter => {
                    let ty = self.member_type(c);
                    params.push(TemplateParameter::NonType {
                        name: c.spelling.clone(),
                        ty,
                    });
                }
                NodeKind::TemplateTemplateParameter => params.push(TemplateParameter::Template {
                    name: c.spelling.clone(),
                }),
                _ => {}
            }
        }
        params
    }

    /// Resolve a specialization's primary template, then bind its raw
    /// arguments positionally against the primary's parameter list.
    ///
    /// The primary is materialized first, recursively, so argument
    /// binding always sees its full parameter list even when the
    /// specialization is encountered before the primary's definition.
    pub(crate) fn bind_specialization(&mut self, decl: DeclId, node: NodeId, primary_node: NodeId) {
        let tu = self.tu();
        let n = tu.node(node);
        let primary_container = self.get_or_create_container(primary_node);
        let primary_decl = self.registry.record(primary_container).decl;
        let primary_params = self
            .graph
            .expect_class(primary_decl)
            .template_parameters
            .clone();

        // A full specialization binding the wrong number of arguments
        // means the primary was resolved incorrectly; continuing would
        // corrupt every consumer of this binding.
        let template_kind = self.graph.expect_class(decl).template_kind;
        if template_kind == TemplateKind::Specialization
            && n.template_args.len() != primary_params.len()
        {
            panic!(
                "specialization of `{}` binds {} arguments against {} parameters",
                self.graph.expect_class(primary_decl).name,
                n.template_args.len(),
                primary_params.len()
            );
        }

        let mut arguments = Vec::with_capacity(n.template_args.len());
        for (index, raw_arg) in n.template_args.iter().enumerate() {
            let parameter = primary_params
                .get(index)
                .cloned()
                .unwrap_or_else(|| TemplateParameter::Type {
                    name: format!("T{index}"),
                });
            let argument = match raw_arg {
                RawTemplateArgument::Type(ty) => {
                    let resolved = self.resolve_type(*ty);
                    // An argument that is itself a free template
                    // parameter does not specialize anything.
                    let is_specialized = !matches!(
                        self.graph.type_node(self.graph.unqualified(resolved)),
                        TypeNode::TemplateParameter { .. }
                    );
                    TemplateArgument {
                        parameter,
                        value: TemplateArgumentValue::Type(resolved),
                        is_specialized,
                    }
                }
                RawTemplateArgument::Integral(value) => TemplateArgument {
                    parameter,
                    value: TemplateArgumentValue::Integral(*value),
                    is_specialized: true,
                },
                RawTemplateArgument::Other { kind, text } => {
                    self.diagnostics.warning(
                        format!("unsupported template argument kind `{kind}`, kept as text"),
                        n.span,
                    );
                    TemplateArgument {
                        parameter,
                        value: TemplateArgumentValue::Text(text.clone()),
                        is_specialized: false,
                    }
                }
            };
            arguments.push(argument);
        }

        // Partial specializations keep their own parameter list; full
        // specializations inherit the primary's.
        let class = self.graph.expect_class_mut(decl);
        if class.template_kind == TemplateKind::Specialization {
            class.template_parameters = primary_params;
        }
        class.template_arguments = arguments;
        class.specialized_template = Some(primary_decl);
    }
}
