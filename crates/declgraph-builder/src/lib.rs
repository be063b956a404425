//! declgraph-builder: builds the declaration graph from a node stream
//!
//! The builder consumes a [`declgraph_frontend::TranslationUnit`] and
//! produces a deduplicated, cross-referenced
//! [`declgraph_model::DeclGraph`]. Deduplication rests on three pieces:
//! interned identity keys ([`CursorIdentity`] over the
//! [`IdentityArena`]), the memoized container registry, and a separate
//! typedef resolver that tolerates forward references and can squash a
//! typedef into the anonymous aggregate it names.
//!
//! Recoverable input problems accumulate as [`Diagnostic`]s; violations
//! of the registry invariants (argument arity on full specializations,
//! a container of the wrong variant, malformed annotate metadata) abort
//! the build with a panic, because continuing would silently corrupt
//! the graph.

mod arena;
mod builder;
mod diagnostics;
mod identity;
mod registry;
mod templates;
mod typedefs;
mod types;
mod visit;

pub use arena::{IdentityArena, Symbol, BLOCK_SIZE};
pub use builder::{build, BuildOptions, BuildResult, ModelBuilder, VisitResult};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use identity::{cursor_identity, CursorIdentity, Scope};
pub use registry::{ContainerId, ContainerKind, ContainerRecord, ContainerRegistry};
pub use typedefs::TypedefResolver;

#[cfg(test)]
mod tests {
    use super::*;
    use declgraph_frontend::{Node, NodeKind, RawType, TranslationUnit, TypeKind};
    use declgraph_model::{Decl, PrimitiveKind, TypeNode};

    #[test]
    fn test_namespace_and_class_land_under_user_root() {
        let mut tu = TranslationUnit::new();
        let ns = tu.add_node(tu.root(), Node::new(NodeKind::Namespace, "gfx"));
        tu.add_node(ns, Node::new(NodeKind::StructDecl, "Vector3").definition());

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let found = graph
            .find_by_qualified_name(graph.user_root(), "gfx::Vector3")
            .unwrap();
        let class = graph.expect_class(found);
        assert_eq!(class.name, "Vector3");
        assert!(class.is_definition);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_reopened_namespace_is_one_container() {
        let mut tu = TranslationUnit::new();
        let first = tu.add_node(tu.root(), Node::new(NodeKind::Namespace, "gfx").usr("c:@N@gfx"));
        tu.add_node(first, Node::new(NodeKind::StructDecl, "A").definition());
        let second = tu.add_node(tu.root(), Node::new(NodeKind::Namespace, "gfx").usr("c:@N@gfx"));
        tu.add_node(second, Node::new(NodeKind::StructDecl, "B").definition());

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let root_members = graph.decl(graph.user_root()).members().unwrap();
        assert_eq!(root_members.namespaces.len(), 1);
        let ns = root_members.namespaces[0];
        assert!(graph.find_by_name(ns, "A").is_some());
        assert!(graph.find_by_name(ns, "B").is_some());
    }

    #[test]
    fn test_field_type_resolves_through_registry() {
        let mut tu = TranslationUnit::new();
        let widget = tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Widget").definition());
        let widget_ty = tu.add_type(RawType::new(TypeKind::Record, "Widget").declaration(widget));
        let holder = tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Holder").definition());
        tu.add_node(holder, Node::new(NodeKind::FieldDecl, "widget").with_type(widget_ty));

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let widget_decl = graph.find_by_name(graph.user_root(), "Widget").unwrap();
        let holder_decl = graph.find_by_name(graph.user_root(), "Holder").unwrap();
        let field = &graph.expect_class(holder_decl).members.fields[0];
        assert_eq!(
            graph.type_node(graph.unqualified(field.ty)).referenced_decl(),
            Some(widget_decl)
        );
    }

    #[test]
    fn test_unhandled_member_kind_is_a_warning_not_an_abort() {
        let mut tu = TranslationUnit::new();
        tu.add_node(tu.root(), Node::new(NodeKind::TranslationUnit, ""));
        tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Survivor").definition());

        let result = build(&tu, BuildOptions::default());
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("unhandled declaration kind"));
        assert!(result
            .graph
            .find_by_name(result.graph.user_root(), "Survivor")
            .is_some());
    }

    #[test]
    fn test_enum_constant_keeps_value_and_expression() {
        let mut tu = TranslationUnit::new();
        let mut enum_node = Node::new(NodeKind::EnumDecl, "Ta").definition();
        enum_node.is_scoped_enum = true;
        let e = tu.add_node(tu.root(), enum_node);
        let mut item = Node::new(NodeKind::EnumConstantDecl, "V");
        item.enum_value = 12;
        item.expr_tokens = vec!["10".into(), "+".into(), "2".into()];
        tu.add_node(e, item);

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let decl = graph.find_by_name(graph.user_root(), "Ta").unwrap();
        let enum_decl = graph.expect_enum(decl);
        assert!(enum_decl.is_scoped);
        assert_eq!(enum_decl.items.len(), 1);
        assert_eq!(enum_decl.items[0].value, 12);
        assert_eq!(enum_decl.items[0].value_expression.as_deref(), Some("10 + 2"));
    }

    #[test]
    fn test_qualified_primitive_type() {
        let mut tu = TranslationUnit::new();
        let const_int = tu.add_type(RawType::new(TypeKind::Int, "const int").constant());
        tu.add_node(tu.root(), Node::new(NodeKind::VarDecl, "x").with_type(const_int));

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let field = &graph.decl(graph.user_root()).members().unwrap().fields[0];
        match graph.type_node(field.ty) {
            TypeNode::Qualified { inner, .. } => {
                assert_eq!(
                    graph.type_node(*inner),
                    &TypeNode::Primitive(PrimitiveKind::Int)
                );
            }
            other => panic!("expected a qualified type, got {other:?}"),
        }
    }

    #[test]
    fn test_system_declarations_skipped_by_default() {
        let mut tu = TranslationUnit::new();
        tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "SysOnly").definition().system());

        let skipped = build(&tu, BuildOptions::default());
        assert!(skipped
            .graph
            .find_by_name(skipped.graph.system_root(), "SysOnly")
            .is_none());

        let parsed = build(
            &tu,
            BuildOptions {
                parse_system_includes: true,
                ..Default::default()
            },
        );
        assert!(parsed
            .graph
            .find_by_name(parsed.graph.system_root(), "SysOnly")
            .is_some());
        assert!(parsed
            .graph
            .find_by_name(parsed.graph.user_root(), "SysOnly")
            .is_none());
    }

    #[test]
    fn test_access_specifier_updates_member_visibility() {
        use declgraph_model::Visibility;

        let mut tu = TranslationUnit::new();
        let int = tu.add_type(RawType::new(TypeKind::Int, "int"));
        let class = tu.add_node(tu.root(), Node::new(NodeKind::ClassDecl, "C").definition());
        tu.add_node(class, Node::new(NodeKind::FieldDecl, "hidden").with_type(int));
        tu.add_node(
            class,
            Node::new(NodeKind::AccessSpecifier, "").visibility(Visibility::Public),
        );
        tu.add_node(class, Node::new(NodeKind::FieldDecl, "shown").with_type(int));

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let decl = graph.find_by_name(graph.user_root(), "C").unwrap();
        let fields = &graph.expect_class(decl).members.fields;
        assert_eq!(fields[0].visibility, Visibility::Private);
        assert_eq!(fields[1].visibility, Visibility::Public);
    }

    #[test]
    fn test_annotate_attribute_feeds_metadata() {
        use declgraph_model::{Attribute, AttributeKind, MetaValue};

        let mut tu = TranslationUnit::new();
        tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "Tagged")
                .definition()
                .attribute(Attribute::new(
                    "annotate",
                    AttributeKind::Annotate,
                    r#"category = "math", vector"#,
                )),
        );

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let decl = graph.find_by_name(graph.user_root(), "Tagged").unwrap();
        let class = graph.expect_class(decl);
        assert_eq!(class.metadata.get("category"), Some(&MetaValue::Str("math".into())));
        assert_eq!(class.metadata.get("vector"), Some(&MetaValue::Bool(true)));
    }

    #[test]
    #[should_panic(expected = "malformed annotate arguments")]
    fn test_malformed_annotate_metadata_aborts() {
        use declgraph_model::{Attribute, AttributeKind};

        let mut tu = TranslationUnit::new();
        tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "Broken")
                .definition()
                .attribute(Attribute::new("annotate", AttributeKind::Annotate, "= = =")),
        );
        build(&tu, BuildOptions::default());
    }

    #[test]
    fn test_comment_attributes_recovered() {
        use declgraph_model::{Comment, MetaValue};

        let mut tu = TranslationUnit::new();
        tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "Doc")
                .definition()
                .commented(Comment::text("A widget. [[category = \"ui\"]]")),
        );

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let decl = graph.find_by_name(graph.user_root(), "Doc").unwrap();
        let class = graph.expect_class(decl);
        assert_eq!(class.metadata.get("category"), Some(&MetaValue::Str("ui".into())));
        assert_eq!(class.attributes.len(), 1);
    }

    #[test]
    fn test_forward_declaration_then_definition_is_one_decl() {
        let mut tu = TranslationUnit::new();
        tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Once").usr("c:@S@Once"));
        let def = tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "Once").usr("c:@S@Once").definition(),
        );
        let int = tu.add_type(RawType::new(TypeKind::Int, "int"));
        tu.add_node(def, Node::new(NodeKind::FieldDecl, "x").with_type(int));

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let all = graph.find_all_by_name(graph.user_root(), "Once");
        assert_eq!(all.len(), 1);
        assert_eq!(graph.expect_class(all[0]).members.fields.len(), 1);
    }

    #[test]
    fn test_decl_usage_before_definition() {
        // A type reference reaches the registry before the definition
        // cursor does; both must land on the same record.
        let mut tu = TranslationUnit::new();
        let holder = tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Holder").definition());
        let late = tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "Late").usr("c:@S@Late"),
        );
        let late_ty = tu.add_type(RawType::new(TypeKind::Record, "Late").declaration(late));
        // the field referencing Late is walked before Late's own cursor
        tu.add_node(holder, Node::new(NodeKind::FieldDecl, "late").with_type(late_ty));

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        assert_eq!(graph.find_all_by_name(graph.user_root(), "Late").len(), 1);
    }

    #[test]
    fn test_function_pointer_field_keeps_parameter_names() {
        let mut tu = TranslationUnit::new();
        let int = tu.add_type(RawType::new(TypeKind::Int, "int"));
        let mut proto = RawType::new(TypeKind::FunctionProto, "void (int)");
        proto.parameters = vec![int];
        let proto = tu.add_type(proto);
        let fn_ptr = tu.add_type(
            RawType::new(TypeKind::Pointer, "void (*)(int)")
                .pointee(proto)
                .sized(8, 8),
        );
        let holder = tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Holder").definition());
        let field = tu.add_node(holder, Node::new(NodeKind::FieldDecl, "callback").with_type(fn_ptr));
        // the parameter name lives on the field's child, not on the type
        tu.add_node(field, Node::new(NodeKind::ParmDecl, "count").with_type(int));

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let decl = graph.find_by_name(graph.user_root(), "Holder").unwrap();
        let field = &graph.expect_class(decl).members.fields[0];
        let pointee = match graph.type_node(field.ty) {
            TypeNode::Pointer { pointee, .. } => *pointee,
            other => panic!("expected a pointer type, got {other:?}"),
        };
        match graph.type_node(pointee) {
            TypeNode::Function(func) => {
                assert_eq!(func.parameters.len(), 1);
                assert_eq!(func.parameters[0].0, "count");
            }
            other => panic!("expected a function type, got {other:?}"),
        }
    }

    #[test]
    fn test_unsquashed_typedef_copies_attributes_to_unnamed_aggregate() {
        use declgraph_model::{Attribute, AttributeKind, MetaValue};

        let mut tu = TranslationUnit::new();
        let anon = tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "").anonymous(0xa11).definition(),
        );
        let anon_ty = tu.add_type(RawType::new(TypeKind::Record, "(anonymous)").declaration(anon));
        tu.add_node(
            tu.root(),
            Node::new(NodeKind::TypedefDecl, "Foo")
                .underlying(anon_ty)
                .attribute(Attribute::new(
                    "annotate",
                    AttributeKind::Annotate,
                    r#"category = "ui""#,
                )),
        );

        let result = build(
            &tu,
            BuildOptions {
                auto_squash_typedef: false,
                ..Default::default()
            },
        );
        let graph = &result.graph;
        let typedef = graph.find_by_name(graph.user_root(), "Foo").unwrap();
        assert!(matches!(graph.decl(typedef), Decl::Typedef(_)));
        // the unnamed class carries the typedef's metadata too
        let class_id = graph.decl(graph.user_root()).members().unwrap().classes[0];
        let class = graph.expect_class(class_id);
        assert!(class.name.is_empty());
        assert_eq!(class.metadata.get("category"), Some(&MetaValue::Str("ui".into())));
        assert!(!class.attributes.is_empty());
    }

    #[test]
    fn test_squashed_typedef_reattaches_parameter_types() {
        use declgraph_model::TemplateParameter;

        // The typedef is resolved before its underlying aggregate is
        // walked, so the parameter type synthesized mid-resolution is
        // first recorded against the typedef identity.
        let mut tu = TranslationUnit::new();
        let td = tu.add_node(tu.root(), Node::new(NodeKind::TypedefDecl, "Alias"));
        let anon = tu.add_node(
            tu.root(),
            Node::new(NodeKind::StructDecl, "").anonymous(0xbeef).definition(),
        );
        let tpar = tu.add_node(tu.root(), Node::new(NodeKind::TemplateTypeParameter, "T"));
        let t_ty = tu.add_type(RawType::new(TypeKind::TypeParam, "T").declaration(tpar));
        tu.add_node(
            anon,
            Node::new(NodeKind::NonTypeTemplateParameter, "N").with_type(t_ty),
        );
        let anon_ty = tu.add_type(RawType::new(TypeKind::Record, "(anonymous)").declaration(anon));
        tu.node_mut(td).underlying_type = Some(anon_ty);

        let result = build(&tu, BuildOptions::default());
        let graph = &result.graph;
        let decl = graph.find_by_name(graph.user_root(), "Alias").unwrap();
        let class = graph.expect_class(decl);
        assert_eq!(class.name, "Alias");
        let names: Vec<&str> = class.template_parameters.iter().map(|p| p.name()).collect();
        assert!(names.contains(&"N"));
        assert!(names.contains(&"T"));
        assert!(matches!(
            class.template_parameters.iter().find(|p| p.name() == "T"),
            Some(TemplateParameter::Type { .. })
        ));
        assert!(!graph.decls().any(|(_, d)| matches!(d, Decl::Typedef(_))));
    }

    #[test]
    fn test_unhandled_container_parent_is_an_error_diagnostic() {
        let mut tu = TranslationUnit::new();
        let f = tu.add_node(tu.root(), Node::new(NodeKind::FunctionDecl, "f"));
        let local = tu.add_node(f, Node::new(NodeKind::StructDecl, "Local").definition());
        let local_ty = tu.add_type(RawType::new(TypeKind::Record, "Local").declaration(local));
        tu.add_node(tu.root(), Node::new(NodeKind::VarDecl, "v").with_type(local_ty));

        let result = build(&tu, BuildOptions::default());
        let errors: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unhandled container kind"));
        // the member itself survives, reachable from the root
        assert!(result
            .graph
            .find_by_name(result.graph.user_root(), "Local")
            .is_some());
    }
}
