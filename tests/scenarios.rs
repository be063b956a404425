//! End-to-end scenarios for the declaration graph builder
//!
//! Each test feeds a hand-built node stream through the full pipeline
//! and checks the resulting graph through the query API.

use declgraph::builder::{build, BuildOptions};
use declgraph::frontend::{Node, NodeKind, RawTemplateArgument, RawType, TranslationUnit, TypeKind};
use declgraph::model::{Decl, DeclGraph, PrimitiveKind, TypeId, TypeNode};

fn build_default(tu: &TranslationUnit) -> DeclGraph {
    build(tu, BuildOptions::default()).graph
}

/// Follow typedef links until a non-typedef node is reached.
fn chase_typedefs(graph: &DeclGraph, mut ty: TypeId) -> TypeId {
    loop {
        ty = graph.unqualified(ty);
        match graph.type_node(ty) {
            TypeNode::Typedef(decl) => ty = graph.expect_typedef(*decl).underlying,
            _ => return ty,
        }
    }
}

/// `size_t Foo();` with `size_t` aliasing down to an unsigned integral
/// primitive through an intermediate typedef.
#[test]
fn function_return_type_resolves_through_typedef_chain() {
    let mut tu = TranslationUnit::new();
    let ulong = tu.add_type(RawType::new(TypeKind::ULong, "unsigned long").sized(8, 8));
    let inner_td = tu.add_node(
        tu.root(),
        Node::new(NodeKind::TypedefDecl, "__internal_size_t")
            .usr("c:size.h@T@__internal_size_t")
            .underlying(ulong),
    );
    let inner_ty = tu.add_type(RawType::new(TypeKind::Typedef, "__internal_size_t").declaration(inner_td));
    let size_td = tu.add_node(
        tu.root(),
        Node::new(NodeKind::TypedefDecl, "size_t")
            .usr("c:size.h@T@size_t")
            .underlying(inner_ty),
    );
    let size_ty = tu.add_type(RawType::new(TypeKind::Typedef, "size_t").declaration(size_td));
    let foo_ty = tu.add_type(RawType::new(TypeKind::FunctionProto, "size_t ()").result(size_ty));
    tu.add_node(tu.root(), Node::new(NodeKind::FunctionDecl, "Foo").with_type(foo_ty));
    // a second user of size_t must reuse the cached typedefs
    let bar_ty = tu.add_type(RawType::new(TypeKind::FunctionProto, "size_t ()").result(size_ty));
    tu.add_node(tu.root(), Node::new(NodeKind::FunctionDecl, "Bar").with_type(bar_ty));

    let graph = build_default(&tu);
    let root = graph.user_root();

    let foo = graph.find_by_name(root, "Foo").unwrap();
    let function = graph.expect_function(foo);
    let resolved = chase_typedefs(&graph, function.return_type);
    assert_eq!(
        graph.type_node(resolved),
        &TypeNode::Primitive(PrimitiveKind::ULong)
    );
    assert!(graph
        .type_node(graph.unqualified(function.return_type))
        .referenced_decl()
        .is_some());

    // each typedef in the chain exists exactly once
    assert_eq!(graph.find_all_by_name(root, "size_t").len(), 1);
    assert_eq!(graph.find_all_by_name(root, "__internal_size_t").len(), 1);
}

/// `enum class Ta { V = 10 + 2, };`
#[test]
fn scoped_enum_keeps_evaluated_value_and_expression() {
    let mut tu = TranslationUnit::new();
    let mut enum_node = Node::new(NodeKind::EnumDecl, "Ta").definition();
    enum_node.is_scoped_enum = true;
    let e = tu.add_node(tu.root(), enum_node);
    let mut item = Node::new(NodeKind::EnumConstantDecl, "V");
    item.enum_value = 12;
    item.expr_tokens = vec!["10".into(), "+".into(), "2".into()];
    tu.add_node(e, item);

    let graph = build_default(&tu);
    let decl = graph.find_by_name(graph.user_root(), "Ta").unwrap();
    let ta = graph.expect_enum(decl);
    assert!(ta.is_scoped);
    assert_eq!(ta.items.len(), 1);
    assert_eq!(ta.items[0].name, "V");
    assert_eq!(ta.items[0].value, 12);
    assert_eq!(ta.items[0].value_expression.as_deref(), Some("10 + 2"));
}

/// Forward declaration, then a definition with two methods and a
/// property whose getter/setter names match them.
#[test]
fn property_getter_setter_resolved_by_name() {
    let mut tu = TranslationUnit::new();
    let int = tu.add_type(RawType::new(TypeKind::Int, "int"));
    let getter_ty = tu.add_type(RawType::new(TypeKind::FunctionProto, "int ()").result(int));
    let setter_ty = tu.add_type(RawType::new(TypeKind::FunctionProto, "void (int)"));

    tu.add_node(tu.root(), Node::new(NodeKind::ClassDecl, "Widget").usr("c:@S@Widget"));
    let def = tu.add_node(
        tu.root(),
        Node::new(NodeKind::ClassDecl, "Widget").usr("c:@S@Widget").definition(),
    );
    tu.add_node(def, Node::new(NodeKind::Method, "width").with_type(getter_ty));
    let set = tu.add_node(def, Node::new(NodeKind::Method, "setWidth").with_type(setter_ty));
    tu.add_node(set, Node::new(NodeKind::ParmDecl, "value").with_type(int));
    let mut property = Node::new(NodeKind::PropertyDecl, "Width").with_type(int);
    property.getter_name = Some("width".into());
    property.setter_name = Some("setWidth".into());
    tu.add_node(def, property);

    let graph = build_default(&tu);
    let widgets = graph.find_all_by_name(graph.user_root(), "Widget");
    assert_eq!(widgets.len(), 1);
    let class = graph.expect_class(widgets[0]);
    assert_eq!(class.members.functions.len(), 2);
    assert_eq!(class.members.properties.len(), 1);

    let property = &class.members.properties[0];
    let getter = property.getter.expect("getter not resolved");
    let setter = property.setter.expect("setter not resolved");
    assert_eq!(graph.expect_function(getter).name, "width");
    assert_eq!(graph.expect_function(setter).name, "setWidth");
}

/// A class template specialized with a type argument that is only
/// forward-declared at the point of the specialization.
#[test]
fn specialization_binds_against_primary_resolved_first() {
    let mut tu = TranslationUnit::new();

    let primary = {
        let node = Node::new(NodeKind::ClassTemplate, "List").usr("c:@ST>1#T@List");
        let primary = tu.add_node(tu.root(), node);
        tu.add_node(primary, Node::new(NodeKind::TemplateTypeParameter, "T"));
        primary
    };

    let elem = tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Elem").usr("c:@S@Elem"));
    let elem_ty = tu.add_type(RawType::new(TypeKind::Record, "Elem").declaration(elem));

    let mut spec = Node::new(NodeKind::ClassDecl, "List")
        .usr("c:@S@List>#$@S@Elem")
        .display_name("List<Elem>")
        .definition();
    spec.specialized_template = Some(primary);
    spec.template_args = vec![RawTemplateArgument::Type(elem_ty)];
    tu.add_node(tu.root(), spec);

    let graph = build_default(&tu);
    let primary_decl = graph.find_by_name(graph.user_root(), "List").unwrap();
    let primary_class = graph.expect_class(primary_decl);
    assert_eq!(primary_class.template_parameters.len(), 1);

    let specialization = graph
        .find_all_by_name(graph.user_root(), "List")
        .into_iter()
        .find(|&id| graph.expect_class(id).specialized_template.is_some())
        .expect("specialization missing");
    let class = graph.expect_class(specialization);
    assert_eq!(class.template_arguments.len(), class.template_parameters.len());
    assert_eq!(class.template_arguments.len(), 1);
    assert!(class.template_arguments[0].is_specialized);
    assert_eq!(class.specialized_template, Some(primary_decl));
}

/// The same anonymous struct referenced by a bare field declaration and
/// then by a named field of the same type collapses into one field.
#[test]
fn anonymous_field_reused_by_following_named_field() {
    let mut tu = TranslationUnit::new();
    let outer = tu.add_node(tu.root(), Node::new(NodeKind::StructDecl, "Outer").definition());
    let anon = tu.add_node(
        outer,
        Node::new(NodeKind::StructDecl, "(anonymous struct)")
            .anonymous(0x5eed)
            .definition(),
    );
    let anon_ty = tu.add_type(
        RawType::new(TypeKind::Record, "(anonymous struct)").declaration(anon),
    );
    let mut bare = Node::new(NodeKind::FieldDecl, "").with_type(anon_ty);
    bare.is_anonymous = true;
    tu.add_node(outer, bare);
    tu.add_node(outer, Node::new(NodeKind::FieldDecl, "inner").with_type(anon_ty));

    let graph = build_default(&tu);
    let outer_decl = graph.find_by_name(graph.user_root(), "Outer").unwrap();
    let outer_class = graph.expect_class(outer_decl);

    assert_eq!(outer_class.members.fields.len(), 1);
    assert_eq!(outer_class.members.fields[0].name, "inner");
    assert_eq!(outer_class.members.classes.len(), 1);

    // both field references landed on the one anonymous container
    let anon_decl = outer_class.members.classes[0];
    assert_eq!(
        graph
            .type_node(graph.unqualified(outer_class.members.fields[0].ty))
            .referenced_decl(),
        Some(anon_decl)
    );
}

/// Out-of-line method definitions do not duplicate the in-class
/// declaration.
#[test]
fn out_of_line_definition_is_not_duplicated() {
    let mut tu = TranslationUnit::new();
    let int = tu.add_type(RawType::new(TypeKind::Int, "int"));
    let method_ty = tu.add_type(RawType::new(TypeKind::FunctionProto, "int ()").result(int));
    let class = tu.add_node(
        tu.root(),
        Node::new(NodeKind::ClassDecl, "Widget").usr("c:@S@Widget").definition(),
    );
    tu.add_node(class, Node::new(NodeKind::Method, "size").with_type(method_ty));
    tu.add_node_out_of_line(
        class,
        tu.root(),
        Node::new(NodeKind::Method, "size").with_type(method_ty).definition(),
    );

    let graph = build_default(&tu);
    let decl = graph.find_by_name(graph.user_root(), "Widget").unwrap();
    assert_eq!(graph.expect_class(decl).members.functions.len(), 1);
}

/// A node dump serialized to JSON builds to the same graph after a
/// round trip, the path the CLI takes for real dumps.
#[test]
fn json_dump_builds_identically() {
    let mut tu = TranslationUnit::new();
    let int = tu.add_type(RawType::new(TypeKind::Int, "int").sized(4, 4));
    let ns = tu.add_node(tu.root(), Node::new(NodeKind::Namespace, "gfx"));
    let class = tu.add_node(ns, Node::new(NodeKind::StructDecl, "Vector3").definition());
    tu.add_node(class, Node::new(NodeKind::FieldDecl, "x").with_type(int));

    let json = serde_json::to_string(&tu).unwrap();
    let reloaded: TranslationUnit = serde_json::from_str(&json).unwrap();

    let graph = build_default(&reloaded);
    let decl = graph
        .find_by_qualified_name(graph.user_root(), "gfx::Vector3")
        .unwrap();
    assert_eq!(graph.expect_class(decl).members.fields.len(), 1);
    assert_eq!(graph.decl_count(), build_default(&tu).decl_count());
}

/// Members of a linkage spec belong to the enclosing container.
#[test]
fn linkage_spec_is_transparent() {
    let mut tu = TranslationUnit::new();
    let int = tu.add_type(RawType::new(TypeKind::Int, "int"));
    let fn_ty = tu.add_type(RawType::new(TypeKind::FunctionProto, "int ()").result(int));
    let linkage = tu.add_node(tu.root(), Node::new(NodeKind::LinkageSpec, "C"));
    tu.add_node(linkage, Node::new(NodeKind::FunctionDecl, "c_api").with_type(fn_ty));

    let graph = build_default(&tu);
    let decl = graph.find_by_name(graph.user_root(), "c_api").unwrap();
    assert!(matches!(graph.decl(decl), Decl::Function(_)));
}
