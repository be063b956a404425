//! Type resolution
//!
//! Recursive construction of the type graph from raw front-end type
//! handles. Resolution routes back into the container registry whenever
//! a type denotes a class or enum, so a type reference materializes the
//! same record a direct declaration would. Resolution never fails: any
//! kind this model cannot represent produces a diagnostic and an opaque
//! placeholder.

use declgraph_frontend::{NodeKind, RawTemplateArgument, RawType, TypeKind, TypeRef};
use declgraph_model::{FunctionType, PrimitiveKind, Span, TypeId, TypeNode, TypeQualifier};

use crate::builder::ModelBuilder;

impl ModelBuilder<'_> {
    /// Resolve a raw type handle into the graph.
    ///
    /// Qualifier wrapping is applied after the unqualified type is
    /// built, and skipped when the inner node is opaque (qualifiers are
    /// already folded into its spelling) or already carries the same
    /// qualifier, so resolving the same raw type twice never nests
    /// duplicate wrappers.
    pub(crate) fn resolve_type(&mut self, ty: TypeRef) -> TypeId {
        let tu = self.tu();
        let raw = tu.raw_type(ty);
        let inner = self.resolve_type_inner(raw);
        self.apply_qualifiers(inner, raw)
    }

    fn apply_qualifiers(&mut self, inner: TypeId, raw: &RawType) -> TypeId {
        if !raw.is_const && !raw.is_volatile {
            return inner;
        }
        if self.graph.type_node(inner).is_unexposed() {
            return inner;
        }
        let mut result = inner;
        if raw.is_const && !self.has_qualifier(result, TypeQualifier::Const) {
            result = self.graph.alloc_type(TypeNode::Qualified {
                qualifier: TypeQualifier::Const,
                inner: result,
            });
        }
        if raw.is_volatile && !self.has_qualifier(result, TypeQualifier::Volatile) {
            result = self.graph.alloc_type(TypeNode::Qualified {
                qualifier: TypeQualifier::Volatile,
                inner: result,
            });
        }
        result
    }

    fn has_qualifier(&self, ty: TypeId, qualifier: TypeQualifier) -> bool {
        let mut current = ty;
        while let TypeNode::Qualified { qualifier: q, inner } = self.graph.type_node(current) {
            if *q == qualifier {
                return true;
            }
            current = *inner;
        }
        false
    }

    fn resolve_type_inner(&mut self, raw: &RawType) -> TypeId {
        match raw.kind {
            TypeKind::Void => self.graph.primitive(PrimitiveKind::Void),
            TypeKind::Bool => self.graph.primitive(PrimitiveKind::Bool),
            TypeKind::CharS | TypeKind::CharU => self.graph.primitive(PrimitiveKind::Char),
            TypeKind::SChar => self.graph.primitive(PrimitiveKind::SChar),
            TypeKind::UChar => self.graph.primitive(PrimitiveKind::UChar),
            TypeKind::WChar => self.graph.primitive(PrimitiveKind::WChar),
            TypeKind::Char16 => self.graph.primitive(PrimitiveKind::Char16),
            TypeKind::Char32 => self.graph.primitive(PrimitiveKind::Char32),
            TypeKind::Short => self.graph.primitive(PrimitiveKind::Short),
            TypeKind::UShort => self.graph.primitive(PrimitiveKind::UShort),
            TypeKind::Int => self.graph.primitive(PrimitiveKind::Int),
            TypeKind::UInt => self.graph.primitive(PrimitiveKind::UInt),
            TypeKind::Long => self.graph.primitive(PrimitiveKind::Long),
            TypeKind::ULong => self.graph.primitive(PrimitiveKind::ULong),
            TypeKind::LongLong => self.graph.primitive(PrimitiveKind::LongLong),
            TypeKind::ULongLong => self.graph.primitive(PrimitiveKind::ULongLong),
            TypeKind::Int128 => self.graph.primitive(PrimitiveKind::Int128),
            TypeKind::UInt128 => self.graph.primitive(PrimitiveKind::UInt128),
            TypeKind::Float16 => self.graph.primitive(PrimitiveKind::Float16),
            TypeKind::Float => self.graph.primitive(PrimitiveKind::Float),
            TypeKind::Double => self.graph.primitive(PrimitiveKind::Double),
            TypeKind::LongDouble => self.graph.primitive(PrimitiveKind::LongDouble),

            TypeKind::Pointer | TypeKind::BlockPointer => {
                let pointee = self.element_type(raw.pointee, raw);
                self.graph.alloc_type(TypeNode::Pointer {
                    pointee,
                    size: raw.size,
                })
            }
            TypeKind::LValueReference | TypeKind::RValueReference => {
                let pointee = self.element_type(raw.pointee, raw);
                self.graph.alloc_type(TypeNode::Reference { pointee })
            }
            TypeKind::ConstantArray | TypeKind::IncompleteArray => {
                let element = self.element_type(raw.element, raw);
                self.graph.alloc_type(TypeNode::Array {
                    element,
                    size: raw.array_size,
                })
            }
            TypeKind::DependentSizedArray => {
                self.diagnostics.warning(
                    format!("dependent-sized array `{}` kept without its extent", raw.spelling),
                    Span::dummy(),
                );
                let element = self.element_type(raw.element, raw);
                self.graph.alloc_type(TypeNode::Array {
                    element,
                    size: raw.array_size,
                })
            }

            TypeKind::Record | TypeKind::Enum => match raw.declaration {
                Some(node) => {
                    let container = self.get_or_create_container(node);
                    let decl = self.registry.record(container).decl;
                    self.decl_type(decl)
                }
                None => {
                    self.diagnostics.warning(
                        format!("record type `{}` carries no declaration", raw.spelling),
                        Span::dummy(),
                    );
                    self.unexposed_placeholder(raw.spelling.clone(), raw.size)
                }
            },

            TypeKind::Typedef => match raw.declaration {
                Some(node) => self.typedef_type_for(node),
                None => {
                    self.diagnostics.warning(
                        format!("typedef type `{}` carries no declaration", raw.spelling),
                        Span::dummy(),
                    );
                    self.unexposed_placeholder(raw.spelling.clone(), raw.size)
                }
            },

            TypeKind::Elaborated => self.resolve_elaborated(raw),

            TypeKind::FunctionProto | TypeKind::FunctionNoProto => {
                // Parameter names live on the declaring node's parameter
                // children, staged by the caller; the raw type's own
                // argument list is types only. Taken before resolving the
                // return type so a nested prototype cannot consume them.
                let names = self.pending_parameter_names.take().unwrap_or_default();
                let return_type = match raw.result {
                    Some(result) => self.resolve_type(result),
                    None => self.graph.primitive(PrimitiveKind::Void),
                };
                let parameters = raw
                    .parameters
                    .iter()
                    .enumerate()
                    .map(|(index, &p)| {
                        let name = names.get(index).cloned().unwrap_or_default();
                        (name, self.resolve_type(p))
                    })
                    .collect();
                self.graph.alloc_type(TypeNode::Function(FunctionType {
                    return_type,
                    parameters,
                    is_variadic: raw.is_variadic,
                    calling_convention: Default::default(),
                }))
            }

            TypeKind::Unexposed => self.resolve_unexposed(raw),

            TypeKind::Attributed => match raw.modified.or(raw.canonical) {
                Some(inner) => self.resolve_type(inner),
                None => {
                    self.diagnostics.warning(
                        format!("attributed type `{}` has no modified form", raw.spelling),
                        Span::dummy(),
                    );
                    self.unexposed_placeholder(raw.spelling.clone(), raw.size)
                }
            },

            TypeKind::Auto => match raw.canonical.or(raw.underlying) {
                Some(inner) => self.resolve_type(inner),
                None => {
                    self.diagnostics.warning(
                        format!("auto type `{}` was never deduced", raw.spelling),
                        Span::dummy(),
                    );
                    self.unexposed_placeholder(raw.spelling.clone(), raw.size)
                }
            },

            TypeKind::TypeParam => self.resolve_type_parameter(raw),
        }
    }

    /// Elaborated sugar: prefer an already-registered typedef or
    /// container of the same identity, then the named underlying type,
    /// then the canonical form.
    fn resolve_elaborated(&mut self, raw: &RawType) -> TypeId {
        if let Some(node) = raw.declaration {
            let identity = self.identity_of(node);
            if let Some(existing) = self.typedefs.resolve(&identity) {
                return existing;
            }
            if let Some(container) = self.registry.get(&identity) {
                let decl = self.registry.record(container).decl;
                return self.decl_type(decl);
            }
        }
        if let Some(underlying) = raw.underlying {
            return self.resolve_type(underlying);
        }
        if let Some(canonical) = raw.canonical {
            return self.resolve_type(canonical);
        }
        self.diagnostics.warning(
            format!("elaborated type `{}` has no underlying form", raw.spelling),
            Span::dummy(),
        );
        self.unexposed_placeholder(raw.spelling.clone(), raw.size)
    }

    /// Opaque kinds: recurse into the declaration when it is concrete,
    /// otherwise synthesize a placeholder carrying the spelling and any
    /// recoverable template arguments.
    fn resolve_unexposed(&mut self, raw: &RawType) -> TypeId {
        if let Some(node) = raw.declaration {
            let kind = self.tu().node(node).kind;
            if kind.is_class() || kind == NodeKind::EnumDecl {
                let container = self.get_or_create_container(node);
                let decl = self.registry.record(container).decl;
                return self.decl_type(decl);
            }
            if kind == NodeKind::TypedefDecl || kind == NodeKind::TypeAliasDecl {
                return self.typedef_type_for(node);
            }
        }
        let template_args = raw
            .template_args
            .iter()
            .filter_map(|arg| match arg {
                RawTemplateArgument::Type(ty) => Some(*ty),
                _ => None,
            })
            .map(|ty| self.resolve_type(ty))
            .collect();
        self.graph.alloc_type(TypeNode::Unexposed {
            spelling: raw.spelling.clone(),
            size: raw.size,
            template_args,
        })
    }

    /// Template parameter types are cached per identity, and recorded
    /// against the enclosing typedef when one is being resolved so they
    /// can be re-attached once its container is known.
    fn resolve_type_parameter(&mut self, raw: &RawType) -> TypeId {
        let key = raw.declaration.map(|node| self.identity_of(node));
        let id = match key.and_then(|k| self.param_types.get(&k).copied()) {
            Some(cached) => cached,
            None => {
                let id = self.graph.alloc_type(TypeNode::TemplateParameter {
                    name: raw.spelling.clone(),
                });
                if let Some(k) = key {
                    self.param_types.insert(k, id);
                }
                id
            }
        };
        if let Some(typedef) = self.current_typedef {
            self.typedef_param_types.entry(typedef).or_default().push(id);
        }
        id
    }

    fn element_type(&mut self, element: Option<TypeRef>, raw: &RawType) -> TypeId {
        match element {
            Some(ty) => self.resolve_type(ty),
            None => {
                self.diagnostics.warning(
                    format!("compound type `{}` is missing its element type", raw.spelling),
                    Span::dummy(),
                );
                self.unexposed_placeholder(raw.spelling.clone(), raw.size)
            }
        }
    }

    pub(crate) fn unexposed_placeholder(&mut self, spelling: String, size: Option<u64>) -> TypeId {
        self.graph.alloc_type(TypeNode::Unexposed {
            spelling,
            size,
            template_args: Vec::new(),
        })
    }
}
