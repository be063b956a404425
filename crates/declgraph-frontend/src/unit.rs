//! Translation-unit container for the node stream

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeId, NodeKind};
use crate::ty::{RawType, TypeRef};

/// A complete front-end dump for one translation unit.
///
/// Node 0 is always the translation-unit root; every other node is
/// reachable from it through `children`, in the depth-first order the
/// front-end visited the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    nodes: Vec<Node>,
    types: Vec<RawType>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::TranslationUnit, "")],
            types: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn raw_type(&self, id: TypeRef) -> &RawType {
        &self.types[id.0 as usize]
    }

    /// Append a node under `parent`, wiring both parent links and the
    /// parent's child list.
    pub fn add_node(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.semantic_parent = Some(parent);
        node.lexical_parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Append a node whose lexical parent differs from its semantic
    /// parent (out-of-line definitions). The node is listed as a child
    /// of its lexical parent, where the front-end encountered it.
    pub fn add_node_out_of_line(
        &mut self,
        semantic_parent: NodeId,
        lexical_parent: NodeId,
        mut node: Node,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.semantic_parent = Some(semantic_parent);
        node.lexical_parent = Some(lexical_parent);
        self.nodes.push(node);
        self.nodes[lexical_parent.0 as usize].children.push(id);
        id
    }

    pub fn add_type(&mut self, raw: RawType) -> TypeRef {
        let id = TypeRef(self.types.len() as u32);
        self.types.push(raw);
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::TypeKind;

    #[test]
    fn test_add_node_wires_links() {
        let mut tu = TranslationUnit::new();
        let ns = tu.add_node(tu.root(), Node::new(NodeKind::Namespace, "gfx"));
        let class = tu.add_node(ns, Node::new(NodeKind::ClassDecl, "Vector3").definition());

        assert_eq!(tu.node(tu.root()).children, vec![ns]);
        assert_eq!(tu.node(ns).children, vec![class]);
        assert_eq!(tu.node(class).semantic_parent, Some(ns));
        assert_eq!(tu.node(class).lexical_parent, Some(ns));
    }

    #[test]
    fn test_out_of_line_node_keeps_both_parents() {
        let mut tu = TranslationUnit::new();
        let class = tu.add_node(tu.root(), Node::new(NodeKind::ClassDecl, "Widget").definition());
        let method = tu.add_node_out_of_line(
            class,
            tu.root(),
            Node::new(NodeKind::Method, "resize").definition(),
        );

        assert_eq!(tu.node(method).semantic_parent, Some(class));
        assert_eq!(tu.node(method).lexical_parent, Some(tu.root()));
        assert!(tu.node(tu.root()).children.contains(&method));
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut tu = TranslationUnit::new();
        let int = tu.add_type(RawType::new(TypeKind::Int, "int").sized(4, 4));
        tu.add_node(
            tu.root(),
            Node::new(NodeKind::VarDecl, "answer").with_type(int),
        );

        let json = serde_json::to_string(&tu).unwrap();
        let back: TranslationUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_count(), tu.node_count());
        assert_eq!(back.raw_type(int).spelling, "int");
    }
}
