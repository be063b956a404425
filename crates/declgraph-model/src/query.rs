//! Name-based lookup over the declaration graph
//!
//! Lookup recurses transparently into inline namespaces, so a name
//! declared in `std::inline_v1` is found when searching `std` directly.

use crate::decl::Decl;
use crate::graph::{DeclGraph, DeclId};
use crate::NAMESPACE_SEPARATOR;

impl DeclGraph {
    /// Find the first member of `container` with the given name.
    pub fn find_by_name(&self, container: DeclId, name: &str) -> Option<DeclId> {
        self.search_child(container, name)
    }

    /// Find every member of `container` with the given name. Returns
    /// more than one element for overload sets.
    pub fn find_all_by_name(&self, container: DeclId, name: &str) -> Vec<DeclId> {
        let mut out = Vec::new();
        self.search_children(container, name, &mut out);
        out
    }

    /// Resolve a `::`-separated qualified name starting from a root
    /// container.
    pub fn find_by_qualified_name(&self, root: DeclId, qualified: &str) -> Option<DeclId> {
        let mut current = root;
        for part in qualified.split(NAMESPACE_SEPARATOR) {
            if part.is_empty() {
                continue;
            }
            current = self.search_child(current, part)?;
        }
        if current == root {
            None
        } else {
            Some(current)
        }
    }

    fn search_child(&self, container: DeclId, name: &str) -> Option<DeclId> {
        let members = self.decl(container).members()?;
        for id in members.decl_ids() {
            let decl = self.decl(id);
            if decl.name() == name {
                return Some(id);
            }
            // Inline namespaces are transparent for lookup.
            if let Decl::Namespace(ns) = decl {
                if ns.is_inline {
                    if let Some(found) = self.search_child(id, name) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    fn search_children(&self, container: DeclId, name: &str, out: &mut Vec<DeclId>) {
        let Some(members) = self.decl(container).members() else {
            return;
        };
        for id in members.decl_ids() {
            let decl = self.decl(id);
            if decl.name() == name {
                out.push(id);
            }
            if let Decl::Namespace(ns) = decl {
                if ns.is_inline {
                    self.search_children(id, name, out);
                }
            }
        }
    }
}
