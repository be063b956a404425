//! Container registry: the memoized identity → container map
//!
//! Every container-like declaration (translation unit, namespace,
//! class, enum) gets exactly one [`ContainerRecord`] per
//! [`CursorIdentity`] for the lifetime of a build. Records are created
//! on first reference, whether that reference is a declaration, a type
//! reference or a base clause, and are never destroyed individually.

use declgraph_model::{DeclId, Visibility};
use std::collections::HashMap;

use crate::identity::CursorIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    TranslationUnit,
    Namespace,
    Class,
    Enum,
}

/// Handle to a container record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(u32);

/// Mutable per-container build state.
///
/// `visited_children` flips exactly once, on the occurrence that is a
/// definition; `current_visibility` is the access-specifier cursor used
/// while scanning the container's members.
#[derive(Debug, Clone)]
pub struct ContainerRecord {
    pub decl: DeclId,
    pub kind: ContainerKind,
    pub visited_children: bool,
    pub current_visibility: Visibility,
}

#[derive(Debug, Default)]
pub struct ContainerRegistry {
    map: HashMap<CursorIdentity, ContainerId>,
    records: Vec<ContainerRecord>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &CursorIdentity) -> Option<ContainerId> {
        self.map.get(identity).copied()
    }

    /// Add a record for an identity, unless one already exists.
    ///
    /// Creation can re-enter the registry (resolving a specialization's
    /// primary template or argument types may reach the same identity),
    /// so insertion returns the existing record when the key was filled
    /// in the meantime. The caller's candidate record is dropped in
    /// that case.
    pub fn insert(&mut self, identity: CursorIdentity, record: ContainerRecord) -> ContainerId {
        if let Some(existing) = self.map.get(&identity) {
            return *existing;
        }
        let id = ContainerId(self.records.len() as u32);
        self.records.push(record);
        self.map.insert(identity, id);
        id
    }

    /// Add an unkeyed record. Used for the two translation-unit roots,
    /// which are selected by scope rather than looked up by identity.
    pub fn insert_root(&mut self, record: ContainerRecord) -> ContainerId {
        let id = ContainerId(self.records.len() as u32);
        self.records.push(record);
        id
    }

    pub fn record(&self, id: ContainerId) -> &ContainerRecord {
        &self.records[id.0 as usize]
    }

    pub fn record_mut(&mut self, id: ContainerId) -> &mut ContainerRecord {
        &mut self.records[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
