//! Cursor identity keys
//!
//! A declaration can be reached many ways during a walk (direct
//! declaration, type reference, base clause). All of them must land on
//! the same graph node, so every node occurrence is reduced to a
//! [`CursorIdentity`] key: its stable signature, tagged with the scope
//! it lives in and, for anonymous entities, a structural discriminator.

use declgraph_frontend::{Node, NodeId, TranslationUnit};

use crate::arena::{IdentityArena, Symbol};

/// Which world a declaration belongs to. Identical names in system
/// headers and user code are distinct declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    User,
    System,
}

/// The deduplication key for one declaration.
///
/// Equality requires identical scope and name. The anonymity
/// discriminator only participates for anonymous entities, where the
/// generated display name alone would collapse distinct aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorIdentity {
    pub scope: Scope,
    pub name: Symbol,
    pub anonymity: Option<u64>,
}

impl CursorIdentity {
    /// The same identity re-tagged with another scope, used by typedef
    /// lookup to probe the system scope from user code.
    pub fn with_scope(self, scope: Scope) -> Self {
        Self { scope, ..self }
    }
}

/// Derive the identity key for a node.
///
/// The global symbol signature is preferred when the front-end provides
/// one; otherwise the display name stands in. Both are interned so the
/// resulting key is cheap to copy, compare and hash.
pub fn cursor_identity(
    tu: &TranslationUnit,
    node: NodeId,
    arena: &mut IdentityArena,
) -> CursorIdentity {
    let n = tu.node(node);
    CursorIdentity {
        scope: scope_of(n),
        name: arena.intern(signature_of(n).as_bytes()),
        anonymity: n.is_anonymous.then_some(n.structural_hash),
    }
}

pub fn scope_of(node: &Node) -> Scope {
    if node.in_system_header {
        Scope::System
    } else {
        Scope::User
    }
}

fn signature_of(node: &Node) -> &str {
    if node.usr.is_empty() {
        node.display_or_spelling()
    } else {
        &node.usr
    }
}
