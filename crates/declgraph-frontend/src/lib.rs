//! declgraph-frontend: the compiler front-end boundary
//!
//! The builder never talks to a compiler directly. Instead it consumes a
//! [`TranslationUnit`]: a depth-first, kind-tagged node stream plus a
//! flat table of raw types, both produced by a front-end oracle and
//! serializable with serde so dumps can be stored and replayed.
//!
//! Everything here is deliberately dumb data. Deduplication, scope
//! assignment and cross-referencing are the builder's job; the front-end
//! only reports what the source says.

mod node;
mod ty;
mod unit;

pub use node::{FunctionTraits, Node, NodeId, NodeKind};
pub use ty::{EvalResult, RawTemplateArgument, RawType, TypeKind, TypeRef};
pub use unit::TranslationUnit;
