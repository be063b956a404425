//! declgraph-attrs: the annotation argument micro-grammar
//!
//! Annotate attributes carry a comma-separated assignment list:
//!
//! ```text
//! category = "math", version = 3, vector, target = __class(gfx::Vector3(1, 2))
//! ```
//!
//! A bare identifier is shorthand for `name = true`. Values are
//! booleans, integers, floats, strings, or a `__class(Name(args))` type
//! reference whose payload (a possibly `::`-qualified, possibly
//! templated name plus its argument list) is kept textually. Repeated
//! keys keep the first value.
//!
//! This parser is self-contained: it knows nothing about declarations
//! or identity, it only turns argument text into a
//! [`declgraph_model::MetaAttributeMap`].

mod lexer;
mod parser;

pub use lexer::Token;
pub use parser::{parse_named_arguments, AttrError};
