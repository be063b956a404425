//! Attributes and parsed attribute metadata

use crate::Span;
use serde::{Deserialize, Serialize};

/// Where an attribute came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// An `annotate(...)` attribute whose arguments feed the metadata map
    Annotate,
    /// A compiler/system attribute (visibility, alignas, dllimport, ...)
    System,
    /// A `[[...]]` attribute recovered from a documentation comment
    Comment,
}

/// A raw attribute attached to a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
    /// Unparsed argument text, exactly as the front-end reported it
    pub arguments: String,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeKind, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            arguments: arguments.into(),
            span: Span::dummy(),
        }
    }
}

/// A parsed metadata value from the annotation micro-grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A (possibly qualified, possibly templated) identifier path such
    /// as `gfx::Vector3` or `List<Int>`
    Path(String),
}

/// Ordered key/value metadata parsed from annotate attributes.
///
/// Insertion keeps the first value seen for a key; later occurrences of
/// the same key are ignored, matching how repeated annotate arguments
/// are resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaAttributeMap {
    entries: Vec<(String, MetaValue)>,
}

impl MetaAttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair unless the key is already present.
    /// Returns `true` when the value was inserted.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Merge another map into this one, first key wins.
    pub fn merge(&mut self, other: MetaAttributeMap) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
