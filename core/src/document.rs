use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key recording which text source produced a document.
pub const SOURCE_KEY: &str = "source";

/// A text item pulled from a text source, together with its metadata.
///
/// Documents are immutable once created, the fields are only exposed through accessors.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Document {
    content: String,
    metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: BTreeMap<String, String>) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Creates a document tagged with the name of the source it came from.
    pub fn from_source(content: impl Into<String>, source: &str) -> Self {
        Self::new(
            content,
            BTreeMap::from([(SOURCE_KEY.to_string(), source.to_string())]),
        )
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Value of the `source` metadata entry, if any.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }
}
