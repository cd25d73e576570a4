//! The corpus model: documents and their metadata.

use serde::{Deserialize, Serialize};

/// One source document in the corpus.
///
/// Immutable once loaded for a pipeline run. The identifier is the
/// `/`-separated path of the file relative to the corpus root, so it doubles
/// as the output-relative path of the linked copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Relative path within the corpus tree, `/`-separated.
    pub id: String,
    /// Ordered front-matter key/value pairs. Empty if the document had none.
    pub metadata: Vec<(String, String)>,
    /// Body text with front matter stripped.
    pub body: String,
}

impl Document {
    /// Create a document with no metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: Vec::new(),
            body: body.into(),
        }
    }

    /// Attach front-matter metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Vec<(String, String)>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Look up a metadata value by key (first match wins).
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Language hint for recognition backends, if the front matter carries one.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.meta("language").or_else(|| self.meta("lang"))
    }

    /// File stem of the document id, used as the display title of backlinks.
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.id.rsplit('/').next().unwrap_or(&self.id);
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// Document id without its extension, used as a wiki-link target.
    ///
    /// Only the final path component loses its extension; dots in directory
    /// names are left alone.
    #[must_use]
    pub fn link_target(&self) -> &str {
        let name = self.id.rsplit('/').next().unwrap_or(&self.id);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => &self.id[..self.id.len() - ext.len() - 1],
            _ => &self.id,
        }
    }
}
