//! Output persistence: the mirrored document tree and the card area.
//!
//! Everything lands under one output root: linked documents at their
//! input-relative paths (extension normalized to `.md`), index cards under
//! their label directories. The writer refuses any path that would escape
//! the root; nothing outside it is ever touched.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::{Error, IndexCard, LinkedDocument, Result};

/// Persists generated documents under a single output root.
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    /// Create a writer rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an index card at its deterministic path.
    ///
    /// # Errors
    /// Path escapes and IO failures.
    pub fn write_card(&self, card: &IndexCard) -> Result<PathBuf> {
        self.write_text(&card.path, &card.render())
    }

    /// Write a linked document, mirroring its input-relative path with the
    /// extension normalized to `.md`.
    ///
    /// # Errors
    /// Path escapes and IO failures.
    pub fn write_linked(&self, doc: &LinkedDocument) -> Result<PathBuf> {
        let rel = normalize_to_md(&doc.id);
        self.write_text(&rel, &doc.body)
    }

    /// Write a JSON artifact (the canonical-entity dump) at the output root.
    ///
    /// # Errors
    /// Path escapes, serialization, and IO failures.
    pub fn write_json<T: Serialize>(&self, rel: &str, value: &T) -> Result<PathBuf> {
        let mut rendered = serde_json::to_string_pretty(value)?;
        rendered.push('\n');
        self.write_text(rel, &rendered)
    }

    fn write_text(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.resolve(rel)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Resolve a relative path inside the root, rejecting anything that
    /// would land outside it.
    fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let rel_path = Path::new(rel);
        let confined = rel_path.components().all(|c| matches!(c, Component::Normal(_)));
        if rel.is_empty() || !confined {
            return Err(Error::invalid_input(format!(
                "output path '{rel}' escapes the output root"
            )));
        }
        Ok(self.root.join(rel_path))
    }
}

/// Replace a document id's extension with `.md`.
fn normalize_to_md(id: &str) -> String {
    let (dir, name) = id.rsplit_once('/').map_or(("", id), |(d, n)| (d, n));
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    if dir.is_empty() {
        format!("{stem}.md")
    } else {
        format!("{dir}/{stem}.md")
    }
}
