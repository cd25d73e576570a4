//! Corpus loading: directory walking and front-matter splitting.
//!
//! The corpus is a snapshot: every `.txt`/`.md` file under the input root is
//! read once, its front matter split off into ordered metadata pairs, and
//! the result is immutable for the rest of the run. Document ids are
//! `/`-separated paths relative to the root, so the output tree can mirror
//! the input tree exactly.

use std::path::Path;

use walkdir::WalkDir;

use crate::{Document, Error, Result};

/// Default extensions considered part of the corpus.
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Load every corpus document under `root` with one of the given extensions
/// (matched case-insensitively), ordered by document id.
///
/// # Errors
/// Unreadable files and non-UTF-8 content are fatal: skipping a document
/// would silently distort every aggregate count downstream.
pub fn load_corpus(root: impl AsRef<Path>, extensions: &[String]) -> Result<Vec<Document>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::invalid_input(format!(
            "corpus root '{}' is not a directory",
            root.display()
        )));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::invalid_input(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches_ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                let e = e.to_lowercase();
                extensions.iter().any(|want| want.to_lowercase() == e)
            });
        if !matches_ext {
            continue;
        }

        let raw = std::fs::read_to_string(entry.path())?;
        let id = relative_id(root, entry.path())?;
        let (metadata, body) = split_front_matter(&raw);
        documents.push(Document::new(id, body).with_metadata(metadata));
    }

    documents.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(documents)
}

/// `/`-separated path of `path` relative to `root`.
fn relative_id(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        Error::invalid_input(format!("'{}' escapes the corpus root", path.display()))
    })?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Split an optional front-matter block off a document.
///
/// The block is delimited by a `---` line at the top of the file (leading
/// blank lines allowed) and a closing `---` line. Lines inside are parsed as
/// `key: value` pairs in order; values lose one layer of surrounding quotes.
/// Without a well-formed block the whole input is body.
#[must_use]
pub fn split_front_matter(input: &str) -> (Vec<(String, String)>, &str) {
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        if line.trim().is_empty() {
            offset += line.len();
        } else {
            break;
        }
    }

    let rest = &input[offset..];
    let Some(open_line) = rest.split_inclusive('\n').next() else {
        return (Vec::new(), input);
    };
    if open_line.trim() != "---" {
        return (Vec::new(), input);
    }

    let block_start = offset + open_line.len();
    let mut cursor = block_start;
    let mut metadata = Vec::new();
    for line in input[block_start..].split_inclusive('\n') {
        if line.trim() == "---" {
            let body = &input[cursor + line.len()..];
            return (metadata, body.trim_start_matches('\n'));
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                metadata.push((key.to_string(), unquote(value.trim()).to_string()));
            }
        }
        cursor += line.len();
    }

    // No closing delimiter: not front matter.
    (Vec::new(), input)
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter_split() {
        let input = "---\ntitle: \"A Season in Hell\"\nauthor: Rimbaud\nyear: 1873\n---\nI sat beauty on my knees.\n";
        let (meta, body) = split_front_matter(input);
        assert_eq!(
            meta,
            vec![
                ("title".to_string(), "A Season in Hell".to_string()),
                ("author".to_string(), "Rimbaud".to_string()),
                ("year".to_string(), "1873".to_string()),
            ]
        );
        assert_eq!(body, "I sat beauty on my knees.\n");
    }

    #[test]
    fn test_no_front_matter() {
        let input = "Just text.\n--- not a delimiter mid-line\n";
        let (meta, body) = split_front_matter(input);
        assert!(meta.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn test_unclosed_front_matter_is_body() {
        let input = "---\ntitle: open\nno closing line\n";
        let (meta, body) = split_front_matter(input);
        assert!(meta.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn test_leading_blank_lines_allowed() {
        let input = "\n\n---\nkey: value\n---\nbody\n";
        let (meta, body) = split_front_matter(input);
        assert_eq!(meta, vec![("key".to_string(), "value".to_string())]);
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_load_corpus_mirrors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("letters")).unwrap();
        std::fs::write(dir.path().join("letters/one.txt"), "Dear Paul,").unwrap();
        std::fs::write(dir.path().join("notes.md"), "A note.").unwrap();
        std::fs::write(dir.path().join("image.png"), [0u8, 1]).unwrap();

        let docs = load_corpus(dir.path(), &["txt".into(), "md".into()]).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["letters/one.txt", "notes.md"]);
    }

    #[test]
    fn test_load_corpus_missing_root() {
        let err = load_corpus("/definitely/not/here", &["txt".into()]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
