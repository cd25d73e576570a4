//! Custom entity seeding from a user-editable term list.
//!
//! The seed list is a plain text file, one term per line; blank lines are
//! ignored and duplicates collapse. Every term is scanned for literally and
//! case-insensitively in every document, independent of what the recognition
//! backend finds. Seeded mentions represent explicit user intent: they always
//! qualify for a card, and they win any span overlap against recognized
//! mentions.

use std::path::Path;

use regex::Regex;

use crate::{Document, EntityMention, Result};

/// A parsed seed list with per-term scan patterns.
pub struct SeedList {
    terms: Vec<String>,
    patterns: Vec<Regex>,
}

impl SeedList {
    /// Load a seed list from a file.
    ///
    /// # Errors
    /// Propagates the read error; callers treat it as a warning and fall
    /// back to [`SeedList::empty`], since recognized entities can still flow.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse seed-list content: one term per line, trimmed, case-folded,
    /// blank lines skipped, duplicates collapsed (first-seen order kept).
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for line in content.lines() {
            let term = line.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        let patterns = terms
            .iter()
            .filter_map(|t| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(t))).ok())
            .collect();
        Self { terms, patterns }
    }

    /// An empty seed list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            terms: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the list has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The normalized terms, in first-seen order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Scan a document for every term, emitting seeded mentions.
    ///
    /// Matches are literal, case-insensitive, and word-bounded. Within one
    /// term matches never overlap; across terms ("new york" and "york") the
    /// earlier-starting span wins, ties going to the longer span.
    #[must_use]
    pub fn scan(&self, document: &Document) -> Vec<EntityMention> {
        let mut found: Vec<EntityMention> = Vec::new();
        for pattern in &self.patterns {
            for m in pattern.find_iter(&document.body) {
                found.push(EntityMention::seeded(
                    m.as_str(),
                    document.id.clone(),
                    m.start(),
                    m.end(),
                ));
            }
        }
        resolve_overlaps(found)
    }
}

/// Drop later-starting mentions whose spans overlap an earlier one.
/// Ties at the same start go to the longer span.
fn resolve_overlaps(mut mentions: Vec<EntityMention>) -> Vec<EntityMention> {
    mentions.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut kept: Vec<EntityMention> = Vec::new();
    for m in mentions {
        if kept.last().map_or(true, |prev| m.start >= prev.end) {
            kept.push(m);
        }
    }
    kept
}

/// Merge recognized and seeded mentions for one document.
///
/// Seeded mentions win any byte-range overlap: the seed list is explicit
/// user intent and must not be shadowed by recognition noise. Surviving
/// mentions come back sorted by start offset.
#[must_use]
pub fn merge_mentions(
    recognized: Vec<EntityMention>,
    seeded: Vec<EntityMention>,
) -> Vec<EntityMention> {
    let mut merged = seeded;
    for mention in recognized {
        let shadowed = merged.iter().any(|s| s.overlaps(&mention));
        if !shadowed {
            merged.push(mention);
        }
    }
    merged.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityLabel, MentionOrigin};

    #[test]
    fn test_parse_skips_blanks_and_duplicates() {
        let list = SeedList::parse("Seine\n\n  \nabsinthe\nSEINE\nabsinthe\n");
        assert_eq!(list.terms(), &["seine".to_string(), "absinthe".to_string()]);
    }

    #[test]
    fn test_scan_case_insensitive() {
        let doc = Document::new("a.md", "The SEINE rose. Along the seine they walked.");
        let list = SeedList::parse("seine");
        let found = list.scan(&doc);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].surface, "SEINE");
        assert_eq!(found[1].surface, "seine");
        for m in &found {
            assert_eq!(&doc.body[m.start..m.end], m.surface);
            assert_eq!(m.origin, MentionOrigin::Seeded);
            assert_eq!(m.label, EntityLabel::Term);
        }
    }

    #[test]
    fn test_scan_respects_word_boundaries() {
        let doc = Document::new("a.md", "The artful partner spoke of art.");
        let list = SeedList::parse("art");
        let found = list.scan(&doc);
        assert_eq!(found.len(), 1, "found: {found:?}");
        assert_eq!(found[0].start, doc.body.len() - 4);
    }

    #[test]
    fn test_scan_cross_term_overlap() {
        let doc = Document::new("a.md", "We reached New York at dawn.");
        let list = SeedList::parse("york\nnew york");
        let found = list.scan(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].surface, "New York");
    }

    #[test]
    fn test_seeded_wins_overlap() {
        let doc_id = "a.md";
        let recognized = vec![
            EntityMention {
                surface: "Seine".into(),
                label: EntityLabel::Location,
                document: doc_id.into(),
                start: 4,
                end: 9,
                origin: MentionOrigin::Recognized,
            },
            EntityMention {
                surface: "Verlaine".into(),
                label: EntityLabel::Person,
                document: doc_id.into(),
                start: 20,
                end: 28,
                origin: MentionOrigin::Recognized,
            },
        ];
        let seeded = vec![EntityMention::seeded("Seine", doc_id, 4, 9)];

        let merged = merge_mentions(recognized, seeded);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].origin, MentionOrigin::Seeded);
        assert_eq!(merged[1].surface, "Verlaine");
    }

    #[test]
    fn test_merge_sorts_by_offset() {
        let recognized = vec![EntityMention {
            surface: "a".into(),
            label: EntityLabel::Person,
            document: "d".into(),
            start: 0,
            end: 1,
            origin: MentionOrigin::Recognized,
        }];
        let seeded = vec![EntityMention::seeded("b", "d", 5, 6)];
        let merged = merge_mentions(recognized, seeded);
        assert_eq!(merged[0].start, 0);
        assert_eq!(merged[1].start, 5);
    }

    #[test]
    fn test_non_ascii_scan() {
        let doc = Document::new("a.md", "Ils burent de l'absinthe — l'Absinthe verte.");
        let list = SeedList::parse("absinthe");
        let found = list.scan(&doc);
        assert_eq!(found.len(), 2);
        for m in &found {
            assert_eq!(&doc.body[m.start..m.end], m.surface);
        }
    }
}
