//! Index card generation.
//!
//! One markdown card per qualifying entity, named deterministically from the
//! canonical name so reruns land on the same files. Cards live under
//! label-named directories (`PERSON/`, `LOC/`, `TERM/`, ...) at the output
//! root; the wiki links inserted by the rewriter (`[[LABEL/slug|surface]]`)
//! resolve against exactly that layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CanonicalEntity, EntityLabel, Error, Result};

/// A generated index card for one qualifying entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexCard {
    /// Display name (most frequent surface form).
    pub name: String,
    /// Entity label.
    pub label: EntityLabel,
    /// Total mention count across the corpus.
    pub total_count: usize,
    /// Backlinks: (document id, count in that document), ordered by id.
    pub backlinks: Vec<(String, usize)>,
    /// Card path relative to the output root, e.g. `LOC/paris.md`.
    pub path: String,
}

impl IndexCard {
    /// Build the card for a qualifying entity.
    #[must_use]
    pub fn for_entity(entity: &CanonicalEntity) -> Self {
        Self {
            name: entity.display_form(),
            label: entity.label.clone(),
            total_count: entity.total_count,
            backlinks: entity
                .counts
                .iter()
                .map(|(doc, n)| (doc.clone(), *n))
                .collect(),
            path: card_path(entity),
        }
    }

    /// Render the card body as markdown.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.name));
        out.push_str(&format!("Label: {}\n", self.label));
        out.push_str(&format!("Occurrences: {}\n\n", self.total_count));

        if self.backlinks.is_empty() {
            out.push_str("*This term was in your seed list but not found in any documents.*\n");
        } else {
            out.push_str("## Occurrences\n\n");
            for (doc, count) in &self.backlinks {
                out.push_str(&format!(
                    "- [[{}|{}]]: {}\n",
                    doc_link_target(doc),
                    doc_stem(doc),
                    count
                ));
            }
        }
        out
    }
}

/// Filename-safe slug for a canonical name: whitespace becomes `_`,
/// path-hostile characters are dropped.
#[must_use]
pub fn slug(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        "_".to_string()
    } else {
        joined
    }
}

/// Wiki-link target of an entity's card, e.g. `LOC/paris`.
#[must_use]
pub fn link_target(entity: &CanonicalEntity) -> String {
    format!("{}/{}", entity.label, slug(&entity.name))
}

/// Card path relative to the output root, e.g. `LOC/paris.md`.
#[must_use]
pub fn card_path(entity: &CanonicalEntity) -> String {
    format!("{}.md", link_target(entity))
}

/// Build cards for the whole qualifying set.
///
/// # Errors
/// [`Error::CardNameCollision`] if two distinct canonical entities map to
/// the same card path; silently merging them would corrupt the aggregate.
pub fn build_cards(qualifying: &[&CanonicalEntity]) -> Result<Vec<IndexCard>> {
    let mut by_path: BTreeMap<String, &str> = BTreeMap::new();
    let mut cards = Vec::with_capacity(qualifying.len());
    for entity in qualifying {
        let card = IndexCard::for_entity(entity);
        if let Some(existing) = by_path.insert(card.path.clone(), &entity.name) {
            if existing != entity.name {
                return Err(Error::CardNameCollision {
                    path: card.path,
                    existing: existing.to_string(),
                    incoming: entity.name.clone(),
                });
            }
        }
        cards.push(card);
    }
    Ok(cards)
}

fn doc_stem(doc_id: &str) -> &str {
    let name = doc_id.rsplit('/').next().unwrap_or(doc_id);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

fn doc_link_target(doc_id: &str) -> &str {
    let name = doc_id.rsplit('/').next().unwrap_or(doc_id);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => &doc_id[..doc_id.len() - ext.len() - 1],
        _ => doc_id,
    }
}
