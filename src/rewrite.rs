//! Hypertext rewriting: linked copies of source documents.
//!
//! A single pass over the document body copies non-mention text verbatim and
//! replaces each qualifying mention span with a wiki link to that entity's
//! index card. The walk is offset-based over the original body, so rerunning
//! on unchanged input yields byte-identical output and inserted links can
//! never overlap.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CanonicalKey, Document, EntityMention, MentionOrigin};

/// A transformed copy of a document's body with inline card links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedDocument {
    /// Identifier of the source document.
    pub id: String,
    /// Rewritten body.
    pub body: String,
    /// Number of links inserted.
    pub links: usize,
}

/// Ordering that decides which mention wins an overlap: earlier start first,
/// then longer span, then seeded origin. The rewriter keeps the first mention
/// of any overlapping group under this order and drops the rest silently.
///
/// This is the one change site if corpus-specific tie-breaking is ever
/// needed.
#[must_use]
pub fn mention_order(a: &EntityMention, b: &EntityMention) -> Ordering {
    a.start
        .cmp(&b.start)
        .then(b.end.cmp(&a.end))
        .then_with(|| {
            let rank = |m: &EntityMention| match m.origin {
                MentionOrigin::Seeded => 0,
                MentionOrigin::Recognized => 1,
            };
            rank(a).cmp(&rank(b))
        })
}

/// Rewrite one document, linking every mention of a qualifying entity.
///
/// `targets` maps canonical keys of qualifying entities to their card link
/// targets (e.g. `LOC/paris`); mentions of anything else are copied through
/// as plain text. Mentions with spans that are not valid `char` boundaries
/// of the body (a misbehaving backend) are skipped rather than panicking.
#[must_use]
pub fn rewrite_document(
    document: &Document,
    mentions: &[EntityMention],
    targets: &BTreeMap<CanonicalKey, String>,
) -> LinkedDocument {
    let body = &document.body;
    let mut sorted: Vec<&EntityMention> = mentions.iter().collect();
    sorted.sort_by(|a, b| mention_order(a, b));

    let mut out = String::with_capacity(body.len());
    let mut cursor = 0usize;
    let mut links = 0usize;

    for mention in sorted {
        // Later-starting overlap with an already-linked span: drop.
        if mention.start < cursor {
            continue;
        }
        let Some(target) = targets.get(&CanonicalKey::of(mention)) else {
            continue;
        };
        if mention.start >= mention.end
            || mention.end > body.len()
            || !body.is_char_boundary(mention.start)
            || !body.is_char_boundary(mention.end)
        {
            continue;
        }

        out.push_str(&body[cursor..mention.start]);
        let surface = &body[mention.start..mention.end];
        out.push_str("[[");
        out.push_str(target);
        out.push('|');
        out.push_str(surface);
        out.push_str("]]");
        cursor = mention.end;
        links += 1;
    }
    out.push_str(&body[cursor..]);

    LinkedDocument {
        id: document.id.clone(),
        body: out,
        links,
    }
}
