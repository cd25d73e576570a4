//! Cross-document canonicalization and aggregation.
//!
//! Mentions from every document are merged into canonical entities keyed by
//! (case-folded whitespace-normalized surface, label). The aggregate is built
//! under a commutative, associative merge: observing mentions in any order,
//! or merging per-document aggregators in any grouping, yields the same
//! counts and source sets. That makes parallel per-document recognition a
//! plain map/reduce with no coordination beyond the final merge.
//!
//! The [`Aggregator`] exclusively owns the canonical-entity map for the
//! duration of a run; downstream stages see it read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EntityLabel, EntityMention, MentionOrigin};

/// Canonicalization key: two surface forms are the same entity iff their
/// case-folded, whitespace-normalized text and their label are identical.
///
/// No fuzzy matching, no cross-label merging: a PERSON "Mercury" and a
/// PRODUCT "Mercury" are distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalKey {
    /// Case-folded, whitespace-normalized surface text.
    pub name: String,
    /// Entity label.
    pub label: EntityLabel,
}

impl CanonicalKey {
    /// Canonicalize a surface form under a label.
    #[must_use]
    pub fn new(surface: &str, label: EntityLabel) -> Self {
        Self {
            name: canonical_name(surface),
            label,
        }
    }

    /// Key for a mention.
    #[must_use]
    pub fn of(mention: &EntityMention) -> Self {
        Self::new(&mention.surface, mention.label.clone())
    }
}

/// Case-fold and whitespace-normalize a surface form.
#[must_use]
pub fn canonical_name(surface: &str) -> String {
    surface
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A canonical entity: everything the corpus knows about one name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEntity {
    /// Canonical (normalized) name.
    pub name: String,
    /// Entity label.
    pub label: EntityLabel,
    /// Total mention count across the corpus.
    pub total_count: usize,
    /// Mention count per source document, keyed by document id.
    pub counts: BTreeMap<String, usize>,
    /// Every contributing mention (needed for link placement).
    pub mentions: Vec<EntityMention>,
}

impl CanonicalEntity {
    fn empty(key: CanonicalKey) -> Self {
        Self {
            name: key.name,
            label: key.label,
            total_count: 0,
            counts: BTreeMap::new(),
            mentions: Vec::new(),
        }
    }

    /// Number of distinct documents this entity appears in.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.counts.len()
    }

    /// Document ids this entity appears in, lexicographically ordered.
    pub fn source_documents(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Whether this entity carries explicit user intent from the seed list.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.label == EntityLabel::Term
            || self
                .mentions
                .iter()
                .any(|m| m.origin == MentionOrigin::Seeded)
    }

    /// Surface form used for display, chosen order-independently:
    /// the most frequent surface, ties broken lexicographically.
    ///
    /// Falls back to the canonical name for entities with no mentions
    /// (seed terms never found in any document).
    #[must_use]
    pub fn display_form(&self) -> String {
        let mut by_surface: BTreeMap<&str, usize> = BTreeMap::new();
        for m in &self.mentions {
            *by_surface.entry(m.surface.as_str()).or_insert(0) += 1;
        }
        by_surface
            .into_iter()
            .max_by(|(s1, c1), (s2, c2)| c1.cmp(c2).then(s2.cmp(s1)))
            .map_or_else(|| self.name.clone(), |(s, _)| s.to_string())
    }
}

/// Corpus-wide mention aggregator.
///
/// Created empty, fed mentions via [`Aggregator::observe`], combined with
/// [`Aggregator::merge`]. Read-only once aggregation completes for the run.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    entities: BTreeMap<CanonicalKey, CanonicalEntity>,
}

impl Aggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one mention into the aggregate.
    pub fn observe(&mut self, mention: EntityMention) {
        let key = CanonicalKey::of(&mention);
        let entity = self
            .entities
            .entry(key.clone())
            .or_insert_with(|| CanonicalEntity::empty(key));
        entity.total_count += 1;
        *entity.counts.entry(mention.document.clone()).or_insert(0) += 1;
        entity.mentions.push(mention);
    }

    /// Fold a batch of mentions into the aggregate.
    pub fn observe_all(&mut self, mentions: impl IntoIterator<Item = EntityMention>) {
        for mention in mentions {
            self.observe(mention);
        }
    }

    /// Register a seed term so it gets a card even with zero occurrences.
    pub fn ensure_seed_term(&mut self, term: &str) {
        let key = CanonicalKey::new(term, EntityLabel::Term);
        self.entities
            .entry(key.clone())
            .or_insert_with(|| CanonicalEntity::empty(key));
    }

    /// Merge another aggregate into this one.
    ///
    /// Commutative and associative over counts and source sets, so the reduce
    /// phase after parallel per-document extraction may combine aggregators
    /// in any grouping.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (key, incoming) in other.entities {
            match self.entities.entry(key) {
                std::collections::btree_map::Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                std::collections::btree_map::Entry::Occupied(mut slot) => {
                    let entity = slot.get_mut();
                    entity.total_count += incoming.total_count;
                    for (doc, n) in incoming.counts {
                        *entity.counts.entry(doc).or_insert(0) += n;
                    }
                    entity.mentions.extend(incoming.mentions);
                }
            }
        }
        self
    }

    /// Number of canonical entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the aggregate is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by surface form and label.
    #[must_use]
    pub fn get(&self, surface: &str, label: EntityLabel) -> Option<&CanonicalEntity> {
        self.entities.get(&CanonicalKey::new(surface, label))
    }

    /// Iterate entities in key order.
    pub fn entities(&self) -> impl Iterator<Item = &CanonicalEntity> {
        self.entities.values()
    }

    /// Consume into the entity list, in key order.
    #[must_use]
    pub fn into_entities(self) -> Vec<CanonicalEntity> {
        self.entities.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(surface: &str, label: EntityLabel, doc: &str) -> EntityMention {
        EntityMention {
            surface: surface.into(),
            label,
            document: doc.into(),
            start: 0,
            end: surface.len(),
            origin: MentionOrigin::Recognized,
        }
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("  New   York "), "new york");
        assert_eq!(canonical_name("PARIS"), "paris");
        assert_eq!(canonical_name("Émile"), "émile");
    }

    #[test]
    fn test_case_insensitive_merge() {
        let mut agg = Aggregator::new();
        agg.observe(mention("Paris", EntityLabel::Location, "a.md"));
        agg.observe(mention("PARIS", EntityLabel::Location, "b.md"));
        agg.observe(mention("paris", EntityLabel::Location, "a.md"));

        assert_eq!(agg.len(), 1);
        let entity = agg.get("paris", EntityLabel::Location).unwrap();
        assert_eq!(entity.total_count, 3);
        assert_eq!(entity.source_count(), 2);
        assert_eq!(entity.counts["a.md"], 2);
    }

    #[test]
    fn test_labels_do_not_merge() {
        let mut agg = Aggregator::new();
        agg.observe(mention("Mercury", EntityLabel::Person, "a.md"));
        agg.observe(mention("Mercury", EntityLabel::Product, "a.md"));
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn test_invariants_hold() {
        let mut agg = Aggregator::new();
        for doc in ["a.md", "b.md", "c.md"] {
            agg.observe(mention("Seine", EntityLabel::Location, doc));
            agg.observe(mention("seine", EntityLabel::Location, doc));
        }
        let entity = agg.get("Seine", EntityLabel::Location).unwrap();
        assert_eq!(
            entity.total_count,
            entity.counts.values().sum::<usize>(),
            "total_count must equal the sum of per-document counts"
        );
        assert!(entity.source_count() <= entity.total_count);
    }

    #[test]
    fn test_order_independence() {
        let mentions = vec![
            mention("Paris", EntityLabel::Location, "a.md"),
            mention("Lyon", EntityLabel::Location, "a.md"),
            mention("paris", EntityLabel::Location, "b.md"),
            mention("Verlaine", EntityLabel::Person, "c.md"),
            mention("PARIS", EntityLabel::Location, "c.md"),
        ];

        let mut forward = Aggregator::new();
        forward.observe_all(mentions.clone());

        let mut backward = Aggregator::new();
        backward.observe_all(mentions.iter().rev().cloned());

        for f in forward.entities() {
            let b = backward.get(&f.name, f.label.clone()).unwrap();
            assert_eq!(f.total_count, b.total_count);
            assert_eq!(f.counts, b.counts);
        }
        assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn test_merge_matches_sequential() {
        let all = vec![
            mention("Paris", EntityLabel::Location, "a.md"),
            mention("Seine", EntityLabel::Location, "a.md"),
            mention("paris", EntityLabel::Location, "b.md"),
        ];

        let mut sequential = Aggregator::new();
        sequential.observe_all(all.clone());

        let mut left = Aggregator::new();
        left.observe(all[0].clone());
        let mut right = Aggregator::new();
        right.observe_all(all[1..].iter().cloned());
        let merged = left.merge(right);

        assert_eq!(merged.len(), sequential.len());
        for e in sequential.entities() {
            let m = merged.get(&e.name, e.label.clone()).unwrap();
            assert_eq!(e.total_count, m.total_count);
            assert_eq!(e.counts, m.counts);
        }
    }

    #[test]
    fn test_display_form_prefers_frequent_surface() {
        let mut agg = Aggregator::new();
        agg.observe(mention("PARIS", EntityLabel::Location, "a.md"));
        agg.observe(mention("Paris", EntityLabel::Location, "b.md"));
        agg.observe(mention("Paris", EntityLabel::Location, "c.md"));
        let entity = agg.get("paris", EntityLabel::Location).unwrap();
        assert_eq!(entity.display_form(), "Paris");
    }

    #[test]
    fn test_unseen_seed_term() {
        let mut agg = Aggregator::new();
        agg.ensure_seed_term("absinthe");
        let entity = agg.get("absinthe", EntityLabel::Term).unwrap();
        assert_eq!(entity.total_count, 0);
        assert!(entity.is_seeded());
        assert_eq!(entity.display_form(), "absinthe");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_mention() -> impl Strategy<Value = EntityMention> {
        ("[a-c]{1,3}", 0usize..3usize).prop_map(|(surface, doc)| EntityMention {
            surface,
            label: EntityLabel::Term,
            document: format!("doc{doc}.md"),
            start: 0,
            end: 1,
            origin: MentionOrigin::Recognized,
        })
    }

    proptest! {
        #[test]
        fn aggregation_is_order_independent(
            mentions in proptest::collection::vec(arb_mention(), 0..40),
            seed in any::<u64>(),
        ) {
            let mut forward = Aggregator::new();
            forward.observe_all(mentions.clone());

            // Deterministic shuffle from the seed.
            let mut shuffled = mentions;
            let mut state = seed;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                shuffled.swap(i, (state % (i as u64 + 1)) as usize);
            }
            let mut reordered = Aggregator::new();
            reordered.observe_all(shuffled);

            prop_assert_eq!(forward.len(), reordered.len());
            for e in forward.entities() {
                let r = reordered.get(&e.name, e.label.clone()).unwrap();
                prop_assert_eq!(e.total_count, r.total_count);
                prop_assert_eq!(&e.counts, &r.counts);
                prop_assert_eq!(e.display_form(), r.display_form());
            }
        }

        #[test]
        fn split_merge_matches_sequential(
            mentions in proptest::collection::vec(arb_mention(), 0..40),
            split in 0usize..40,
        ) {
            let split = split.min(mentions.len());
            let mut sequential = Aggregator::new();
            sequential.observe_all(mentions.clone());

            let mut left = Aggregator::new();
            left.observe_all(mentions[..split].iter().cloned());
            let mut right = Aggregator::new();
            right.observe_all(mentions[split..].iter().cloned());
            let merged = left.merge(right);

            prop_assert_eq!(sequential.len(), merged.len());
            for e in sequential.entities() {
                let m = merged.get(&e.name, e.label.clone()).unwrap();
                prop_assert_eq!(e.total_count, m.total_count);
                prop_assert_eq!(&e.counts, &m.counts);
            }
        }

        #[test]
        fn count_invariants(mentions in proptest::collection::vec(arb_mention(), 0..40)) {
            let mut agg = Aggregator::new();
            agg.observe_all(mentions);
            for e in agg.entities() {
                prop_assert_eq!(e.total_count, e.counts.values().sum::<usize>());
                prop_assert!(e.source_count() <= e.total_count);
                prop_assert_eq!(e.total_count, e.mentions.len());
            }
        }
    }
}
