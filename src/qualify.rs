//! Inclusion thresholds: which canonical entities get an index card.

use serde::{Deserialize, Serialize};

use crate::CanonicalEntity;

/// Inclusion thresholds for the qualifying set.
///
/// A value of 0 or 1 effectively disables that half of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum total mention count across the corpus.
    pub min_count: usize,
    /// Minimum number of distinct source documents.
    pub min_sources: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_count: 1,
            min_sources: 1,
        }
    }
}

impl Thresholds {
    /// Whether an entity belongs to the qualifying set.
    ///
    /// Seeded entities always qualify: they are explicit user intent and
    /// exempt from both thresholds independently.
    #[must_use]
    pub fn qualifies(&self, entity: &CanonicalEntity) -> bool {
        entity.is_seeded()
            || (entity.total_count >= self.min_count && entity.source_count() >= self.min_sources)
    }

    /// Filter an entity slice down to the qualifying set, preserving order.
    #[must_use]
    pub fn qualifying<'a>(&self, entities: &'a [CanonicalEntity]) -> Vec<&'a CanonicalEntity> {
        entities.iter().filter(|e| self.qualifies(e)).collect()
    }
}
