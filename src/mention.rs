//! Mention types: entity labels, raw detections, and corpus-level mentions.

use serde::{Deserialize, Serialize};

/// Entity label classification.
///
/// Covers the label set a humanities corpus cares about (roughly the
/// OntoNotes categories worth an index card) plus [`EntityLabel::Term`]
/// for entries from the user's seed list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityLabel {
    /// Person name (PERSON)
    Person,
    /// Organization name (ORG)
    Organization,
    /// Location, including geo-political entities (LOC)
    Location,
    /// Facility: buildings, airports, bridges (FAC)
    Facility,
    /// Nationality, religious or political group (NORP)
    Group,
    /// Date or time expression (DATE)
    Date,
    /// Title of a book, song, painting (WORK_OF_ART)
    Work,
    /// Named product (PRODUCT)
    Product,
    /// Term from the user's seed list (TERM)
    Term,
    /// Other/unrecognized label from a backend
    Other(String),
}

impl EntityLabel {
    /// Convert to the label string used in card paths and wiki links.
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORG",
            EntityLabel::Location => "LOC",
            EntityLabel::Facility => "FAC",
            EntityLabel::Group => "NORP",
            EntityLabel::Date => "DATE",
            EntityLabel::Work => "WORK_OF_ART",
            EntityLabel::Product => "PRODUCT",
            EntityLabel::Term => "TERM",
            EntityLabel::Other(s) => s.as_str(),
        }
    }

    /// Parse from a backend-reported label string.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "PER" | "PERSON" => EntityLabel::Person,
            "ORG" | "ORGANIZATION" => EntityLabel::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityLabel::Location,
            "FAC" | "FACILITY" => EntityLabel::Facility,
            "NORP" | "GROUP" => EntityLabel::Group,
            "DATE" | "TIME" => EntityLabel::Date,
            "WORK_OF_ART" | "WORK" => EntityLabel::Work,
            "PRODUCT" => EntityLabel::Product,
            "TERM" | "LIST" => EntityLabel::Term,
            other => EntityLabel::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// A raw entity span reported by a recognition backend.
///
/// Offsets are byte positions into the document body the backend was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Surface text as it appeared
    pub text: String,
    /// Entity label classification
    pub label: EntityLabel,
    /// Start position (byte offset)
    pub start: usize,
    /// End position (byte offset, exclusive)
    pub end: usize,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

impl Detection {
    /// Create a new detection. Confidence is clamped to [0, 1].
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        label: EntityLabel,
        start: usize,
        end: usize,
        confidence: f64,
    ) -> Self {
        Self {
            text: text.into(),
            label,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Where a mention came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionOrigin {
    /// Produced by the recognition backend.
    Recognized,
    /// Produced by the custom seed list.
    Seeded,
}

/// One occurrence of an entity's surface form within one document.
///
/// Mentions are ephemeral: created during recognition/seeding, consumed by
/// the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMention {
    /// Surface text as it appeared
    pub surface: String,
    /// Entity label classification
    pub label: EntityLabel,
    /// Identifier of the owning document
    pub document: String,
    /// Start position (byte offset in the document body)
    pub start: usize,
    /// End position (byte offset, exclusive)
    pub end: usize,
    /// Whether this mention was recognized or seeded
    pub origin: MentionOrigin,
}

impl EntityMention {
    /// Build a mention from a backend detection.
    #[must_use]
    pub fn recognized(detection: Detection, document: impl Into<String>) -> Self {
        Self {
            surface: detection.text,
            label: detection.label,
            document: document.into(),
            start: detection.start,
            end: detection.end,
            origin: MentionOrigin::Recognized,
        }
    }

    /// Build a seeded mention.
    #[must_use]
    pub fn seeded(
        surface: impl Into<String>,
        document: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            surface: surface.into(),
            label: EntityLabel::Term,
            document: document.into(),
            start,
            end,
            origin: MentionOrigin::Seeded,
        }
    }

    /// Check if this mention's span overlaps another's (same document assumed).
    #[must_use]
    pub fn overlaps(&self, other: &EntityMention) -> bool {
        spans_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Check if two byte spans overlap.
#[inline]
#[must_use]
pub fn spans_overlap(start1: usize, end1: usize, start2: usize, end2: usize) -> bool {
    start1 < end2 && start2 < end1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        let labels = [
            EntityLabel::Person,
            EntityLabel::Organization,
            EntityLabel::Location,
            EntityLabel::Facility,
            EntityLabel::Group,
            EntityLabel::Date,
            EntityLabel::Work,
            EntityLabel::Product,
            EntityLabel::Term,
        ];

        for l in labels {
            let parsed = EntityLabel::from_label(l.as_label());
            assert_eq!(l, parsed);
        }
    }

    #[test]
    fn test_gpe_maps_to_location() {
        assert_eq!(EntityLabel::from_label("GPE"), EntityLabel::Location);
    }

    #[test]
    fn test_spans_overlap() {
        assert!(spans_overlap(0, 10, 5, 15)); // overlapping
        assert!(!spans_overlap(0, 5, 5, 10)); // adjacent
        assert!(!spans_overlap(0, 5, 10, 15)); // disjoint
        assert!(spans_overlap(0, 10, 0, 10)); // identical
    }

    #[test]
    fn test_confidence_clamping() {
        let d = Detection::new("x", EntityLabel::Person, 0, 1, 1.5);
        assert!((d.confidence - 1.0).abs() < f64::EPSILON);

        let d = Detection::new("x", EntityLabel::Person, 0, 1, -0.5);
        assert!(d.confidence.abs() < f64::EPSILON);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            s1 in 0usize..100,
            len1 in 1usize..50,
            s2 in 0usize..100,
            len2 in 1usize..50,
        ) {
            prop_assert_eq!(
                spans_overlap(s1, s1 + len1, s2, s2 + len2),
                spans_overlap(s2, s2 + len2, s1, s1 + len1)
            );
        }

        #[test]
        fn detection_confidence_always_clamped(conf in -10.0f64..10.0) {
            let d = Detection::new("x", EntityLabel::Person, 0, 1, conf);
            prop_assert!(d.confidence >= 0.0);
            prop_assert!(d.confidence <= 1.0);
        }

        #[test]
        fn label_roundtrip_stable(label in "[A-Z_]{2,12}") {
            let l = EntityLabel::from_label(&label);
            let back = EntityLabel::from_label(l.as_label());
            prop_assert_eq!(back, l);
        }
    }
}
