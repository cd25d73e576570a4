//! # carta
//!
//! Turn a directory of plain-text/markdown documents into a cross-linked
//! note corpus: one auto-generated index card per named entity that recurs
//! with sufficient frequency and source diversity, and a linked copy of
//! every source document pointing at those cards.
//!
//! The pipeline:
//!
//! ```text
//! corpus dir ──► ingest ──► recognize + seed ──► aggregate ──► qualify
//!                                                                 │
//!                        output tree ◄── write ◄── cards + rewrite
//! ```
//!
//! - **Recognition** is pluggable: any backend implementing the
//!   [`Recognizer`] trait can supply entity spans. The built-in
//!   [`HeuristicRecognizer`] needs no model files.
//! - **Seeding** forces terms from a user-editable list into the mention
//!   stream; seeded entities always get a card, regardless of thresholds.
//! - **Aggregation** merges mentions across the whole corpus under a
//!   commutative merge, so document processing order never changes results.
//! - **Rewriting** inserts `[[LABEL/slug|surface]]` wiki links at mention
//!   offsets, never double-linking overlapping spans, and produces
//!   byte-identical output on identical input.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use carta::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new("corpus/data", "corpus/viewer");
//! let report = Pipeline::new(config)?.run()?;
//! println!("{} cards written", report.cards_written);
//! # Ok::<(), carta::Error>(())
//! ```
//!
//! ## Design notes
//!
//! - No entity disambiguation beyond case-insensitive, label-qualified
//!   surface matching: a PERSON "Mercury" and a PRODUCT "Mercury" stay two
//!   entities.
//! - Recognition failures abort the run rather than silently producing a
//!   thin, misleading corpus.

#![warn(missing_docs)]

pub mod aggregate;
pub mod cards;
pub mod cli;
mod document;
mod error;
pub mod ingest;
mod mention;
pub mod output;
pub mod qualify;
pub mod recognize;
pub mod rewrite;
pub mod seed;
mod pipeline;

// =============================================================================
// Sealed Trait Pattern
// =============================================================================
//
// Recognizer is sealed: only types in this crate implement it. Methods can
// be added in minor versions without breaking downstream, and generic code
// can rely on internal invariants (byte offsets, clamped confidence). Tests
// needing a custom backend use MockRecognizer.

mod sealed {
    /// Sealed trait marker. Cannot be implemented outside this crate.
    pub trait Sealed {}

    impl Sealed for super::recognize::HeuristicRecognizer {}
    impl Sealed for super::MockRecognizer {}
}

/// Trait for entity recognition backends.
///
/// The recognition capability is an external collaborator to the pipeline:
/// anything that maps body text to labeled spans can drive it. Backends must
/// tolerate empty output, may report overlapping spans (the rewriter resolves
/// them), and must handle non-ASCII text; offsets are byte positions into the
/// given text, on `char` boundaries.
///
/// This trait is **sealed**; see [`MockRecognizer`] for tests.
pub trait Recognizer: sealed::Sealed + Send + Sync {
    /// Extract entity spans from text.
    ///
    /// # Arguments
    /// * `text` - Document body to scan
    /// * `language` - Optional language hint (ISO 639-1 code, e.g. "en")
    ///
    /// # Errors
    /// A failed backend (missing model, rejected input) must return an error
    /// rather than an empty result: the pipeline treats failure as fatal for
    /// the run.
    fn recognize(&self, text: &str, language: Option<&str>) -> Result<Vec<Detection>>;

    /// Labels this backend can produce.
    fn supported_labels(&self) -> Vec<EntityLabel>;

    /// Check if the backend is ready to use.
    fn is_available(&self) -> bool;

    /// Backend name/identifier.
    fn name(&self) -> &'static str {
        "unknown"
    }

    /// Human-readable description.
    fn description(&self) -> &'static str {
        "Unknown recognition backend"
    }
}

/// A mock recognition backend for testing.
///
/// Returns a preset list of detections for every document, so pipeline
/// behavior can be tested without depending on heuristic quality.
///
/// # Example
///
/// ```rust
/// use carta::{Detection, EntityLabel, MockRecognizer, Recognizer};
///
/// let mock = MockRecognizer::new("test-mock")
///     .with_detections(vec![Detection::new("Paris", EntityLabel::Location, 0, 5, 0.9)]);
/// let found = mock.recognize("Paris in spring", None).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockRecognizer {
    name: &'static str,
    detections: Vec<Detection>,
    error: Option<String>,
}

impl MockRecognizer {
    /// Create a new mock backend.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            detections: Vec::new(),
            error: None,
        }
    }

    /// Set detections to return on every call.
    #[must_use]
    pub fn with_detections(mut self, detections: Vec<Detection>) -> Self {
        self.detections = detections;
        self
    }

    /// Make every call fail, for exercising fatal-recognition paths.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

impl Recognizer for MockRecognizer {
    fn recognize(&self, _text: &str, _language: Option<&str>) -> Result<Vec<Detection>> {
        if let Some(message) = &self.error {
            return Err(Error::invalid_input(message.clone()));
        }
        Ok(self.detections.clone())
    }

    fn supported_labels(&self) -> Vec<EntityLabel> {
        self.detections.iter().map(|d| d.label.clone()).collect()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "Mock recognition backend for testing"
    }
}

/// Resolve a recognition backend from its configured model name.
///
/// The `model_name` configuration value is opaque to the pipeline; this is
/// the one place it is interpreted.
///
/// # Errors
/// Unknown names produce [`Error::UnknownBackend`] listing what exists.
pub fn recognizer_for(model_name: &str) -> Result<Box<dyn Recognizer>> {
    match model_name {
        "heuristic" | "default" => Ok(Box::new(recognize::HeuristicRecognizer::new())),
        other => {
            let names: Vec<&str> = available_backends()
                .into_iter()
                .filter_map(|(name, ok)| ok.then_some(name))
                .collect();
            Err(Error::UnknownBackend(other.to_string(), names.join(", ")))
        }
    }
}

/// List known recognition backends and their availability.
#[must_use]
pub fn available_backends() -> Vec<(&'static str, bool)> {
    vec![("heuristic", true)]
}

// Re-exports
pub use document::Document;
pub use error::{Error, Result};
pub use mention::{spans_overlap, Detection, EntityLabel, EntityMention, MentionOrigin};

pub use aggregate::{Aggregator, CanonicalEntity, CanonicalKey};
pub use cards::IndexCard;
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
pub use qualify::Thresholds;
pub use recognize::HeuristicRecognizer;
pub use rewrite::LinkedDocument;
pub use seed::SeedList;
