//! Recognition backends.
//!
//! Recognition is an external capability from the pipeline's point of view:
//! anything implementing [`crate::Recognizer`] can supply entity spans. This
//! module holds the built-in backends.
//!
//! | Backend | Needs | Labels |
//! |---------|-------|--------|
//! | [`HeuristicRecognizer`] | nothing | PERSON, ORG, LOC, FAC, NORP, DATE, WORK_OF_ART |
//! | [`crate::MockRecognizer`] | nothing | whatever the test presets |
//!
//! An ML-backed adapter (spaCy-equivalent, transformer NER) would live here
//! too; the trait contract is the only coupling point.

pub mod heuristic;

pub use heuristic::HeuristicRecognizer;
