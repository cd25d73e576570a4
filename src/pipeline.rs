//! The one-shot batch pipeline over a corpus snapshot.
//!
//! ```text
//! load ──► recognize + seed (per document, parallel) ──► aggregate (merge)
//!                                                            │
//!                output tree ◄── write ◄── cards + rewrite ◄─┘
//! ```
//!
//! Per-document recognition is embarrassingly parallel; the only shared
//! state is the aggregate, built by merging per-document aggregators under
//! the commutative contract in [`crate::aggregate`]. With the `parallel`
//! feature off the same merge runs sequentially and produces identical
//! results.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    cards, ingest, rewrite, seed, Aggregator, CanonicalEntity, CanonicalKey, Document,
    EntityMention, Error, Recognizer, Result, SeedList, Thresholds,
};

/// Configuration for a pipeline run, supplied by the surrounding application.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Corpus root directory.
    pub input: PathBuf,
    /// Output root directory.
    pub output: PathBuf,
    /// Recognition backend identifier (opaque to the pipeline).
    pub model_name: String,
    /// Inclusion thresholds.
    pub thresholds: Thresholds,
    /// Path of the user-editable seed list, if any.
    pub seed_list: Option<PathBuf>,
    /// File extensions that belong to the corpus.
    pub extensions: Vec<String>,
    /// Whether to write `entities.json` at the output root.
    pub dump_entities: bool,
}

impl PipelineConfig {
    /// Create a config with defaults: heuristic backend, thresholds of 1,
    /// no seed list, `txt`/`md` extensions, entity dump on.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            model_name: "heuristic".to_string(),
            thresholds: Thresholds::default(),
            seed_list: None,
            extensions: ingest::DEFAULT_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            dump_entities: true,
        }
    }

    /// Select the recognition backend.
    #[must_use]
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Set inclusion thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the seed-list path.
    #[must_use]
    pub fn with_seed_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_list = Some(path.into());
        self
    }
}

/// What a run did, for reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// Documents loaded from the corpus.
    pub documents: usize,
    /// Total mentions after seeding and overlap resolution.
    pub mentions: usize,
    /// Canonical entities in the aggregate.
    pub entities: usize,
    /// Entities meeting thresholds or seeded.
    pub qualifying: usize,
    /// Index cards written.
    pub cards_written: usize,
    /// Linked documents written.
    pub documents_written: usize,
    /// Non-fatal problems (unreadable seed list).
    pub warnings: Vec<String>,
}

/// Slim serialized view of the aggregate, written as `entities.json`.
#[derive(Serialize)]
struct EntitySummary<'a> {
    name: &'a str,
    label: String,
    total_count: usize,
    counts: &'a BTreeMap<String, usize>,
    seeded: bool,
}

/// The assembled pipeline: config plus recognition backend.
pub struct Pipeline {
    config: PipelineConfig,
    recognizer: Box<dyn Recognizer>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Assemble a pipeline, resolving the configured backend.
    ///
    /// # Errors
    /// [`Error::UnknownBackend`] for an unrecognized `model_name`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let recognizer = crate::recognizer_for(&config.model_name)?;
        Ok(Self { config, recognizer })
    }

    /// Assemble a pipeline around an explicit backend (tests, embedders).
    #[must_use]
    pub fn with_recognizer(config: PipelineConfig, recognizer: Box<dyn Recognizer>) -> Self {
        Self { config, recognizer }
    }

    /// Run the whole pipeline once.
    ///
    /// # Errors
    /// Recognition failures, card-path collisions, and IO errors are fatal;
    /// an unreadable seed list degrades to a warning in the report.
    pub fn run(&self) -> Result<PipelineReport> {
        let config = &self.config;
        if config.output.starts_with(&config.input) {
            return Err(Error::invalid_input(
                "output root must not be inside the corpus root",
            ));
        }

        let mut warnings = Vec::new();
        let seeds = match &config.seed_list {
            Some(path) => match SeedList::load(path) {
                Ok(list) => list,
                Err(e) => {
                    warnings.push(format!(
                        "seed list '{}' unavailable ({e}); continuing without it",
                        path.display()
                    ));
                    SeedList::empty()
                }
            },
            None => SeedList::empty(),
        };

        let documents = ingest::load_corpus(&config.input, &config.extensions)?;

        // Per-document extraction: recognition plus seeding, merged with
        // seeded precedence. Independent across documents.
        let extract = |doc: &Document| -> Result<Vec<EntityMention>> {
            let detections = self
                .recognizer
                .recognize(&doc.body, doc.language())
                .map_err(|e| Error::recognition(&doc.id, e.to_string()))?;
            let recognized = detections
                .into_iter()
                .map(|d| EntityMention::recognized(d, &doc.id))
                .collect();
            Ok(seed::merge_mentions(recognized, seeds.scan(doc)))
        };

        #[cfg(feature = "parallel")]
        let per_document: Vec<Vec<EntityMention>> =
            documents.par_iter().map(extract).collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let per_document: Vec<Vec<EntityMention>> =
            documents.iter().map(extract).collect::<Result<_>>()?;

        let mention_count: usize = per_document.iter().map(Vec::len).sum();

        // Reduce phase: merge per-document aggregates. Merge is commutative,
        // so the grouping and order of this fold cannot change the result.
        let mut aggregator = per_document
            .iter()
            .map(|mentions| {
                let mut local = Aggregator::new();
                local.observe_all(mentions.iter().cloned());
                local
            })
            .fold(Aggregator::new(), Aggregator::merge);

        // Seed terms get a card even when never found.
        for term in seeds.terms() {
            aggregator.ensure_seed_term(term);
        }

        let entities = aggregator.into_entities();
        let qualifying = config.thresholds.qualifying(&entities);
        let index_cards = cards::build_cards(&qualifying)?;

        let targets: BTreeMap<CanonicalKey, String> = qualifying
            .iter()
            .map(|e| {
                (
                    CanonicalKey {
                        name: e.name.clone(),
                        label: e.label.clone(),
                    },
                    cards::link_target(e),
                )
            })
            .collect();

        let writer = crate::output::OutputWriter::new(&config.output);
        for card in &index_cards {
            writer.write_card(card)?;
        }

        let mut documents_written = 0;
        for (doc, mentions) in documents.iter().zip(&per_document) {
            let linked = rewrite::rewrite_document(doc, mentions, &targets);
            writer.write_linked(&linked)?;
            documents_written += 1;
        }

        if config.dump_entities {
            let summaries: Vec<EntitySummary<'_>> = entities
                .iter()
                .map(|e: &CanonicalEntity| EntitySummary {
                    name: &e.name,
                    label: e.label.to_string(),
                    total_count: e.total_count,
                    counts: &e.counts,
                    seeded: e.is_seeded(),
                })
                .collect();
            writer.write_json("entities.json", &summaries)?;
        }

        Ok(PipelineReport {
            documents: documents.len(),
            mentions: mention_count,
            entities: entities.len(),
            qualifying: qualifying.len(),
            cards_written: index_cards.len(),
            documents_written,
            warnings,
        })
    }
}
