//! CLI argument parsing and structure definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Corpus cross-linking CLI - index cards and hyperlinks for named entities
#[derive(Parser)]
#[command(name = "carta")]
#[command(
    author,
    version,
    about = "Corpus cross-linking CLI - index cards and hyperlinks for named entities",
    long_about = r#"
carta - augmented reading for text corpora

Takes a directory of plain-text/markdown documents and produces a
wiki-style copy of it: every named entity that recurs across enough
documents gets an index card listing its backlinks, and every source
document is rewritten with [[LABEL/entity|surface]] links at the
places the entity is mentioned. Point a graph-note viewer at the
output directory to explore the corpus.

PIPELINE:
  recognize + seed -> aggregate -> threshold -> cards + linked copies

SEED LIST:
  A plain text file, one term per line. Seeded terms always get a
  card, no matter how rarely they occur.

EXAMPLES:
  carta init corpus --sample
  carta run corpus/data -o corpus/viewer --min-count 3 --min-sources 2
  carta run corpus/data --list corpus/list.txt
  carta info
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline over a corpus directory
    #[command(visible_alias = "r")]
    Run(super::commands::RunArgs),

    /// Scaffold a corpus workspace (data dir, seed list, readme)
    Init(super::commands::InitArgs),

    /// Show recognition backends and version info
    #[command(visible_alias = "i")]
    Info,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Recognition backend selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RecognizerBackend {
    /// Capitalization + context heuristics (no model files required)
    #[default]
    Heuristic,
}

impl RecognizerBackend {
    /// The `model_name` configuration value this choice maps to.
    #[must_use]
    pub fn model_name(self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
        }
    }
}

/// Output format for run reports.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable lines (default)
    #[default]
    Human,
    /// JSON object
    Json,
    /// Single summary line
    Summary,
}
