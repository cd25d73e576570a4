//! Run command - execute the full pipeline over a corpus directory.

use std::path::PathBuf;

use is_terminal::IsTerminal;

use crate::cli::output::{log_info, log_warning};
use crate::cli::parser::{RecognizerBackend, ReportFormat};
use crate::{Pipeline, PipelineConfig, Thresholds};

/// Run the full pipeline over a corpus directory
#[derive(clap::Parser, Debug)]
pub struct RunArgs {
    /// Corpus directory containing text files
    #[arg(value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory (default: a `viewer` directory next to the corpus)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Recognition backend
    #[arg(short, long, default_value = "heuristic")]
    pub model: RecognizerBackend,

    /// Minimum total occurrences before an entity gets a card
    #[arg(long, default_value = "1")]
    pub min_count: usize,

    /// Minimum distinct source documents before an entity gets a card
    #[arg(long, default_value = "1")]
    pub min_sources: usize,

    /// Seed list file (default: `list.txt` next to the corpus, if present)
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// File extensions to process (comma-separated)
    #[arg(long, default_value = "txt,md")]
    pub extensions: String,

    /// Skip writing entities.json at the output root
    #[arg(long)]
    pub no_dump: bool,

    /// Report format
    #[arg(short, long, default_value = "human")]
    pub format: ReportFormat,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the run command.
pub fn run(args: RunArgs) -> Result<(), String> {
    let quiet = args.quiet || !std::io::stderr().is_terminal();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| sibling_of(&args.input, "viewer"));
    let seed_list = args.list.clone().or_else(|| {
        let default = sibling_of(&args.input, "list.txt");
        default.is_file().then_some(default)
    });

    let mut config = PipelineConfig::new(&args.input, &output)
        .with_model(args.model.model_name())
        .with_thresholds(Thresholds {
            min_count: args.min_count,
            min_sources: args.min_sources,
        });
    config.extensions = args
        .extensions
        .split(',')
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect();
    config.dump_entities = !args.no_dump;
    if let Some(list) = seed_list {
        config = config.with_seed_list(list);
    }

    log_info(&format!("Processing corpus: {}", args.input.display()), quiet);
    let report = Pipeline::new(config)
        .map_err(|e| e.to_string())?
        .run()
        .map_err(|e| e.to_string())?;

    for warning in &report.warnings {
        log_warning(warning);
    }

    match args.format {
        ReportFormat::Human => {
            println!("Documents processed : {}", report.documents);
            println!("Mentions found      : {}", report.mentions);
            println!("Canonical entities  : {}", report.entities);
            println!("Qualifying entities : {}", report.qualifying);
            println!("Cards written       : {}", report.cards_written);
            println!("Documents written   : {}", report.documents_written);
            println!("Output              : {}", output.display());
        }
        ReportFormat::Json => {
            let rendered = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{rendered}");
        }
        ReportFormat::Summary => {
            println!(
                "{} docs, {} entities, {} cards -> {}",
                report.documents,
                report.qualifying,
                report.cards_written,
                output.display()
            );
        }
    }
    Ok(())
}

/// A path next to the corpus directory: `<input parent>/<name>`.
fn sibling_of(input: &std::path::Path, name: &str) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from(name), |p| p.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_of() {
        assert_eq!(
            sibling_of(std::path::Path::new("corpus/data"), "viewer"),
            PathBuf::from("corpus/viewer")
        );
        assert_eq!(
            sibling_of(std::path::Path::new("data"), "list.txt"),
            PathBuf::from("list.txt")
        );
    }
}
