//! carta - corpus cross-linking CLI.
//!
//! Turns a directory of text documents into a wiki-style corpus: index
//! cards for recurring named entities, linked copies of every source
//! document, ready for a graph-note viewer.
//!
//! ```bash
//! carta init corpus --sample
//! carta run corpus/data --min-count 3 --min-sources 2
//! carta info
//! ```

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use carta::cli::commands;
use carta::cli::output::format_error;
use carta::cli::parser::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Init(args) => commands::init::run(args),
        Commands::Info => info(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "carta", &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", format_error("carta", &message));
            ExitCode::FAILURE
        }
    }
}

fn info() -> Result<(), String> {
    println!("carta {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Recognition backends:");
    for (name, available) in carta::available_backends() {
        let status = if available { "available" } else { "unavailable" };
        println!("  {name:<12} {status}");
    }
    println!();
    println!("Features:");
    #[cfg(feature = "parallel")]
    println!("  parallel     on (per-document recognition uses worker threads)");
    #[cfg(not(feature = "parallel"))]
    println!("  parallel     off (sequential recognition)");
    Ok(())
}
