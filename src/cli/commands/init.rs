//! Init command - scaffold a corpus workspace.

use std::path::{Path, PathBuf};

use crate::cli::output::log_info;

/// Scaffold a corpus workspace (data dir, seed list, readme)
#[derive(clap::Parser, Debug)]
pub struct InitArgs {
    /// Workspace directory to create
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Also create a small sample document in the data directory
    #[arg(long)]
    pub sample: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

const README: &str = "\
carta workspace

  data/      put your .txt/.md corpus files here (subfolders are fine)
  list.txt   one term per line; listed terms always get an index card
  viewer/    created by `carta run data` - open it in a graph-note viewer

Documents may start with a front-matter block:

  ---
  title: \"A Season in Hell\"
  author: Rimbaud
  ---

Run `carta run data --min-count 3 --min-sources 2` from this directory,
then point your viewer at viewer/.
";

const SAMPLE: &str = "\
---
title: \"Sample\"
author: \"carta\"
---
This is a sample document with named characters like Jacob Williamson
and William Jacobson, who traveled from San Diego to Paris in 1871.
";

/// Execute the init command.
pub fn run(args: InitArgs) -> Result<(), String> {
    create_dir(&args.dir)?;
    create_dir(&args.dir.join("data"))?;

    // Never clobber a seed list the user may already have edited.
    create_if_missing(&args.dir.join("list.txt"), "", args.quiet)?;
    create_if_missing(&args.dir.join("readme.txt"), README, args.quiet)?;

    if args.sample {
        create_if_missing(&args.dir.join("data/sample.txt"), SAMPLE, args.quiet)?;
    }

    log_info(
        &format!(
            "Workspace ready: add files to {}, then `carta run {}`",
            args.dir.join("data").display(),
            args.dir.join("data").display()
        ),
        args.quiet,
    );
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), String> {
    std::fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {e}", path.display()))
}

fn create_if_missing(path: &Path, content: &str, quiet: bool) -> Result<(), String> {
    if path.exists() {
        log_info(&format!("Keeping existing {}", path.display()), quiet);
        return Ok(());
    }
    std::fs::write(path, content).map_err(|e| format!("Failed to create {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_scaffolds_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("corpus");
        run(InitArgs {
            dir: root.clone(),
            sample: true,
            quiet: true,
        })
        .unwrap();

        assert!(root.join("data").is_dir());
        assert!(root.join("list.txt").is_file());
        assert!(root.join("readme.txt").is_file());
        assert!(root.join("data/sample.txt").is_file());
        assert_eq!(std::fs::read_to_string(root.join("list.txt")).unwrap(), "");
    }

    #[test]
    fn test_init_preserves_existing_list() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("corpus");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("list.txt"), "seine\n").unwrap();

        run(InitArgs {
            dir: root.clone(),
            sample: false,
            quiet: true,
        })
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(root.join("list.txt")).unwrap(),
            "seine\n"
        );
    }
}
