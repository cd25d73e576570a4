//! Output formatting utilities for CLI commands.

/// Format an error message for display.
#[must_use]
pub fn format_error(operation: &str, details: &str) -> String {
    format!("ERROR: {operation} - {details}")
}

/// Log a progress message to stderr (respects the quiet flag).
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{msg}");
    }
}

/// Log a warning to stderr. Warnings are never silenced by quiet mode.
pub fn log_warning(msg: &str) {
    eprintln!("warning: {msg}");
}
