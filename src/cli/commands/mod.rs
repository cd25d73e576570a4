//! Command implementations for the carta CLI.
//!
//! Each command has its own module: an `Args` struct (clap derive) and a
//! `run` function returning `Result<(), String>` with user-facing messages.

pub mod init;
pub mod run;

pub use init::InitArgs;
pub use run::RunArgs;
