//! Compile, run and interactively evaluate Mercury scripts.
//!
//! The translation itself lives in `mercury-translate`; this crate holds the
//! collaborators around it: configuration, the Python execution layer and
//! the CLI commands.

pub mod commands;
pub mod config;
pub mod exec;

pub use config::MercuryConfig;
