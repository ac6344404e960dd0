//! Subcommands of the `mercury` binary.
//!
//! Each command takes its parsed arguments and returns a process exit code.

pub mod compile;
pub mod repl;
pub mod run;
pub mod translate;

use mercury_translate::Translator;

use crate::config::MercuryConfig;

/// Translator configured from `config`.
pub fn translator(config: &MercuryConfig) -> Translator {
    Translator::new(config.translate_options())
}
