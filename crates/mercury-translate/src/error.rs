//! Errors produced by a translation.

use std::path::PathBuf;

/// A malformed source line. Fatal to the translation that hit it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line_number}: {reason}\n{line}")]
pub struct CompileError {
    /// The offending line, verbatim.
    pub line: String,
    /// 1-indexed position of the line in its source text.
    pub line_number: usize,
    /// Human-readable reason.
    pub reason: String,
}

impl CompileError {
    pub fn new(line: impl Into<String>, line_number: usize, reason: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            line_number,
            reason: reason.into(),
        }
    }
}

/// Error that can occur while translating a source text.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// A source line was rejected. Passed through unchanged from imported modules.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A module was imported while its own translation was still in progress.
    #[error("cyclic import of module `{module}`: {}", .chain.join(" -> "))]
    CyclicImport { module: String, chain: Vec<String> },

    /// A module file could not be read or its artifact could not be written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranslateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The compile error behind this failure, if any.
    pub fn as_compile(&self) -> Option<&CompileError> {
        match self {
            Self::Compile(e) => Some(e),
            _ => None,
        }
    }
}
