//! Line-oriented translation of Mercury scripts into Python.
//!
//! Mercury is a small semicolon-terminated scripting language that uses
//! explicit parenthesis pairs instead of indentation to delimit blocks.
//! `mercury-translate` turns Mercury source into Python source one line at a
//! time - it maps syntax, not semantics.
//!
//! # Pipeline
//!
//! ```text
//!  source line ──> classify ──> comments ──> statement ──> modules ──> blocks ──> EmittedLine
//!                  (mode)       (docs)      (`;`, var,    (`use`)     (depth)
//!                                            write(...))
//! ```
//!
//! Each stage is a separate module:
//! - [`classify`] decides what a raw line is (blank, comment, code).
//! - [`comments`] turns comment text into `#` documentation lines.
//! - [`statement`] validates termination and applies built-in rewrites.
//! - [`modules`] resolves `use <name>` against the base directory, translating
//!   Mercury modules recursively.
//! - [`blocks`] tracks nesting depth and rewrites block openers.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! let python = mercury_translate::translate(
//!     "var x = 1;\nif (x > 0)(\n    write(x);\n)",
//!     Path::new("."),
//! )?;
//! assert_eq!(python, "x = 1\nif (x > 0):\n    print(x)");
//! # Ok::<(), mercury_translate::TranslateError>(())
//! ```
//!
//! Translation aborts on the first defect: the result is either the complete
//! Python text or exactly one [`TranslateError`].

pub mod blocks;
pub mod classify;
pub mod comments;
pub mod engine;
pub mod error;
pub mod line;
pub mod modules;
pub mod statement;
pub mod target;

pub use engine::{TranslateOptions, Translator, translate};
pub use error::{CompileError, TranslateError};
pub use line::{EmittedLine, SourceLine};
pub use modules::{ArtifactRegistry, ModuleContext, Resolution};
pub use target::{PYTHON, PythonTarget, SOURCE_EXTENSIONS, Target};
