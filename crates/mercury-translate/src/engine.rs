//! The translation engine.
//!
//! Threads every source line through classification, comment stripping,
//! statement normalization, module resolution and block structuring, and
//! collects the emitted lines.

use std::path::Path;
use std::sync::Arc;

use crate::blocks::BlockStructurer;
use crate::classify::{CommentMode, ScanOptions};
use crate::comments;
use crate::error::{CompileError, TranslateError};
use crate::line::{EmittedLine, SourceLine, render_lines};
use crate::modules::{self, ArtifactRegistry, ModuleContext};
use crate::statement;
use crate::target::{PYTHON, Target};

/// Knobs that change translation behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Ignore comment tokens inside string literals.
    pub quote_aware: bool,
    /// Reject input that leaves blocks open at end of input.
    pub strict_blocks: bool,
    /// Spaces per depth level in the output.
    pub indent_width: usize,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            quote_aware: true,
            strict_blocks: false,
            indent_width: 4,
        }
    }
}

/// Mutable state of one engine invocation. Never shared; imported modules get
/// their own.
struct TranslationState<'t> {
    mode: CommentMode,
    blocks: BlockStructurer<'t>,
    output: Vec<EmittedLine>,
}

impl<'t> TranslationState<'t> {
    fn new(target: &'t dyn Target) -> Self {
        Self {
            mode: CommentMode::Normal,
            blocks: BlockStructurer::new(target),
            output: Vec::new(),
        }
    }
}

/// Translates Mercury source into target text.
///
/// A translator holds no per-translation state and can be shared between
/// threads. Translators that share an [`ArtifactRegistry`] write each derived
/// module artifact at most once.
pub struct Translator {
    options: TranslateOptions,
    target: &'static dyn Target,
    artifacts: Arc<ArtifactRegistry>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(TranslateOptions::default())
    }
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self {
            options,
            target: &PYTHON,
            artifacts: Arc::new(ArtifactRegistry::new()),
        }
    }

    /// Use a shared artifact registry.
    pub fn with_artifacts(mut self, artifacts: Arc<ArtifactRegistry>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn with_target(mut self, target: &'static dyn Target) -> Self {
        self.target = target;
        self
    }

    /// Same options and target, with an empty artifact registry of its own.
    pub fn fresh(&self) -> Self {
        Self::new(self.options.clone()).with_target(self.target)
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn target(&self) -> &'static dyn Target {
        self.target
    }

    pub fn artifacts(&self) -> &Arc<ArtifactRegistry> {
        &self.artifacts
    }

    /// Translate `source`, resolving `use` statements against `base_dir`.
    pub fn translate(&self, source: &str, base_dir: &Path) -> Result<String, TranslateError> {
        self.translate_in(source, &ModuleContext::new(base_dir))
    }

    /// Translate the Mercury file at `path`, resolving modules next to it.
    pub fn translate_file(&self, path: &Path) -> Result<String, TranslateError> {
        let source = std::fs::read_to_string(path).map_err(|e| TranslateError::io(path, e))?;
        self.translate_in(&source, &ModuleContext::for_file(path))
    }

    /// Translate `source` within an existing module context.
    pub fn translate_in(&self, source: &str, ctx: &ModuleContext) -> Result<String, TranslateError> {
        let lines = self.emit(source, ctx)?;
        Ok(render_lines(&lines, self.options.indent_width))
    }

    /// Translate `source` into emitted lines without rendering them.
    pub fn emit(&self, source: &str, ctx: &ModuleContext) -> Result<Vec<EmittedLine>, TranslateError> {
        let scan = ScanOptions {
            quote_aware: self.options.quote_aware,
        };
        let mut state = TranslationState::new(self.target);

        for line in SourceLine::split(source) {
            let stripped = comments::strip(line.text, &mut state.mode, scan);
            let depth = state.blocks.depth();
            state.output.extend(stripped.doc_lines(self.target, depth));
            if !stripped.has_code() {
                continue;
            }

            let body = statement::normalize(&stripped.code, line, self.target)?;
            if body.is_empty() {
                continue;
            }

            let body = match modules::parse_use(&body).map(str::to_string) {
                Some(name) => self.resolve_use(&name, line, ctx)?,
                None => body,
            };

            if let Some(emitted) = state.blocks.apply(&body, line) {
                tracing::trace!(line = line.number, depth = emitted.depth, text = %emitted.text, "emit");
                state.output.push(emitted);
            }
        }

        if self.options.strict_blocks
            && let Some(open) = state.blocks.innermost()
        {
            return Err(CompileError::new(
                open.line.clone(),
                open.line_number,
                format!("block is never closed ({} open at end of input)", state.blocks.depth()),
            )
            .into());
        }

        tracing::debug!(
            base = %ctx.base_dir().display(),
            lines = state.output.len(),
            "translated"
        );
        Ok(state.output)
    }

    fn resolve_use(
        &self,
        name: &str,
        line: SourceLine<'_>,
        ctx: &ModuleContext,
    ) -> Result<String, TranslateError> {
        if name.is_empty() {
            return Err(CompileError::new(line.text, line.number, "missing module name after `use`").into());
        }
        let resolution = modules::resolve(name, ctx, self.target, &self.artifacts, |text, child| {
            self.translate_in(text, child)
        })?;
        Ok(resolution.import_statement(name, self.target))
    }
}

/// Translate `source` with default options, resolving `use` statements
/// against `base_dir`.
pub fn translate(source: &str, base_dir: &Path) -> Result<String, TranslateError> {
    Translator::default().translate(source, base_dir)
}
