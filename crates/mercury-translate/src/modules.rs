//! Module resolution for `use <name>` statements.
//!
//! A module name resolves to exactly one of:
//! 1. `<name>.py` in the base directory: imported directly.
//! 2. `<name>.merc` (or legacy `<name>.mer`): translated recursively, written
//!    next to it as `__mer_<name>.py` and imported under its original name.
//! 3. Anything else: assumed to be a Python library and imported by name.
//!
//! Recursive translations share the base directory and nothing else. The chain
//! of module files being translated is carried in [`ModuleContext`] so that a
//! module importing itself, directly or not, fails instead of recursing forever.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::TranslateError;
use crate::target::{SOURCE_EXTENSIONS, Target};

/// Keyword that starts an import statement.
pub const USE_KEYWORD: &str = "use";

/// Base directory plus the chain of module files currently being translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    base_dir: PathBuf,
    chain: Vec<PathBuf>,
}

impl ModuleContext {
    /// Context for translating text that does not come from a module file.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            chain: Vec::new(),
        }
    }

    /// Context for translating the file at `path`; the file itself counts as
    /// in progress.
    pub fn for_file(path: &Path) -> Self {
        let base_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            base_dir,
            chain: vec![canonical(path)],
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Module files in progress, outermost first.
    pub fn chain(&self) -> &[PathBuf] {
        &self.chain
    }

    /// Child context for translating `module_file`, or a cycle error if that
    /// file is already in progress.
    pub fn enter(&self, module_file: &Path) -> Result<Self, TranslateError> {
        let key = canonical(module_file);
        if self.chain.contains(&key) {
            let mut chain: Vec<String> = self.chain.iter().map(|p| module_label(p)).collect();
            chain.push(module_label(&key));
            return Err(TranslateError::CyclicImport {
                module: module_label(&key),
                chain,
            });
        }
        let mut chain = self.chain.clone();
        chain.push(key);
        Ok(Self {
            base_dir: self.base_dir.clone(),
            chain,
        })
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn module_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Where a module name was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing target-language file.
    Direct { path: PathBuf },
    /// A Mercury file, translated into `artifact`.
    Translated { source: PathBuf, artifact: PathBuf },
    /// Not found locally; left to the target's own import mechanism.
    Library,
}

impl Resolution {
    /// The import statement that replaces `use <name>`.
    pub fn import_statement(&self, name: &str, target: &dyn Target) -> String {
        match self {
            Resolution::Direct { .. } | Resolution::Library => target.import(name),
            Resolution::Translated { .. } => target.import_as(&target.artifact_name(name), name),
        }
    }
}

/// Module name of a `use` statement body, if it is one.
///
/// Returns `Some("")` for a bare `use`.
pub fn parse_use(body: &str) -> Option<&str> {
    let rest = body.strip_prefix(USE_KEYWORD)?;
    if rest.is_empty() {
        return Some("");
    }
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Resolve `name` against the context's base directory.
///
/// `translate` is called with the module's source text and a child context
/// when the module is a Mercury file whose artifact has not been written
/// through `artifacts` yet.
pub fn resolve<F>(
    name: &str,
    ctx: &ModuleContext,
    target: &dyn Target,
    artifacts: &ArtifactRegistry,
    translate: F,
) -> Result<Resolution, TranslateError>
where
    F: FnOnce(&str, &ModuleContext) -> Result<String, TranslateError>,
{
    let base = ctx.base_dir();

    let direct = base.join(format!("{name}.{}", target.extension()));
    if direct.is_file() {
        tracing::debug!(module = name, path = %direct.display(), "direct import");
        return Ok(Resolution::Direct { path: direct });
    }

    let Some(source) = SOURCE_EXTENSIONS
        .iter()
        .map(|ext| base.join(format!("{name}.{ext}")))
        .find(|p| p.is_file())
    else {
        tracing::debug!(module = name, "library import");
        return Ok(Resolution::Library);
    };

    let child = ctx.enter(&source)?;
    let artifact = base.join(format!("{}.{}", target.artifact_name(name), target.extension()));

    if artifacts.contains(&artifact) {
        tracing::debug!(module = name, artifact = %artifact.display(), "artifact already written");
    } else {
        tracing::debug!(module = name, source = %source.display(), "translating module");
        let text = std::fs::read_to_string(&source).map_err(|e| TranslateError::io(&source, e))?;
        let translated = translate(&text, &child)?;
        artifacts.persist(&artifact, &translated)?;
    }

    Ok(Resolution::Translated { source, artifact })
}

/// Serialises artifact writes and remembers which artifacts were written.
///
/// Share one registry between translators that may import the same module
/// into the same directory concurrently; each artifact is written at most once
/// per registry while it stays on disk. A registry lives for one top-level
/// run: it never notices a module source edited after its artifact was
/// written, so long-lived callers such as the REPL take a fresh one per run.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    written: Mutex<HashSet<PathBuf>>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` was written through this registry and still exists.
    pub fn contains(&self, path: &Path) -> bool {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
            && path.is_file()
    }

    /// Write `text` to `path` unless it was already written and is still on
    /// disk. Returns whether this call wrote the file.
    pub fn persist(&self, path: &Path, text: &str) -> Result<bool, TranslateError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if written.contains(path) && path.is_file() {
            return Ok(false);
        }
        std::fs::write(path, text).map_err(|e| TranslateError::io(path, e))?;
        tracing::info!(artifact = %path.display(), "wrote translated module");
        written.insert(path.to_path_buf());
        Ok(true)
    }

    /// Artifacts written so far, sorted.
    pub fn written(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::PYTHON;
    use tempfile::TempDir;

    fn no_translate(_: &str, _: &ModuleContext) -> Result<String, TranslateError> {
        panic!("translation not expected");
    }

    #[test]
    fn test_parse_use() {
        assert_eq!(parse_use("use math"), Some("math"));
        assert_eq!(parse_use("use   os.path "), Some("os.path"));
        assert_eq!(parse_use("use"), Some(""));
        assert_eq!(parse_use("user = 1"), None);
        assert_eq!(parse_use("x = 1"), None);
    }

    #[test]
    fn test_library_when_nothing_found() {
        let dir = TempDir::new().unwrap();
        let ctx = ModuleContext::new(dir.path());
        let artifacts = ArtifactRegistry::new();
        let res = resolve("math", &ctx, &PYTHON, &artifacts, no_translate).unwrap();
        assert_eq!(res, Resolution::Library);
        assert_eq!(res.import_statement("math", &PYTHON), "import math");
    }

    #[test]
    fn test_python_file_wins_over_mercury_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("util.py"), "X = 1\n").unwrap();
        std::fs::write(dir.path().join("util.merc"), "var X = 2;").unwrap();
        let ctx = ModuleContext::new(dir.path());
        let artifacts = ArtifactRegistry::new();
        let res = resolve("util", &ctx, &PYTHON, &artifacts, no_translate).unwrap();
        assert!(matches!(res, Resolution::Direct { .. }));
        assert_eq!(res.import_statement("util", &PYTHON), "import util");
    }

    #[test]
    fn test_mercury_file_is_translated_and_persisted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("util.merc"), "var X = 2;").unwrap();
        let ctx = ModuleContext::new(dir.path());
        let artifacts = ArtifactRegistry::new();

        let res = resolve("util", &ctx, &PYTHON, &artifacts, |text, child| {
            assert_eq!(text, "var X = 2;");
            assert_eq!(child.chain().len(), 1);
            Ok("X = 2".to_string())
        })
        .unwrap();

        let artifact = dir.path().join("__mer_util.py");
        assert_eq!(
            res,
            Resolution::Translated {
                source: dir.path().join("util.merc"),
                artifact: artifact.clone(),
            }
        );
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "X = 2");
        assert_eq!(
            res.import_statement("util", &PYTHON),
            "import __mer_util as util"
        );
        assert_eq!(artifacts.written(), vec![artifact]);
    }

    #[test]
    fn test_legacy_extension_is_found() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("old.mer"), "var y = 1;").unwrap();
        let ctx = ModuleContext::new(dir.path());
        let artifacts = ArtifactRegistry::new();
        let res = resolve("old", &ctx, &PYTHON, &artifacts, |_, _| Ok("y = 1".into())).unwrap();
        assert!(matches!(res, Resolution::Translated { .. }));
    }

    #[test]
    fn test_registry_skips_second_translation() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("util.merc"), "var X = 2;").unwrap();
        let ctx = ModuleContext::new(dir.path());
        let artifacts = ArtifactRegistry::new();
        resolve("util", &ctx, &PYTHON, &artifacts, |_, _| Ok("X = 2".into())).unwrap();
        let res = resolve("util", &ctx, &PYTHON, &artifacts, no_translate).unwrap();
        assert!(matches!(res, Resolution::Translated { .. }));
    }

    #[test]
    fn test_persist_writes_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("__mer_a.py");
        let artifacts = ArtifactRegistry::new();
        assert!(artifacts.persist(&path, "first").unwrap());
        assert!(!artifacts.persist(&path, "second").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_deleted_artifact_is_translated_again() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("m.merc"), "var v = 1;").unwrap();
        let ctx = ModuleContext::new(dir.path());
        let artifacts = ArtifactRegistry::new();
        resolve("m", &ctx, &PYTHON, &artifacts, |_, _| Ok("v = 1".into())).unwrap();

        let artifact = dir.path().join("__mer_m.py");
        std::fs::remove_file(&artifact).unwrap();
        assert!(!artifacts.contains(&artifact));

        resolve("m", &ctx, &PYTHON, &artifacts, |_, _| Ok("v = 2".into())).unwrap();
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "v = 2");
    }

    #[test]
    fn test_enter_detects_cycle() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.merc");
        let b = dir.path().join("b.merc");
        std::fs::write(&a, "").unwrap();
        std::fs::write(&b, "").unwrap();

        let ctx = ModuleContext::for_file(&a);
        let inner = ctx.enter(&b).unwrap();
        let err = inner.enter(&a).unwrap_err();
        match err {
            TranslateError::CyclicImport { module, chain } => {
                assert_eq!(module, "a");
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_for_file_uses_parent_directory() {
        let ctx = ModuleContext::for_file(Path::new("scripts/main.merc"));
        assert_eq!(ctx.base_dir(), Path::new("scripts"));
        let ctx = ModuleContext::for_file(Path::new("main.merc"));
        assert_eq!(ctx.base_dir(), Path::new("."));
    }
}
