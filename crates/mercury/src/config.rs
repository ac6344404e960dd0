//! Configuration system for mercury.
//!
//! Loads config from:
//! 1. Global: ~/.config/mercury/config.toml
//! 2. Per-project: .mercury/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [translate]
//! quote_aware = true
//! strict_blocks = false
//! indent_width = 4
//!
//! [python]
//! interpreter = "python3"
//!
//! [repl]
//! prompt = "Mercury> "
//! ```

use mercury_translate::TranslateOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Interpreter used when none is configured.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// REPL prompt used when none is configured.
pub const DEFAULT_PROMPT: &str = "Mercury> ";

/// Translation settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TranslateConfig {
    /// Ignore comment tokens inside string literals.
    pub quote_aware: Option<bool>,
    /// Reject sources that leave blocks open.
    pub strict_blocks: Option<bool>,
    /// Spaces per indentation level in generated Python.
    pub indent_width: Option<usize>,
}

/// Python interpreter settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PythonConfig {
    /// Interpreter name or path.
    pub interpreter: Option<String>,
}

/// Interactive session settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MercuryConfig {
    pub translate: TranslateConfig,
    pub python: PythonConfig,
    pub repl: ReplConfig,
}

impl MercuryConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/mercury/config.toml,
    /// then merges with per-project config from .mercury/config.toml.
    pub fn load(root: &Path) -> Self {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    /// Load with an explicit global config path.
    pub fn load_from(global: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global.and_then(Self::load_file) {
            config = config.merge(global);
        }

        let project_path = root.join(".mercury").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("mercury").join("config.toml"))
    }

    /// Load config from a file path. Missing files are silently skipped;
    /// malformed ones are skipped with a warning.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {e}");
                None
            }
        }
    }

    /// Merge another config into this one. Fields set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            translate: TranslateConfig {
                quote_aware: other.translate.quote_aware.or(self.translate.quote_aware),
                strict_blocks: other.translate.strict_blocks.or(self.translate.strict_blocks),
                indent_width: other.translate.indent_width.or(self.translate.indent_width),
            },
            python: PythonConfig {
                interpreter: other.python.interpreter.or(self.python.interpreter),
            },
            repl: ReplConfig {
                prompt: other.repl.prompt.or(self.repl.prompt),
            },
        }
    }

    /// Engine options with unset fields at their defaults.
    pub fn translate_options(&self) -> TranslateOptions {
        let defaults = TranslateOptions::default();
        TranslateOptions {
            quote_aware: self.translate.quote_aware.unwrap_or(defaults.quote_aware),
            strict_blocks: self.translate.strict_blocks.unwrap_or(defaults.strict_blocks),
            indent_width: self.translate.indent_width.unwrap_or(defaults.indent_width),
        }
    }

    pub fn interpreter(&self) -> &str {
        self.python.interpreter.as_deref().unwrap_or(DEFAULT_INTERPRETER)
    }

    pub fn prompt(&self) -> &str {
        self.repl.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_project_config(dir: &Path, content: &str) {
        let config_dir = dir.join(".mercury");
        std::fs::create_dir_all(&config_dir).unwrap();
        let mut file = std::fs::File::create(config_dir.join("config.toml")).unwrap();
        writeln!(file, "{content}").unwrap();
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = MercuryConfig::load_from(None, dir.path());
        assert_eq!(config, MercuryConfig::default());
        assert_eq!(config.translate_options(), TranslateOptions::default());
        assert_eq!(config.interpreter(), "python3");
        assert_eq!(config.prompt(), "Mercury> ");
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            dir.path(),
            r#"
[translate]
strict_blocks = true
indent_width = 2

[python]
interpreter = "/usr/bin/python3.12"
"#,
        );

        let config = MercuryConfig::load_from(None, dir.path());
        let options = config.translate_options();
        assert!(options.strict_blocks);
        assert_eq!(options.indent_width, 2);
        assert!(options.quote_aware); // default
        assert_eq!(config.interpreter(), "/usr/bin/python3.12");
    }

    #[test]
    fn test_project_overrides_global_field_by_field() {
        let global_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("config.toml");
        std::fs::write(
            &global,
            "[translate]\nquote_aware = false\nindent_width = 8\n\n[repl]\nprompt = \"> \"\n",
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[translate]\nindent_width = 3");

        let config = MercuryConfig::load_from(Some(&global), dir.path());
        let options = config.translate_options();
        assert!(!options.quote_aware);
        assert_eq!(options.indent_width, 3);
        assert_eq!(config.prompt(), "> ");
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[translate]\nindent_width = \"wide\"");
        let config = MercuryConfig::load_from(None, dir.path());
        assert_eq!(config, MercuryConfig::default());
    }
}
