//! Target-language surface.
//!
//! The engine never spells Python syntax itself: every piece of emitted text
//! goes through a [`Target`]. [`PYTHON`] is the only built-in target.

/// File extensions of Mercury source files, in resolution order.
pub const SOURCE_EXTENSIONS: &[&str] = &["merc", "mer"];

/// A target emits the fixed pieces of syntax the translation produces.
pub trait Target: Send + Sync {
    /// Language identifier (e.g., "python").
    fn language(&self) -> &'static str;

    /// File extension for output and for direct imports (e.g., "py").
    fn extension(&self) -> &'static str;

    /// Documentation line carrying `text`.
    fn comment(&self, text: &str) -> String;

    /// Call name that replaces Mercury's `write`.
    fn print_call(&self) -> &'static str;

    /// Call name that replaces Mercury's `userinput`.
    fn input_call(&self) -> &'static str;

    /// Function header for `signature` (`name(params)`).
    fn function(&self, signature: &str) -> String;

    /// `if` / `while` header.
    fn conditional(&self, keyword: &str, condition: &str) -> String;

    fn else_marker(&self) -> String;

    fn else_if(&self, condition: &str) -> String;

    /// Loop over the half-open range `start..end`.
    fn range_loop(&self, var: &str, start: &str, end: &str) -> String;

    /// Loop header for an arbitrary iteration clause (`x in items`).
    fn for_each(&self, clause: &str) -> String;

    /// Import of a module or library by name.
    fn import(&self, name: &str) -> String;

    /// Import of a derived artifact under the original module name.
    fn import_as(&self, artifact: &str, alias: &str) -> String;

    /// Module name of the artifact produced for a translated Mercury module.
    fn artifact_name(&self, module: &str) -> String;
}

/// Static instance of the Python target.
pub static PYTHON: PythonTarget = PythonTarget;

/// Python 3 target.
pub struct PythonTarget;

impl Target for PythonTarget {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn comment(&self, text: &str) -> String {
        if text.is_empty() {
            "#".to_string()
        } else {
            format!("# {text}")
        }
    }

    fn print_call(&self) -> &'static str {
        "print"
    }

    fn input_call(&self) -> &'static str {
        "input"
    }

    fn function(&self, signature: &str) -> String {
        format!("def {signature}:")
    }

    fn conditional(&self, keyword: &str, condition: &str) -> String {
        format!("{keyword} {condition}:")
    }

    fn else_marker(&self) -> String {
        "else:".to_string()
    }

    fn else_if(&self, condition: &str) -> String {
        format!("elif {condition}:")
    }

    fn range_loop(&self, var: &str, start: &str, end: &str) -> String {
        format!("for {var} in range({start}, {end}):")
    }

    fn for_each(&self, clause: &str) -> String {
        format!("for {clause}:")
    }

    fn import(&self, name: &str) -> String {
        format!("import {name}")
    }

    fn import_as(&self, artifact: &str, alias: &str) -> String {
        format!("import {artifact} as {alias}")
    }

    fn artifact_name(&self, module: &str) -> String {
        format!("__mer_{module}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_comment() {
        assert_eq!(PYTHON.comment("note"), "# note");
        assert_eq!(PYTHON.comment(""), "#");
    }

    #[test]
    fn test_python_headers() {
        assert_eq!(PYTHON.function("add(a, b)"), "def add(a, b):");
        assert_eq!(PYTHON.conditional("while", "(i < 3)"), "while (i < 3):");
        assert_eq!(PYTHON.range_loop("i", "0", "5"), "for i in range(0, 5):");
        assert_eq!(PYTHON.for_each("x in items"), "for x in items:");
    }

    #[test]
    fn test_python_artifact_import() {
        let artifact = PYTHON.artifact_name("util");
        assert_eq!(artifact, "__mer_util");
        assert_eq!(
            PYTHON.import_as(&artifact, "util"),
            "import __mer_util as util"
        );
    }
}
