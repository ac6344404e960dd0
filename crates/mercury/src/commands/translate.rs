//! Translate command - convert Mercury source to Python without running it.

use clap::Args;
use mercury_translate::Translator;
use std::path::{Path, PathBuf};

/// Translate command arguments
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Input source file, use - for stdin
    pub input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a JSON result instead of bare code
    #[arg(long)]
    pub json: bool,
}

/// Structured translate result.
#[derive(Debug, serde::Serialize)]
pub struct TranslateResult {
    pub code: String,
    pub target_language: String,
    pub input_path: String,
    pub output_path: Option<String>,
    /// Module artifacts written while resolving `use` statements.
    pub artifacts: Vec<String>,
}

/// Translate `input` (a file, or `-` for stdin) into a [`TranslateResult`].
pub fn translate_input(
    translator: &Translator,
    input: &Path,
    output: Option<&Path>,
) -> Result<TranslateResult, String> {
    let is_stdin = input.as_os_str() == "-";

    let code = if is_stdin {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        translator
            .translate(&buf, Path::new("."))
            .map_err(|e| format!("Failed to translate stdin: {}", e))?
    } else {
        if !input.is_file() {
            return Err(format!("File '{}' not found.", input.display()));
        }
        translator
            .translate_file(input)
            .map_err(|e| format!("Failed to translate {}: {}", input.display(), e))?
    };

    if let Some(path) = output {
        std::fs::write(path, &code)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }

    Ok(TranslateResult {
        code,
        target_language: translator.target().language().to_string(),
        input_path: input.display().to_string(),
        output_path: output.map(|p| p.display().to_string()),
        artifacts: translator
            .artifacts()
            .written()
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    })
}

/// Run the translate command
pub fn run(args: TranslateArgs, translator: &Translator) -> i32 {
    let result = match translate_input(translator, &args.input, args.output.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        }
    } else if let Some(path) = &result.output_path {
        eprintln!(
            "Translated {} -> {} ({})",
            result.input_path, path, result.target_language
        );
    } else {
        println!("{}", result.code);
    }

    0
}
