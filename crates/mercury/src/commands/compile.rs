//! Compile command - translate Mercury files into sibling Python files.

use anyhow::{Context, bail};
use clap::Args;
use mercury_translate::Translator;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Compile command arguments
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Mercury source files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Translate `path` and write the result next to it with the target extension.
pub fn compile_file(translator: &Translator, path: &Path) -> anyhow::Result<PathBuf> {
    let (output, code) = translate_file(translator, path)?;
    write_output(&output, &code)?;
    Ok(output)
}

/// Translate `path` without writing its output. Returns the output path and
/// the translated text.
pub fn translate_file(translator: &Translator, path: &Path) -> anyhow::Result<(PathBuf, String)> {
    if !path.is_file() {
        bail!("file '{}' not found", path.display());
    }
    let output = path.with_extension(translator.target().extension());
    if output == path {
        bail!("refusing to overwrite source file '{}'", path.display());
    }
    let code = translator.translate_file(path)?;
    Ok((output, code))
}

fn write_output(output: &Path, code: &str) -> anyhow::Result<()> {
    std::fs::write(output, code).with_context(|| format!("failed to write {}", output.display()))
}

/// Run the compile command.
///
/// All files are translated in parallel before any output is written, so a
/// `use` of another file in the same batch resolves against the directory as
/// it was before the command started. The translator's artifact registry
/// keeps shared imports from being written twice.
pub fn run(args: CompileArgs, translator: &Translator) -> i32 {
    let translated: Vec<(&PathBuf, anyhow::Result<(PathBuf, String)>)> = args
        .files
        .par_iter()
        .map(|file| (file, translate_file(translator, file)))
        .collect();

    let mut failed = 0;
    for (file, result) in translated {
        let result = result.and_then(|(output, code)| write_output(&output, &code).map(|()| output));
        match result {
            Ok(output) => println!("Compiled {} -> {}", file.display(), output.display()),
            Err(e) => {
                eprintln!("error: {}: {:#}", file.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 { 1 } else { 0 }
}
