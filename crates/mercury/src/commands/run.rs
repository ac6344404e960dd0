//! Run command - translate a Mercury file and execute it.

use clap::Args;
use mercury_translate::{ModuleContext, Translator};
use std::path::PathBuf;

use crate::config::MercuryConfig;
use crate::exec;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Mercury source file
    pub file: PathBuf,
}

/// Run the run command. The exit code mirrors the interpreter's.
pub fn run(args: RunArgs, translator: &Translator, config: &MercuryConfig) -> i32 {
    if !args.file.is_file() {
        eprintln!("File '{}' not found.", args.file.display());
        return 1;
    }

    let code = match translator.translate_file(&args.file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let interpreter = match exec::find_interpreter(config.interpreter()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let ctx = ModuleContext::for_file(&args.file);
    match exec::run_program(&interpreter, &code, ctx.base_dir()) {
        Ok(status) => status.code().unwrap_or(1),
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}
