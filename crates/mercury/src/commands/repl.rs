//! Repl command - translate and execute one line at a time.

use anyhow::Context;
use mercury_translate::Translator;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::MercuryConfig;
use crate::exec::{self, EvalContext, ExecError};

/// Whether `line` ends the session.
pub fn is_exit(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Translate one REPL line. Each line is its own run with its own artifact
/// registry, so modules edited during the session are picked up.
pub fn translate_line(translator: &Translator, line: &str, cwd: &Path) -> anyhow::Result<String> {
    Ok(translator.fresh().translate(line, cwd)?)
}

/// Drive a session: prompt, read a line, hand it to `eval`, repeat.
///
/// Errors from `eval` are printed and the loop continues, unless the
/// evaluation context itself has gone away. Ends on `exit`, `quit` or EOF.
pub fn session<R, W, F>(input: R, mut out: W, prompt: &str, mut eval: F) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> anyhow::Result<()>,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;
        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };
        if is_exit(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = eval(&line) {
            writeln!(out, "Error: {e:#}")?;
            if matches!(e.downcast_ref::<ExecError>(), Some(ExecError::SessionClosed)) {
                break;
            }
        }
    }
    Ok(())
}

/// Run the repl command.
pub fn run(translator: &Translator, config: &MercuryConfig) -> i32 {
    match start(translator, config) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}

fn start(translator: &Translator, config: &MercuryConfig) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let interpreter = exec::find_interpreter(config.interpreter())?;
    let mut ctx = EvalContext::start(&interpreter, &cwd)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    session(stdin.lock(), stdout.lock(), config.prompt(), |line| {
        let code = translate_line(translator, line, &cwd)?;
        ctx.execute(&code)?;
        Ok(())
    })?;
    Ok(())
}
