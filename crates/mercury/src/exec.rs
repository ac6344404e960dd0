//! Executing translated programs with a Python interpreter.
//!
//! Two modes:
//! - [`run_program`] runs a whole translated file as a one-shot script.
//! - [`EvalContext`] keeps one interpreter alive so that names defined by one
//!   REPL line are visible to the next. The context is created by the REPL
//!   and dropped when it exits; there is no global interpreter state.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdin, Command, ExitStatus, Stdio};

/// Error that can occur while executing Python code.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("python interpreter `{0}` not found")]
    NotFound(String),

    #[error("failed to start {}: {source}", .interpreter.display())]
    Spawn {
        interpreter: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The executed code raised an exception.
    #[error("{0}")]
    Raised(String),

    #[error("python session closed")]
    SessionClosed,

    #[error("malformed reply from python session: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Locate an interpreter by name or path.
pub fn find_interpreter(name: &str) -> Result<PathBuf, ExecError> {
    which::which(name).map_err(|_| ExecError::NotFound(name.to_string()))
}

/// Run `code` as a script with `cwd` as working directory, so that derived
/// module artifacts next to the source are importable.
pub fn run_program(interpreter: &Path, code: &str, cwd: &Path) -> Result<ExitStatus, ExecError> {
    tracing::debug!(interpreter = %interpreter.display(), cwd = %cwd.display(), "running program");
    Command::new(interpreter)
        .arg("-c")
        .arg(code)
        .current_dir(cwd)
        .status()
        .map_err(|source| ExecError::Spawn {
            interpreter: interpreter.to_path_buf(),
            source,
        })
}

/// Marks control replies on the session's stderr.
const CONTROL_PREFIX: &str = "\u{0}mercury:";

/// Session loop run inside the interpreter.
///
/// Reads `<byte length>\n<code>` frames from stdin, executes each in one
/// persistent namespace and answers on stderr with `CONTROL_PREFIX` followed
/// by JSON and a newline: `null` on success, the exception text otherwise. User code reads
/// input from the terminal, never from the frame channel.
const SESSION_SCRIPT: &str = r#"
import json, os, sys
_chan = sys.stdin.buffer
_ctl = sys.stderr
try:
    sys.stdin = open('/dev/tty')
except OSError:
    sys.stdin = open(os.devnull)
_scope = {'__name__': '__main__'}
while True:
    _header = _chan.readline()
    if not _header:
        break
    _code = _chan.read(int(_header)).decode('utf-8')
    try:
        exec(compile(_code, '<mercury>', 'exec'), _scope)
        _reply = None
    except SystemExit:
        raise
    except BaseException as _e:
        _reply = '%s: %s' % (type(_e).__name__, _e)
    sys.stdout.flush()
    _ctl.write('\x00mercury:' + json.dumps(_reply) + '\n')
    _ctl.flush()
"#;

/// A live evaluation context backed by one interpreter process.
pub struct EvalContext {
    child: Child,
    stdin: Option<ChildStdin>,
    control: BufReader<ChildStderr>,
}

impl EvalContext {
    /// Start an interpreter session with `cwd` as working directory.
    pub fn start(interpreter: &Path, cwd: &Path) -> Result<Self, ExecError> {
        let mut child = Command::new(interpreter)
            .arg("-u")
            .arg("-c")
            .arg(SESSION_SCRIPT)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                interpreter: interpreter.to_path_buf(),
                source,
            })?;
        let stdin = child.stdin.take().ok_or(ExecError::SessionClosed)?;
        let stderr = child.stderr.take().ok_or(ExecError::SessionClosed)?;
        tracing::debug!(pid = child.id(), "started python session");
        Ok(Self {
            child,
            stdin: Some(stdin),
            control: BufReader::new(stderr),
        })
    }

    /// Execute `code` in the session namespace and wait for it to finish.
    ///
    /// Anything the code writes to stderr is forwarded to ours.
    pub fn execute(&mut self, code: &str) -> Result<(), ExecError> {
        let stdin = self.stdin.as_mut().ok_or(ExecError::SessionClosed)?;
        writeln!(stdin, "{}", code.len())?;
        stdin.write_all(code.as_bytes())?;
        stdin.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.control.read_line(&mut line)? == 0 {
                self.stdin = None;
                return Err(ExecError::SessionClosed);
            }
            // User code may leave stderr without a trailing newline, so the
            // reply can follow its output on the same line.
            if let Some(at) = line.find(CONTROL_PREFIX) {
                eprint!("{}", &line[..at]);
                let reply = &line[at + CONTROL_PREFIX.len()..];
                let raised: Option<String> = serde_json::from_str(reply.trim_end())?;
                return match raised {
                    None => Ok(()),
                    Some(message) => Err(ExecError::Raised(message)),
                };
            }
            eprint!("{line}");
        }
    }
}

impl Drop for EvalContext {
    fn drop(&mut self) {
        // Closing stdin ends the session loop.
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
