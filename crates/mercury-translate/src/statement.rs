//! Statement normalization.
//!
//! Validates statement termination and applies the fixed rewrites that do not
//! depend on block structure: the `var ` declaration prefix and the built-in
//! `write(` / `userinput(` calls. Rewrites are literal substring replacements;
//! arguments pass through untouched.

use crate::error::CompileError;
use crate::line::SourceLine;
use crate::target::Target;

/// Ends every statement that is not a block opener or closer.
pub const TERMINATOR: char = ';';

/// Ends a block-opening statement.
pub const BLOCK_OPENER: char = '(';

/// A line consisting of exactly this closes the innermost block.
pub const BLOCK_CLOSER: &str = ")";

/// Declaration prefix; stripped, since Python has no declaration form.
pub const DECLARATION_PREFIX: &str = "var ";

/// Built-in output call.
pub const OUTPUT_CALL: &str = "write(";

/// Built-in input call.
pub const INPUT_CALL: &str = "userinput(";

/// Normalize the residual code of `line` into a statement body.
///
/// `code` is the comment-free text of the line; `line` is only used to cite
/// the original text when the statement is rejected.
pub fn normalize(code: &str, line: SourceLine<'_>, target: &dyn Target) -> Result<String, CompileError> {
    let code = code.trim();
    let terminated = code.ends_with(TERMINATOR);
    if !terminated && !code.ends_with(BLOCK_OPENER) && code != BLOCK_CLOSER {
        return Err(CompileError::new(
            line.text,
            line.number,
            format!("missing `{TERMINATOR}` at end of statement"),
        ));
    }

    let mut body = if terminated {
        code[..code.len() - TERMINATOR.len_utf8()].trim_end()
    } else {
        code
    };

    if let Some(rest) = body.strip_prefix(DECLARATION_PREFIX) {
        body = rest.trim_start();
    }

    Ok(rewrite_builtins(body, target))
}

fn rewrite_builtins(body: &str, target: &dyn Target) -> String {
    let mut out = body.to_string();
    if out.contains(OUTPUT_CALL) {
        out = out.replace(OUTPUT_CALL, &format!("{}(", target.print_call()));
    }
    if out.contains(INPUT_CALL) {
        out = out.replace(INPUT_CALL, &format!("{}(", target.input_call()));
    }
    out
}
