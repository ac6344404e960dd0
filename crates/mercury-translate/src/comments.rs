//! Comment stripping.
//!
//! Applies [`classify`] to a line until nothing is left to scan, updating the
//! comment mode as block comments open and close. Comment text is kept so the
//! engine can emit it as documentation; the code that remains is returned as
//! a single residual statement.

use crate::classify::{CommentMode, LineClass, ScanOptions, classify};
use crate::line::EmittedLine;
use crate::target::Target;

/// A line with its comments separated from its code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stripped<'a> {
    /// Comment texts, in source order.
    pub comments: Vec<&'a str>,
    /// Residual code, trimmed. Code pieces split by an inline block comment are
    /// joined with a single space.
    pub code: String,
}

impl Stripped<'_> {
    /// Documentation lines for the comments, all at `depth`.
    pub fn doc_lines(&self, target: &dyn Target, depth: usize) -> Vec<EmittedLine> {
        self.comments
            .iter()
            .map(|text| EmittedLine::new(target.comment(text), depth))
            .collect()
    }

    /// True when the line carries no statement.
    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
    }
}

/// Strip comments from `line`, updating `mode` for the next line.
pub fn strip<'a>(line: &'a str, mode: &mut CommentMode, opts: ScanOptions) -> Stripped<'a> {
    let mut comments = Vec::new();
    let mut code = Vec::new();
    let mut rest = line;

    loop {
        match classify(rest, *mode, opts) {
            LineClass::Blank => break,
            LineClass::BlockCommentContinue(text) => {
                comments.push(text);
                break;
            }
            LineClass::BlockCommentClose { comment, remainder } => {
                comments.push(comment);
                *mode = CommentMode::Normal;
                rest = remainder;
            }
            LineClass::BlockCommentOpen { prefix } => {
                code.push(prefix);
                *mode = CommentMode::InBlockComment;
                break;
            }
            LineClass::InlineBlockComment {
                before,
                comment,
                after,
            } => {
                code.push(before);
                comments.push(comment);
                rest = after;
            }
            LineClass::LineComment {
                code: before,
                comment,
            } => {
                code.push(before);
                comments.push(comment);
                break;
            }
            LineClass::Code(text) => {
                code.push(text);
                break;
            }
        }
    }

    let code = code
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Stripped { comments, code }
}
