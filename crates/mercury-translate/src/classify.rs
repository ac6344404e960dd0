//! Line classification.
//!
//! A pure function of `(line, mode)`: it looks for comment tokens and reports
//! how the line splits into code and comment text. It never changes state;
//! [`crate::comments`] applies the result.

/// Line-comment tokens, in tie-break order.
pub const LINE_COMMENT_TOKENS: [&str; 3] = ["//", "++", "--"];

/// Opens a block comment.
pub const BLOCK_OPEN: &str = "+*";

/// Closes a block comment.
pub const BLOCK_CLOSE: &str = "*+";

/// Lexical mode carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMode {
    #[default]
    Normal,
    InBlockComment,
}

/// What a line (or the unprocessed rest of one) is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Nothing but whitespace, outside a block comment.
    Blank,
    /// Entirely inside a block comment.
    BlockCommentContinue(&'a str),
    /// Ends the current block comment; `remainder` is processed as a fresh line.
    BlockCommentClose { comment: &'a str, remainder: &'a str },
    /// Starts a block comment that runs past this line; text after the marker
    /// is dropped.
    BlockCommentOpen { prefix: &'a str },
    /// A block comment opened and closed on the same line.
    InlineBlockComment {
        before: &'a str,
        comment: &'a str,
        after: &'a str,
    },
    /// Code followed by a line comment.
    LineComment { code: &'a str, comment: &'a str },
    /// Plain code.
    Code(&'a str),
}

/// Settings that change how lines are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Ignore comment tokens inside `'...'` and `"..."` literals.
    pub quote_aware: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { quote_aware: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    BlockOpen,
    Line(usize),
}

impl Token {
    fn text(self) -> &'static str {
        match self {
            Token::BlockOpen => BLOCK_OPEN,
            Token::Line(i) => LINE_COMMENT_TOKENS[i],
        }
    }
}

/// Classify `line` given the mode left behind by the previous line.
pub fn classify(line: &str, mode: CommentMode, opts: ScanOptions) -> LineClass<'_> {
    match mode {
        CommentMode::InBlockComment => match line.find(BLOCK_CLOSE) {
            Some(pos) => LineClass::BlockCommentClose {
                comment: line[..pos].trim(),
                remainder: &line[pos + BLOCK_CLOSE.len()..],
            },
            None => LineClass::BlockCommentContinue(line.trim_end()),
        },
        CommentMode::Normal => {
            if line.trim().is_empty() {
                return LineClass::Blank;
            }
            let Some((pos, token)) = find_comment_token(line, opts) else {
                return LineClass::Code(line);
            };
            let before = &line[..pos];
            let rest = &line[pos + token.text().len()..];
            match token {
                Token::BlockOpen => match rest.find(BLOCK_CLOSE) {
                    Some(close) => LineClass::InlineBlockComment {
                        before,
                        comment: rest[..close].trim(),
                        after: &rest[close + BLOCK_CLOSE.len()..],
                    },
                    None => LineClass::BlockCommentOpen { prefix: before },
                },
                Token::Line(_) => LineClass::LineComment {
                    code: before,
                    comment: rest.trim(),
                },
            }
        }
    }
}

/// Leftmost comment token outside of string literals.
fn find_comment_token(line: &str, opts: ScanOptions) -> Option<(usize, Token)> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (pos, c) in line.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if opts.quote_aware && (c == '"' || c == '\'') {
            quote = Some(c);
            continue;
        }
        let rest = &line[pos..];
        if rest.starts_with(BLOCK_OPEN) {
            return Some((pos, Token::BlockOpen));
        }
        if let Some(i) = LINE_COMMENT_TOKENS.iter().position(|t| rest.starts_with(t)) {
            return Some((pos, Token::Line(i)));
        }
    }
    None
}
