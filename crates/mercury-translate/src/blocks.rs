//! Block structure and indentation.
//!
//! Mercury delimits blocks with a trailing `(` on the opening statement and a
//! lone `)` on the closing line. The structurer keeps a stack of open blocks;
//! its height is the depth every statement is emitted at.
//!
//! | statement                     | emitted at | depth after       |
//! |-------------------------------|------------|-------------------|
//! | `func f(a)(`                  | depth      | depth + 1         |
//! | `if c(`, `while c(`, `for x(` | depth      | depth + 1         |
//! | `else(`, `else if c(`         | see below  | emitted + 1       |
//! | `)`                           | nothing    | max(depth - 1, 0) |
//! | anything else                 | depth      | depth             |
//!
//! An else marker lines up with the conditional it belongs to. Written as
//! `) else(`, the conditional was just closed and the marker goes at the
//! current depth. Written without the `)`, the conditional's body is still
//! the innermost block; it is closed first and the marker takes its place.
//! An else with no conditional to attach to stays at the current depth.

use crate::line::{EmittedLine, SourceLine};
use crate::statement::{BLOCK_CLOSER, BLOCK_OPENER};
use crate::target::Target;

/// Source keyword that opens a function definition.
pub const FUNCTION_KEYWORD: &str = "func";

/// Separates the loop variable from the range bounds in `for i in a..b(`.
const RANGE_SEPARATOR: &str = "..";

/// What a normalized statement does to the block structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    /// `func <signature>(`
    Function(&'a str),
    /// `if <cond>(` or `while <cond>(`
    Conditional { keyword: &'a str, condition: &'a str },
    /// `for <clause>(`
    For(&'a str),
    /// `else if <cond>(`
    ElseIf(&'a str),
    /// `else(`
    Else,
    /// `)`
    Close,
    /// Everything else.
    Plain(&'a str),
}

impl<'a> Statement<'a> {
    pub fn parse(body: &'a str) -> Self {
        if body == BLOCK_CLOSER {
            return Statement::Close;
        }
        let Some(head) = body.strip_suffix(BLOCK_OPENER) else {
            return Statement::Plain(body);
        };
        let head = head.trim_end();

        if let Some(signature) = keyword(head, FUNCTION_KEYWORD) {
            return Statement::Function(signature);
        }
        if let Some(rest) = keyword(head, "else") {
            if rest.is_empty() {
                return Statement::Else;
            }
            if let Some(condition) = keyword(rest, "if") {
                return Statement::ElseIf(condition);
            }
            return Statement::Plain(body);
        }
        for kw in ["if", "while"] {
            if let Some(condition) = keyword(head, kw) {
                return Statement::Conditional {
                    keyword: kw,
                    condition,
                };
            }
        }
        if let Some(clause) = keyword(head, "for") {
            return Statement::For(clause);
        }
        Statement::Plain(body)
    }
}

/// `text` with the leading keyword `kw` removed, if `kw` is followed by
/// whitespace, a parenthesis, or nothing.
fn keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(kw)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with('(') {
        Some(rest.trim())
    } else {
        None
    }
}

/// What opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Function,
    /// `if` or `else if`; may be followed by `else` or `else if`.
    If,
    /// `while` or `for`; may be followed by `else`.
    Loop,
    Else,
}

impl BlockKind {
    fn accepts(self, statement: &Statement<'_>) -> bool {
        match statement {
            Statement::ElseIf(_) => self == BlockKind::If,
            Statement::Else => matches!(self, BlockKind::If | BlockKind::Loop),
            _ => false,
        }
    }
}

/// A block that has been opened and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    pub kind: BlockKind,
    pub line: String,
    pub line_number: usize,
}

/// Tracks nesting depth and turns statements into indented lines.
pub struct BlockStructurer<'t> {
    target: &'t dyn Target,
    open: Vec<OpenBlock>,
    /// Kind of the block closed by the previous statement, if it was a `)`.
    just_closed: Option<BlockKind>,
}

impl<'t> BlockStructurer<'t> {
    pub fn new(target: &'t dyn Target) -> Self {
        Self {
            target,
            open: Vec::new(),
            just_closed: None,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// The innermost block still open, if any.
    pub fn innermost(&self) -> Option<&OpenBlock> {
        self.open.last()
    }

    /// Apply one normalized statement. Returns the line to emit, if any.
    pub fn apply(&mut self, body: &str, source: SourceLine<'_>) -> Option<EmittedLine> {
        let target = self.target;
        let statement = Statement::parse(body);
        let just_closed = self.just_closed.take();
        match statement {
            Statement::Close => {
                self.just_closed = self.open.pop().map(|block| block.kind);
                None
            }
            Statement::Plain(text) => Some(EmittedLine::new(text, self.depth())),
            Statement::Function(signature) => {
                Some(self.open_block(BlockKind::Function, target.function(signature), source))
            }
            Statement::Conditional { keyword, condition } => {
                let kind = if keyword == "if" { BlockKind::If } else { BlockKind::Loop };
                Some(self.open_block(kind, target.conditional(keyword, condition), source))
            }
            Statement::For(clause) => {
                Some(self.open_block(BlockKind::Loop, for_header(target, clause), source))
            }
            Statement::Else => {
                self.close_for_else(&statement, just_closed);
                Some(self.open_block(BlockKind::Else, target.else_marker(), source))
            }
            Statement::ElseIf(condition) => {
                self.close_for_else(&statement, just_closed);
                Some(self.open_block(BlockKind::If, target.else_if(condition), source))
            }
        }
    }

    /// Close the body an else marker continues, unless `)` already did.
    fn close_for_else(&mut self, statement: &Statement<'_>, just_closed: Option<BlockKind>) {
        if just_closed.is_some_and(|kind| kind.accepts(statement)) {
            return;
        }
        if self.open.last().is_some_and(|block| block.kind.accepts(statement)) {
            self.open.pop();
        }
    }

    fn open_block(&mut self, kind: BlockKind, header: String, source: SourceLine<'_>) -> EmittedLine {
        let line = EmittedLine::new(header, self.depth());
        self.open.push(OpenBlock {
            kind,
            line: source.text.to_string(),
            line_number: source.number,
        });
        line
    }
}

/// `for i in a..b` becomes a half-open range loop; any other clause is an
/// iteration over an arbitrary iterable.
fn for_header(target: &dyn Target, clause: &str) -> String {
    if let Some((var, range)) = clause.split_once(" in ")
        && let Some((start, end)) = range.split_once(RANGE_SEPARATOR)
    {
        let (var, start, end) = (var.trim(), start.trim(), end.trim());
        if !var.is_empty() && !start.is_empty() && !end.is_empty() {
            return target.range_loop(var, start, end);
        }
    }
    target.for_each(clause)
}
