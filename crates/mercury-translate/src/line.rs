//! Input and output line types.

/// One raw line of Mercury source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Raw text, without the line terminator.
    pub text: &'a str,
    /// 1-indexed position in the source text.
    pub number: usize,
}

impl<'a> SourceLine<'a> {
    /// Split a source text into numbered lines.
    pub fn split(source: &'a str) -> impl Iterator<Item = SourceLine<'a>> {
        source.lines().enumerate().map(|(i, text)| SourceLine {
            text,
            number: i + 1,
        })
    }
}

/// A Python line together with the depth it was emitted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLine {
    pub text: String,
    pub depth: usize,
}

impl EmittedLine {
    pub fn new(text: impl Into<String>, depth: usize) -> Self {
        Self {
            text: text.into(),
            depth,
        }
    }

    /// Render with `indent_width` spaces per depth level.
    pub fn render(&self, indent_width: usize) -> String {
        let mut out = " ".repeat(self.depth * indent_width);
        out.push_str(&self.text);
        out
    }
}

/// Join emitted lines into the final target text.
pub fn render_lines(lines: &[EmittedLine], indent_width: usize) -> String {
    lines
        .iter()
        .map(|l| l.render(indent_width))
        .collect::<Vec<_>>()
        .join("\n")
}
