//! Splits markdown into code and text segments
//!
//! Code segments are fenced blocks (```` ``` ```` … ```` ``` ````, shortest match,
//! may span lines) and inline spans (`` ` `` … `` ` `` on one line). Everything
//! between them is text. Only text segments are ever rewritten.

use regex::Regex;
use std::sync::LazyLock;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```.*?```|`[^`\n]*`").expect("valid regex")
});

/// A contiguous span of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Inside a fenced block or inline code span, passed through verbatim
    Code(&'a str),
    /// Ordinary markdown, eligible for rewriting
    Text(&'a str),
}

impl<'a> Segment<'a> {
    /// The raw text of the segment
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Code(s) | Segment::Text(s) => s,
        }
    }
}

/// Partition `content` into alternating code and text segments, left to right
///
/// Concatenating the segments reproduces `content` exactly.
pub fn segment(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for m in CODE_RE.find_iter(content) {
        if m.start() > cursor {
            segments.push(Segment::Text(&content[cursor..m.start()]));
        }
        segments.push(Segment::Code(m.as_str()));
        cursor = m.end();
    }

    if cursor < content.len() {
        segments.push(Segment::Text(&content[cursor..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_and_inline_spans() {
        let content = "See [help @set].\n```\n[help @set]\n```\nUse `[x]` here.";
        let segments = segment(content);

        assert_eq!(
            segments,
            vec![
                Segment::Text("See [help @set].\n"),
                Segment::Code("```\n[help @set]\n```"),
                Segment::Text("\nUse "),
                Segment::Code("`[x]`"),
                Segment::Text(" here."),
            ]
        );
    }

    #[test]
    fn test_concatenation_is_lossless() {
        let content = "a `b` c\n```rust\nfn x() {}\n```\n``\n`unterminated\nend";
        let rebuilt: String = segment(content).iter().map(Segment::as_str).collect();
        assert_eq!(rebuilt, content);
    }

    #[test]
    fn test_fence_uses_shortest_match() {
        let content = "```\none\n```\nmiddle\n```\ntwo\n```";
        let segments = segment(content);
        assert_eq!(segments[1], Segment::Text("\nmiddle\n"));
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_inline_span_does_not_cross_lines() {
        let segments = segment("`open\nclose`");
        assert_eq!(segments, vec![Segment::Text("`open\nclose`")]);
    }

    #[test]
    fn test_plain_text_and_empty() {
        assert_eq!(segment("just text"), vec![Segment::Text("just text")]);
        assert!(segment("").is_empty());
    }
}
