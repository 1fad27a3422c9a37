//! Heading demotion
//!
//! Helpfiles use `#` and `##`; the site page title already occupies the top
//! level, so `##` becomes `###` and then `#` becomes `##`. Checking `## `
//! before `# ` on each line is what keeps a level-1 heading from being
//! shifted twice. Deeper headings pass through unchanged.

/// Demote the level-1 and level-2 headings of a text segment
///
/// `starts_line` says whether the segment begins at the start of a line.
/// `continues` says whether a code span follows the segment on its last
/// line, which makes a heading like ``# `code` `` non-empty.
pub fn demote(segment: &str, starts_line: bool, continues: bool) -> String {
    let mut out = String::with_capacity(segment.len() + 8);
    let mut at_line_start = starts_line;

    for line in segment.split_inclusive('\n') {
        let (body, ending) = split_ending(line);
        let continues_on_line = ending.is_empty() && continues;

        if at_line_start {
            if let Some(text) = heading_text(body, "## ", continues_on_line) {
                out.push_str("### ");
                out.push_str(text);
            } else if let Some(text) = heading_text(body, "# ", continues_on_line) {
                out.push_str("## ");
                out.push_str(text);
            } else {
                out.push_str(body);
            }
        } else {
            out.push_str(body);
        }

        out.push_str(ending);
        at_line_start = true;
    }

    out
}

/// Text after `marker` when the line is a heading with non-empty text
fn heading_text<'a>(body: &'a str, marker: &str, continues_on_line: bool) -> Option<&'a str> {
    let text = body.strip_prefix(marker)?;
    (!text.is_empty() || continues_on_line).then_some(text)
}

/// Split a line into its content and its `\n` / `\r\n` terminator
fn split_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
