//! Heading extraction and topic key normalization

/// A markdown heading found in a helpfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading `#` markers (1 = top level)
    pub level: usize,
    /// Heading text with surrounding whitespace removed
    pub text: String,
}

/// Characters that make up decorative separator lines
const DECORATION: &[char] = &['\\', '`', '-', '=', '+', '*'];

/// Extract every heading from markdown text, line by line
///
/// A heading is one or more `#` at the start of a line, at least one
/// whitespace character, then text. Headings of a single character and
/// headings made only of decoration characters are skipped.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    content.lines().filter_map(parse_heading).collect()
}

fn parse_heading(line: &str) -> Option<Heading> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if level == 0 || !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.chars().count() <= 1 || text.chars().all(|c| DECORATION.contains(&c)) {
        return None;
    }

    Some(Heading {
        level,
        text: text.to_string(),
    })
}

/// Normalize heading or link text into a topic key
///
/// Upper-cases, trims and collapses whitespace runs. `@` prefixes and
/// `()` suffixes survive unchanged.
pub fn normalize_topic(text: &str) -> String {
    text.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
