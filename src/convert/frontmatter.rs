//! Page frontmatter generation

/// Clean a title for use inside a double-quoted YAML scalar
///
/// Newlines become spaces and whitespace runs collapse. `\` and `"` are
/// escaped, backslashes first.
pub fn escape_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// Render the frontmatter block for a page
pub fn render(title: &str, site_name: &str) -> String {
    let title = escape_title(title);
    format!(
        "---\ntitle: \"{title}\"\ndescription: \"{site_name} documentation for {title}\"\n---\n\n"
    )
}

/// Prepend a frontmatter block to a page body
pub fn inject(body: &str, title: &str, site_name: &str) -> String {
    let mut page = render(title, site_name);
    page.push_str(body);
    page
}
