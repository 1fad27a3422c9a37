//! Anchor slugs for help topics

/// Convert a topic into the anchor slug the site generator emits for it
///
/// Lower-cases, drops everything except ASCII letters, digits, whitespace
/// and hyphens (so `@` and parentheses vanish), turns whitespace runs into
/// hyphens, collapses repeated hyphens and trims them from both ends.
pub fn topic_slug(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut pending_hyphen = false;

    for c in topic.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}
