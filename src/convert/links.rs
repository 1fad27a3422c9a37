//! Bracket cross-reference rewriting
//!
//! Helpfiles reference each other as `[help TOPIC|DISPLAY]`, `[help TOPIC]`
//! or a bare `[TOPIC]`. Both forms become site-relative markdown links. The
//! explicit form is rewritten first; the bare pass then only sees text the
//! first pass left alone, so generated links are never rewritten twice.

use super::resolve::TopicResolver;
use super::slug::topic_slug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static HELP_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[help\s+([^\]|]+?)(?:\|([^\]]+?))?\]").expect("valid regex")
});

static BARE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+?)\]").expect("valid regex"));

static FUNCTION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\(\)$").expect("valid regex"));

/// Output of the explicit pass: untouched text or an emitted link
enum Piece<'a> {
    Raw(&'a str),
    Link(String),
}

/// Rewrites bracket references in text segments into markdown links
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    resolver: TopicResolver,
    help_root: String,
}

impl LinkRewriter {
    /// Create a rewriter emitting links under `/reference/<help_root>/`
    pub fn new(resolver: TopicResolver, help_root: impl Into<String>) -> Self {
        Self {
            resolver,
            help_root: help_root.into(),
        }
    }

    /// The resolver used for topic lookups
    pub fn resolver(&self) -> &TopicResolver {
        &self.resolver
    }

    /// Rewrite every reference in a text segment
    pub fn rewrite(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());

        for piece in self.rewrite_help_links(text) {
            match piece {
                Piece::Link(link) => out.push_str(&link),
                Piece::Raw(raw) => {
                    let rewritten = BARE_LINK_RE.replace_all(raw, |caps: &Captures| {
                        let whole = caps.get(0).map_or("", |m| m.as_str());
                        let end = caps.get(0).map_or(0, |m| m.end());
                        let topic = &caps[1];

                        if raw[end..].starts_with('(') || !is_topic_reference(topic) {
                            whole.to_string()
                        } else {
                            self.link(topic, topic)
                        }
                    });
                    out.push_str(&rewritten);
                }
            }
        }

        out
    }

    fn rewrite_help_links<'a>(&self, text: &'a str) -> Vec<Piece<'a>> {
        let mut pieces = Vec::new();
        let mut cursor = 0;

        for caps in HELP_LINK_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let topic = &caps[1];
            let display = caps.get(2).map_or(topic, |m| m.as_str());

            if whole.start() > cursor {
                pieces.push(Piece::Raw(&text[cursor..whole.start()]));
            }
            pieces.push(Piece::Link(self.link(topic, display)));
            cursor = whole.end();
        }

        if cursor < text.len() {
            pieces.push(Piece::Raw(&text[cursor..]));
        }

        pieces
    }

    /// Site-relative URL for a topic
    pub fn target(&self, topic: &str) -> String {
        let resolution = self.resolver.resolve(topic);
        let slug = topic_slug(topic);

        let mut url = format!("/reference/{}/{}/", self.help_root, resolution.document);
        if !slug.is_empty() {
            url.push('#');
            url.push_str(&slug);
        }

        tracing::trace!("{:?} -> {} ({:?})", topic, url, resolution.source);
        url
    }

    fn link(&self, topic: &str, display: &str) -> String {
        format!("[{}]({})", display, self.target(topic))
    }
}

/// Whether a bare bracketed span looks like a help topic reference
pub fn is_topic_reference(topic: &str) -> bool {
    if topic.contains("](") || topic.contains("http") {
        return false;
    }

    let len = topic.chars().count();
    if len < 2 || topic.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    if topic.contains('(') && topic.contains(')') && !FUNCTION_NAME_RE.is_match(topic) {
        return false;
    }

    if topic.contains(&['/', '#', '$', '&'][..]) {
        return false;
    }

    if len < 3 && !topic.starts_with(&['@', '&'][..]) {
        return false;
    }

    true
}
