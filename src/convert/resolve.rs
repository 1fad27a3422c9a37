//! Topic → document resolution
//!
//! Topics are looked up in the indexed mapping first. Anything the index
//! does not know is classified by an ordered table of surface-pattern rules;
//! the first matching rule wins and the last rule always matches.

use crate::index::{normalize_topic, LookupMapping};
use crate::project::FallbackDocs;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which configured document a fallback rule points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackTarget {
    Functions,
    Commands,
    Attributes,
    Flags,
    Locks,
    Mail,
    Chat,
    Events,
    Http,
    Pueblo,
    Config,
}

impl FallbackTarget {
    fn document<'a>(&self, docs: &'a FallbackDocs) -> &'a str {
        match self {
            FallbackTarget::Functions => &docs.functions,
            FallbackTarget::Commands => &docs.commands,
            FallbackTarget::Attributes => &docs.attributes,
            FallbackTarget::Flags => &docs.flags,
            FallbackTarget::Locks => &docs.locks,
            FallbackTarget::Mail => &docs.mail,
            FallbackTarget::Chat => &docs.chat,
            FallbackTarget::Events => &docs.events,
            FallbackTarget::Http => &docs.http,
            FallbackTarget::Pueblo => &docs.pueblo,
            FallbackTarget::Config => &docs.config,
        }
    }
}

/// One entry of the fallback classifier
#[derive(Clone, Copy)]
pub struct FallbackRule {
    /// Short rule name for diagnostics
    pub name: &'static str,
    /// Predicate over the upper-cased topic key
    pub matches: fn(&str) -> bool,
    /// Document chosen when the predicate holds
    pub target: FallbackTarget,
}

/// Fallback rules in priority order
pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        name: "function",
        matches: |key| key.contains("()"),
        target: FallbackTarget::Functions,
    },
    FallbackRule {
        name: "command",
        matches: |key| key.starts_with('@'),
        target: FallbackTarget::Commands,
    },
    FallbackRule {
        name: "attribute",
        matches: |key| key.contains("ATTR"),
        target: FallbackTarget::Attributes,
    },
    FallbackRule {
        name: "flag",
        matches: |key| key.contains("FLAG"),
        target: FallbackTarget::Flags,
    },
    FallbackRule {
        name: "lock",
        matches: |key| key.contains("LOCK"),
        target: FallbackTarget::Locks,
    },
    FallbackRule {
        name: "mail",
        matches: |key| key.contains("MAIL"),
        target: FallbackTarget::Mail,
    },
    FallbackRule {
        name: "chat",
        matches: |key| key.contains("CHAT") || key.contains("CHANNEL"),
        target: FallbackTarget::Chat,
    },
    FallbackRule {
        name: "event",
        matches: |key| key.contains("EVENT"),
        target: FallbackTarget::Events,
    },
    FallbackRule {
        name: "http",
        matches: |key| key.contains("HTTP"),
        target: FallbackTarget::Http,
    },
    FallbackRule {
        name: "pueblo",
        matches: |key| key.contains("PUEBLO"),
        target: FallbackTarget::Pueblo,
    },
    FallbackRule {
        name: "regex",
        matches: |key| key.contains("REGEX"),
        target: FallbackTarget::Config,
    },
    FallbackRule {
        name: "verb",
        matches: |key| key.contains("VERB"),
        target: FallbackTarget::Commands,
    },
    FallbackRule {
        name: "default",
        matches: |_| true,
        target: FallbackTarget::Config,
    },
];

/// Where a resolved document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rule", rename_all = "lowercase")]
pub enum ResolutionSource {
    /// Found in the indexed mapping
    Mapping,
    /// Guessed by the named fallback rule
    Fallback(&'static str),
}

/// The document a topic resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub document: String,
    pub source: ResolutionSource,
}

/// Resolves topics against an immutable mapping plus the fallback table
#[derive(Debug, Clone, Default)]
pub struct TopicResolver {
    mappings: BTreeMap<String, String>,
    fallback: FallbackDocs,
}

impl TopicResolver {
    /// Create a resolver over an indexed mapping
    pub fn new(mapping: &LookupMapping, fallback: FallbackDocs) -> Self {
        Self {
            mappings: mapping.mappings.clone(),
            fallback,
        }
    }

    /// Create a resolver that only uses the fallback rules
    pub fn fallback_only(fallback: FallbackDocs) -> Self {
        Self {
            mappings: BTreeMap::new(),
            fallback,
        }
    }

    /// Number of indexed topics available
    pub fn indexed_topics(&self) -> usize {
        self.mappings.len()
    }

    /// Resolve a topic to its owning document
    pub fn resolve(&self, topic: &str) -> Resolution {
        let key = normalize_topic(topic);

        if let Some(doc) = self.mappings.get(&key) {
            return Resolution {
                document: doc.clone(),
                source: ResolutionSource::Mapping,
            };
        }

        let rule = classify(&key);
        Resolution {
            document: rule.target.document(&self.fallback).to_string(),
            source: ResolutionSource::Fallback(rule.name),
        }
    }
}

/// First fallback rule matching an upper-cased topic key
pub fn classify(key: &str) -> &'static FallbackRule {
    FALLBACK_RULES
        .iter()
        .find(|rule| (rule.matches)(key))
        .unwrap_or(&FALLBACK_RULES[FALLBACK_RULES.len() - 1])
}
