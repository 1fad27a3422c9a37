//! Header indexing
//!
//! Scans the helpfile corpus for headings and builds the lookup artifact
//! that maps every topic key to the document that defines it. The artifact
//! is JSON on disk and is consumed read-only by the converter.

mod headings;
mod indexer;

pub use headings::{extract_headings, normalize_topic, Heading};
pub use indexer::{IndexOutcome, IndexReport, Indexer};

use crate::error::HelpdocsError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The persisted topic → document lookup table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupMapping {
    /// Generation metadata
    #[serde(rename = "_metadata", default)]
    pub metadata: MappingMetadata,
    /// Topic key → document key
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
    /// Document key → headings found in it, in file order
    #[serde(default)]
    pub index: BTreeMap<String, Vec<IndexedHeading>>,
}

/// Metadata recorded alongside the mappings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingMetadata {
    /// RFC 3339 generation timestamp
    pub generated_at: String,
    /// Markdown files seen in the source directory
    pub source_files: Vec<String>,
    /// Number of distinct topic keys
    pub total_mappings: usize,
    /// Topic keys claimed by more than one document
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<Collision>,
}

/// One heading as recorded in the per-document index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedHeading {
    /// Heading text as written
    pub original: String,
    /// Normalized topic key
    pub normalized: String,
}

/// A topic key that moved from one document to another during indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub key: String,
    /// Document that owned the key before
    pub previous: String,
    /// Document that owns the key now
    pub current: String,
}

impl LookupMapping {
    /// Document key for a topic key, if indexed
    pub fn document_for(&self, key: &str) -> Option<&str> {
        self.mappings.get(key).map(String::as_str)
    }

    /// Number of topic keys
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the mapping has no topic keys
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Read an artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HelpdocsError::io(path, e))?;
        let mapping = serde_json::from_str(&content).map_err(|e| HelpdocsError::Artifact {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(mapping)
    }

    /// Write the artifact, replacing any previous version
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize lookup artifact")?;
        std::fs::write(path, json).map_err(|e| HelpdocsError::io(path, e))?;

        Ok(())
    }
}
