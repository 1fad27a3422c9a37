//! Corpus-wide header indexing

use super::{extract_headings, normalize_topic, Collision, IndexedHeading, LookupMapping};
use crate::error::HelpdocsError;
use crate::project::{list_markdown, SourceFile};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Result of an indexing run
#[derive(Debug)]
pub enum IndexOutcome {
    /// Mapping was built from at least one markdown file
    Indexed(IndexReport),
    /// The source directory exists but holds no markdown files
    EmptyCorpus,
}

/// Summary of an indexing run
#[derive(Debug, Serialize)]
pub struct IndexReport {
    /// The mapping that was built
    #[serde(skip)]
    pub mapping: LookupMapping,
    /// Headings indexed per document
    pub headings_per_document: BTreeMap<String, usize>,
    /// Files that could not be read
    pub skipped: Vec<String>,
}

impl IndexReport {
    /// Number of distinct topic keys
    pub fn total_mappings(&self) -> usize {
        self.mapping.len()
    }

    /// Topic keys claimed by more than one document
    pub fn collisions(&self) -> &[Collision] {
        &self.mapping.metadata.collisions
    }
}

/// Builds a [`LookupMapping`] from a directory of helpfiles
#[derive(Debug, Default)]
pub struct Indexer {
    mappings: BTreeMap<String, String>,
    index: BTreeMap<String, Vec<IndexedHeading>>,
    collisions: Vec<Collision>,
}

impl Indexer {
    /// Create an empty indexer
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every markdown file in `source_dir`
    ///
    /// A missing directory is an error. Unreadable files are logged and
    /// skipped so one bad document does not block the rest of the corpus.
    pub fn run(mut self, source_dir: &Path) -> Result<IndexOutcome> {
        tracing::info!("Indexing headers from {:?}", source_dir);

        let files = list_markdown(source_dir)?;
        if files.is_empty() {
            tracing::warn!("No markdown files found in {:?}", source_dir);
            return Ok(IndexOutcome::EmptyCorpus);
        }

        let mut skipped = Vec::new();

        for file in &files {
            tracing::debug!("Processing {}", file.file_name);
            match self.index_file(file) {
                Ok(count) => tracing::debug!("  Found {} headers", count),
                Err(e) => {
                    tracing::error!("Error processing {}: {}", file.file_name, e);
                    skipped.push(file.file_name.clone());
                }
            }
        }

        let source_files = files.into_iter().map(|f| f.file_name).collect();
        let mapping = self.finish(source_files);

        let headings_per_document = mapping
            .index
            .iter()
            .map(|(doc, headings)| (doc.clone(), headings.len()))
            .collect();

        Ok(IndexOutcome::Indexed(IndexReport {
            mapping,
            headings_per_document,
            skipped,
        }))
    }

    fn index_file(&mut self, file: &SourceFile) -> Result<usize> {
        let content = std::fs::read_to_string(&file.path)
            .map_err(|e| HelpdocsError::io(&file.path, e))?;
        let headings = extract_headings(&content);
        let count = headings.len();

        for heading in headings {
            tracing::trace!("{}: h{} {:?}", file.key(), heading.level, heading.text);
            self.add(file.key(), heading.text);
        }

        Ok(count)
    }

    /// Record one heading; a key already owned by another document moves
    /// to this one and the move is kept as a collision
    pub fn add(&mut self, doc_key: &str, original: String) {
        let normalized = normalize_topic(&original);

        if let Some(previous) = self.mappings.insert(normalized.clone(), doc_key.to_string()) {
            if previous != doc_key {
                tracing::warn!(
                    "Topic {:?} defined in both {} and {}; using {}",
                    normalized,
                    previous,
                    doc_key,
                    doc_key
                );
                self.collisions.push(Collision {
                    key: normalized.clone(),
                    previous,
                    current: doc_key.to_string(),
                });
            }
        }

        self.index
            .entry(doc_key.to_string())
            .or_default()
            .push(IndexedHeading {
                original,
                normalized,
            });
    }

    /// Produce the mapping with fresh metadata
    pub fn finish(self, source_files: Vec<String>) -> LookupMapping {
        let mut mapping = LookupMapping {
            mappings: self.mappings,
            index: self.index,
            ..Default::default()
        };
        mapping.metadata.generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        mapping.metadata.source_files = source_files;
        mapping.metadata.total_mappings = mapping.mappings.len();
        mapping.metadata.collisions = self.collisions;
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pennflag.md"),
            "# Flags\n\n## Flag Overview\n\nText.\n\n## ---\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("penncmd.md"),
            "# Commands\n## @set\n## @mail\n",
        )
        .unwrap();
        fs::write(dir.path().join("readme.txt"), "# Ignored\n").unwrap();
        dir
    }

    fn indexed(dir: &Path) -> IndexReport {
        match Indexer::new().run(dir).unwrap() {
            IndexOutcome::Indexed(report) => report,
            IndexOutcome::EmptyCorpus => panic!("expected an indexed corpus"),
        }
    }

    #[test]
    fn test_index_maps_headings_to_documents() {
        let dir = corpus();
        let report = indexed(dir.path());
        let mapping = &report.mapping;

        assert_eq!(mapping.document_for("FLAG OVERVIEW"), Some("pennflag"));
        assert_eq!(mapping.document_for("@SET"), Some("penncmd"));
        assert_eq!(mapping.document_for("---"), None);
        assert_eq!(mapping.metadata.total_mappings, 5);
        assert_eq!(mapping.metadata.source_files, vec!["penncmd.md", "pennflag.md"]);
        assert_eq!(report.headings_per_document["pennflag"], 2);
        assert_eq!(
            mapping.index["penncmd"][1],
            IndexedHeading {
                original: "@set".to_string(),
                normalized: "@SET".to_string(),
            }
        );
        assert!(report.collisions().is_empty());
    }

    #[test]
    fn test_index_is_idempotent() {
        let dir = corpus();
        let first = indexed(dir.path()).mapping;
        let second = indexed(dir.path()).mapping;

        assert_eq!(
            serde_json::to_string(&first.mappings).unwrap(),
            serde_json::to_string(&second.mappings).unwrap()
        );
        assert_eq!(first.index, second.index);
    }

    #[test]
    fn test_collisions_last_write_wins() {
        let mut indexer = Indexer::new();
        indexer.add("penncmd", "@mail".to_string());
        indexer.add("pennmail", "@MAIL".to_string());
        indexer.add("pennmail", "@mail".to_string());

        let mapping = indexer.finish(vec![]);
        assert_eq!(mapping.document_for("@MAIL"), Some("pennmail"));
        assert_eq!(
            mapping.metadata.collisions,
            vec![Collision {
                key: "@MAIL".to_string(),
                previous: "penncmd".to_string(),
                current: "pennmail".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "# Not markdown").unwrap();

        let outcome = Indexer::new().run(dir.path()).unwrap();
        assert!(matches!(outcome, IndexOutcome::EmptyCorpus));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Indexer::new().run(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HelpdocsError>(),
            Some(HelpdocsError::MissingDirectory { .. })
        ));
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = corpus();
        // not valid UTF-8
        fs::write(dir.path().join("broken.md"), [0xff, 0xfe, 0x00]).unwrap();

        let report = indexed(dir.path());
        assert_eq!(report.skipped, vec!["broken.md"]);
        assert_eq!(report.mapping.document_for("FLAG OVERVIEW"), Some("pennflag"));
        assert!(report
            .mapping
            .metadata
            .source_files
            .contains(&"broken.md".to_string()));
    }
}
