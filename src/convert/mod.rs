//! Helpfile → site page conversion
//!
//! Each helpfile is converted on its own:
//! - Split into code and text segments; code passes through untouched
//! - Headings in text are demoted one level
//! - Bracket references become site-relative links
//! - A frontmatter block is prepended

pub mod frontmatter;
mod headings;
mod links;
mod resolve;
mod segment;
mod slug;

pub use headings::demote;
pub use links::{is_topic_reference, LinkRewriter};
pub use resolve::{
    classify, FallbackRule, FallbackTarget, Resolution, ResolutionSource, TopicResolver,
    FALLBACK_RULES,
};
pub use segment::{segment, Segment};
pub use slug::topic_slug;

use crate::error::HelpdocsError;
use crate::index::LookupMapping;
use crate::project::{list_markdown, HelpdocsConfig};
use anyhow::{Context, Result};
use serde::Serialize;
use similar::TextDiff;
use std::io::ErrorKind;
use std::path::Path;

/// Summary of a conversion run
#[derive(Debug, Default, Serialize)]
pub struct ConvertReport {
    /// Files that were converted (or checked)
    pub converted: Vec<String>,
    /// In check mode, files whose output would change
    pub changed: Vec<String>,
    /// Whether the source directory held no markdown files
    pub empty_corpus: bool,
    /// In check mode, unified diffs for the changed files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diffs: Vec<PageDiff>,
}

/// Difference between a page on disk and its freshly rendered version
#[derive(Debug, Clone, Serialize)]
pub struct PageDiff {
    pub file: String,
    pub diff: String,
}

/// Converts helpfiles into site pages
#[derive(Debug, Clone)]
pub struct Converter {
    rewriter: LinkRewriter,
    config: HelpdocsConfig,
}

impl Converter {
    /// Create a converter from configuration and an optional lookup mapping
    ///
    /// Without a mapping every topic goes through the fallback rules.
    pub fn new(config: &HelpdocsConfig, mapping: Option<&LookupMapping>) -> Self {
        let resolver = match mapping {
            Some(mapping) => TopicResolver::new(mapping, config.fallback.clone()),
            None => TopicResolver::fallback_only(config.fallback.clone()),
        };

        Self {
            rewriter: LinkRewriter::new(resolver, config.help_root.clone()),
            config: config.clone(),
        }
    }

    /// Load the lookup artifact, falling back to heuristics if it is unusable
    pub fn load_mapping(path: &Path) -> Option<LookupMapping> {
        match LookupMapping::load(path) {
            Ok(mapping) => {
                tracing::info!("Loaded {} header mappings from {:?}", mapping.len(), path);
                Some(mapping)
            }
            Err(e) => {
                tracing::warn!("Could not load lookup artifact, using fallback rules: {:#}", e);
                tracing::warn!("Run `helpdocs index` to generate it.");
                None
            }
        }
    }

    /// The link rewriter used for text segments
    pub fn rewriter(&self) -> &LinkRewriter {
        &self.rewriter
    }

    /// Convert one helpfile's text into a site page
    pub fn convert_text(&self, file_name: &str, content: &str) -> String {
        let segments = segment(content);
        let mut body = String::with_capacity(content.len() + content.len() / 4);

        for (i, seg) in segments.iter().enumerate() {
            match seg {
                Segment::Code(code) => body.push_str(code),
                Segment::Text(text) => {
                    let code_follows = matches!(segments.get(i + 1), Some(Segment::Code(_)));
                    let demoted = demote(text, i == 0, code_follows);
                    body.push_str(&self.rewriter.rewrite(&demoted));
                }
            }
        }

        frontmatter::inject(
            &body,
            &self.config.title_for(file_name),
            &self.config.site_name,
        )
    }

    /// Convert every helpfile in `source_dir` into `output_dir`
    ///
    /// Stops at the first file that cannot be read or written.
    pub fn convert_dir(&self, source_dir: &Path, output_dir: &Path) -> Result<ConvertReport> {
        self.run(source_dir, output_dir, false)
    }

    /// Render every helpfile and report which outputs differ from disk
    pub fn check_dir(&self, source_dir: &Path, output_dir: &Path) -> Result<ConvertReport> {
        self.run(source_dir, output_dir, true)
    }

    fn run(&self, source_dir: &Path, output_dir: &Path, check: bool) -> Result<ConvertReport> {
        tracing::info!("Source: {:?}", source_dir);
        tracing::info!("Target: {:?}", output_dir);

        let files = list_markdown(source_dir)?;
        let mut report = ConvertReport::default();

        if files.is_empty() {
            tracing::warn!("No markdown files found in {:?}", source_dir);
            report.empty_corpus = true;
            return Ok(report);
        }

        tracing::info!("Found {} markdown files to convert", files.len());

        if !check {
            std::fs::create_dir_all(output_dir)
                .with_context(|| format!("Failed to create {:?}", output_dir))?;
        }

        for file in &files {
            let target = output_dir.join(&file.file_name);
            tracing::debug!("Converting {:?} -> {:?}", file.path, target);

            let page = std::fs::read_to_string(&file.path)
                .map_err(|e| HelpdocsError::io(&file.path, e))
                .map(|content| self.convert_text(&file.file_name, &content))
                .inspect_err(|e| tracing::error!("Error converting {}: {}", file.file_name, e))?;

            if check {
                let current = match std::fs::read_to_string(&target) {
                    Ok(current) => current,
                    Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
                    Err(e) => return Err(HelpdocsError::io(&target, e).into()),
                };
                if current != page {
                    report.diffs.push(PageDiff {
                        file: file.file_name.clone(),
                        diff: unified_diff(&file.file_name, &current, &page),
                    });
                    report.changed.push(file.file_name.clone());
                }
            } else {
                std::fs::write(&target, &page)
                    .map_err(|e| HelpdocsError::io(&target, e))
                    .inspect_err(|e| tracing::error!("Error converting {}: {}", file.file_name, e))?;
            }

            report.converted.push(file.file_name.clone());
        }

        Ok(report)
    }
}

/// Unified diff between the page on disk and the freshly rendered one
fn unified_diff(file_name: &str, old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(2)
        .header(&format!("a/{}", file_name), &format!("b/{}", file_name))
        .to_string()
}
