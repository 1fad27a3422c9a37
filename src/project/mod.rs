//! Project layout and helpfile corpus discovery
//!
//! A project is the documentation site checkout: it owns the configuration,
//! the upstream helpfile directory, the lookup artifact and the output pages.

mod config;

pub use config::{FallbackDocs, HelpdocsConfig, CONFIG_FILE};

use crate::error::HelpdocsError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A documentation site project rooted at a directory
pub struct Project {
    /// Path to the project root
    root: PathBuf,
    /// Project configuration
    config: HelpdocsConfig,
}

impl Project {
    /// Open the project at the given path, reading `helpdocs.toml` if present
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config = HelpdocsConfig::load_or_default(&root)?;
        Ok(Self { root, config })
    }

    /// Build a project from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(path: P, config: HelpdocsConfig) -> Self {
        Self {
            root: path.as_ref().to_path_buf(),
            config,
        }
    }

    /// Get the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the project configuration
    pub fn config(&self) -> &HelpdocsConfig {
        &self.config
    }

    /// Directory holding the upstream helpfiles
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.config.source_dir)
    }

    /// Directory converted pages are written to
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    /// Path of the lookup artifact
    pub fn mapping_path(&self) -> PathBuf {
        self.root.join(&self.config.mapping_path)
    }
}

/// A markdown file found in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Bare file name, e.g. `pennflag.md`
    pub file_name: String,
}

impl SourceFile {
    /// Document key derived from the file name, e.g. `pennflag`
    pub fn key(&self) -> &str {
        document_key(&self.file_name)
    }
}

/// Strip the markdown extension from a file name
pub fn document_key(file_name: &str) -> &str {
    file_name.strip_suffix(".md").unwrap_or(file_name)
}

/// List the `*.md` files directly inside `dir`, sorted by name
///
/// Fails with [`HelpdocsError::MissingDirectory`] when `dir` is absent. An
/// existing directory with no markdown files yields an empty list.
pub fn list_markdown(dir: &Path) -> Result<Vec<SourceFile>> {
    if !dir.is_dir() {
        return Err(HelpdocsError::MissingDirectory {
            path: dir.to_path_buf(),
        }
        .into());
    }

    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        if name.ends_with(".md") {
            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                file_name: name.to_string(),
            });
        }
    }

    Ok(files)
}
