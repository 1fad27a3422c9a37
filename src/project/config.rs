//! Project configuration for helpdocs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the project root
pub const CONFIG_FILE: &str = "helpdocs.toml";

/// Configuration for a documentation site project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpdocsConfig {
    /// Directory holding the upstream helpfiles
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory the converted pages are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Location of the lookup artifact produced by `index`
    #[serde(default = "default_mapping_path")]
    pub mapping_path: PathBuf,

    /// Path segment under `/reference/` the converted pages live in
    #[serde(default = "default_help_root")]
    pub help_root: String,

    /// Site name used in generated page descriptions
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Section titles keyed by source filename
    #[serde(default = "default_titles")]
    pub titles: BTreeMap<String, String>,

    /// Target documents for topics missing from the lookup artifact
    #[serde(default)]
    pub fallback: FallbackDocs,
}

/// Document keys used by the fallback classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackDocs {
    pub functions: String,
    pub commands: String,
    pub attributes: String,
    pub flags: String,
    pub locks: String,
    pub mail: String,
    pub chat: String,
    pub events: String,
    pub http: String,
    pub pueblo: String,
    pub config: String,
}

impl Default for FallbackDocs {
    fn default() -> Self {
        Self {
            functions: "pennfunc".to_string(),
            commands: "penncmd".to_string(),
            attributes: "pennattr".to_string(),
            flags: "pennflag".to_string(),
            locks: "pennlock".to_string(),
            mail: "pennmail".to_string(),
            chat: "pennchat".to_string(),
            events: "pennevents".to_string(),
            http: "pennhttp".to_string(),
            pueblo: "pennpueb".to_string(),
            config: "pennconf".to_string(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    ["SharpMUSH-submodule", "SharpMUSH.Documentation", "Helpfiles", "SharpMUSH"]
        .iter()
        .collect()
}

fn default_output_dir() -> PathBuf {
    ["src", "content", "docs", "reference", "sharpmush-help"]
        .iter()
        .collect()
}

fn default_mapping_path() -> PathBuf {
    ["scripts", "doc-mappings.json"].iter().collect()
}

fn default_help_root() -> String {
    "sharpmush-help".to_string()
}

fn default_site_name() -> String {
    "SharpMUSH".to_string()
}

fn default_titles() -> BTreeMap<String, String> {
    [
        ("pennattr.md", "Attributes"),
        ("pennchat.md", "Chat and Channels"),
        ("penncmd.md", "Commands"),
        ("penncode.md", "Coding and Programming"),
        ("pennconf.md", "Configuration"),
        ("pennevents.md", "Events"),
        ("pennflag.md", "Flags"),
        ("pennfunc.md", "Functions"),
        ("pennhttp.md", "HTTP Features"),
        ("pennlock.md", "Locks"),
        ("pennmail.md", "Mail System"),
        ("pennpueb.md", "Pueblo Client"),
        ("penntop.md", "Top-Level Topics"),
    ]
    .into_iter()
    .map(|(file, title)| (file.to_string(), title.to_string()))
    .collect()
}

impl Default for HelpdocsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            mapping_path: default_mapping_path(),
            help_root: default_help_root(),
            site_name: default_site_name(),
            titles: default_titles(),
            fallback: FallbackDocs::default(),
        }
    }
}

impl HelpdocsConfig {
    /// Load configuration from the project root or return defaults
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: HelpdocsConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the project root
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let config_path = project_root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Title for a source file, falling back to its stem
    pub fn title_for(&self, file_name: &str) -> String {
        self.titles
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| super::document_key(file_name).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HelpdocsConfig::default();
        assert_eq!(config.help_root, "sharpmush-help");
        assert_eq!(config.titles.len(), 13);
        assert_eq!(config.fallback.functions, "pennfunc");
        assert!(config.source_dir.ends_with("SharpMUSH"));
    }

    #[test]
    fn test_title_lookup() {
        let config = HelpdocsConfig::default();
        assert_eq!(config.title_for("pennflag.md"), "Flags");
        assert_eq!(config.title_for("custom.md"), "custom");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: HelpdocsConfig = toml::from_str(
            r#"
help_root = "help"

[fallback]
config = "penntop"
"#,
        )
        .unwrap();

        assert_eq!(config.help_root, "help");
        assert_eq!(config.fallback.config, "penntop");
        assert_eq!(config.fallback.commands, "penncmd");
        assert_eq!(config.site_name, "SharpMUSH");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HelpdocsConfig::default();
        config.site_name = "TestMUSH".to_string();
        config.save(dir.path()).unwrap();

        let loaded = HelpdocsConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.site_name, "TestMUSH");
        assert_eq!(loaded.titles, config.titles);
    }
}
