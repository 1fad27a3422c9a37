//! helpdocs - SharpMUSH helpfile indexer and converter
//!
//! This library indexes the headings of the upstream helpfiles into a
//! topic lookup table and converts each helpfile into a site page with
//! demoted headings, resolved cross-reference links and frontmatter.

pub mod cli;
pub mod convert;
pub mod error;
pub mod index;
pub mod project;

/// Re-export commonly used types
pub use convert::{Converter, TopicResolver};
pub use error::HelpdocsError;
pub use index::{Indexer, LookupMapping};
pub use project::{HelpdocsConfig, Project};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "helpdocs";
