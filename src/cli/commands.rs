//! Command implementations

use super::OutputFormat;
use crate::convert::{ConvertReport, Converter, Resolution};
use crate::index::{IndexOutcome, IndexReport, Indexer};
use crate::project::{Project, CONFIG_FILE};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Number of example mappings shown after indexing
const EXAMPLE_MAPPINGS: usize = 10;

/// Index the helpfile headings and write the lookup artifact
///
/// Returns `None` when the source directory holds no markdown files; no
/// artifact is written in that case.
pub fn index(project: &Project) -> Result<Option<IndexReport>> {
    let source_dir = project.source_dir();

    let report = match Indexer::new().run(&source_dir)? {
        IndexOutcome::Indexed(report) => report,
        IndexOutcome::EmptyCorpus => return Ok(None),
    };

    let mapping_path = project.mapping_path();
    report
        .mapping
        .save(&mapping_path)
        .with_context(|| format!("Failed to write lookup artifact {:?}", mapping_path))?;

    tracing::info!(
        "Indexed {} headers into {:?}",
        report.total_mappings(),
        mapping_path
    );

    Ok(Some(report))
}

/// Convert the helpfiles into site pages, or check them with `check`
pub fn convert(project: &Project, check: bool) -> Result<ConvertReport> {
    let mapping = Converter::load_mapping(&project.mapping_path());
    let converter = Converter::new(project.config(), mapping.as_ref());

    let source_dir = project.source_dir();
    let output_dir = project.output_dir();

    if check {
        converter.check_dir(&source_dir, &output_dir)
    } else {
        converter.convert_dir(&source_dir, &output_dir)
    }
}

/// Index then convert, as the site's prebuild step does
pub fn build(project: &Project, check: bool) -> Result<Option<(IndexReport, ConvertReport)>> {
    let Some(index_report) = index(project)? else {
        return Ok(None);
    };
    let convert_report = convert(project, check)?;
    Ok(Some((index_report, convert_report)))
}

/// A resolved topic as shown by `resolve`
#[derive(Debug, Serialize)]
pub struct ResolvedTopic {
    pub topic: String,
    pub link: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

/// Resolve topics against the current lookup artifact
pub fn resolve(project: &Project, topics: &[String]) -> Vec<ResolvedTopic> {
    let mapping = Converter::load_mapping(&project.mapping_path());
    let converter = Converter::new(project.config(), mapping.as_ref());
    let rewriter = converter.rewriter();

    topics
        .iter()
        .map(|topic| ResolvedTopic {
            topic: topic.clone(),
            link: rewriter.target(topic),
            resolution: rewriter.resolver().resolve(topic),
        })
        .collect()
}

/// Show or initialize the project configuration
pub fn config(project: &Project, show: bool, init: bool) -> Result<()> {
    if init {
        let config_path = project.root().join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!("{:?} already exists", config_path);
        }
        project.config().save(project.root())?;
        println!("✓ Wrote {:?}", config_path);
    }

    if show || !init {
        let config = project.config();
        println!("helpdocs Configuration");
        println!("======================\n");
        println!("Source directory: {:?}", project.source_dir());
        println!("Output directory: {:?}", project.output_dir());
        println!("Lookup artifact: {:?}", project.mapping_path());
        println!("Help root: /reference/{}/", config.help_root);
        println!("Site name: {}", config.site_name);

        println!("\nTitles:");
        for (file, title) in &config.titles {
            println!("  {} → {}", file, title);
        }
    }

    Ok(())
}

/// Run `build` whenever a helpfile changes
///
/// Events are grouped: after the first markdown change the watcher waits
/// until no event has arrived for `debounce_ms`, then rebuilds once.
pub fn watch(project: &Project, debounce_ms: u64) -> Result<()> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc::channel;

    let source_dir = project.source_dir();
    if !source_dir.is_dir() {
        return Err(crate::error::HelpdocsError::MissingDirectory { path: source_dir }.into());
    }

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    watcher.watch(&source_dir, RecursiveMode::NonRecursive)?;

    run_build_once(project);

    println!("Watching for changes in {:?}...", source_dir);
    println!("Press Ctrl+C to stop.\n");

    let debounce = Duration::from_millis(debounce_ms);

    while let Ok(event) = rx.recv() {
        if !is_relevant(&event) {
            continue;
        }

        let grouped = settle(&rx, debounce);
        tracing::debug!("Grouped {} further events before rebuilding", grouped);

        println!("\n📝 Changes detected, rebuilding...");
        run_build_once(project);
    }

    Ok(())
}

/// Whether a watcher event should trigger a rebuild
fn is_relevant(event: &notify::Result<notify::Event>) -> bool {
    match event {
        Ok(event) => {
            !matches!(event.kind, notify::EventKind::Access(_))
                && event.paths.iter().any(|p| is_markdown(p))
        }
        Err(e) => {
            tracing::warn!("Watch error: {}", e);
            false
        }
    }
}

/// Drain events until the channel has been quiet for `quiet`
///
/// Returns the number of events drained.
fn settle<T>(rx: &Receiver<T>, quiet: Duration) -> usize {
    let mut drained = 0;
    loop {
        match rx.recv_timeout(quiet) {
            Ok(_) => drained += 1,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                return drained
            }
        }
    }
}

fn run_build_once(project: &Project) {
    match build(project, false) {
        Ok(Some((index_report, convert_report))) => println!(
            "✓ Indexed {} headers, converted {} files",
            index_report.total_mappings(),
            convert_report.converted.len()
        ),
        Ok(None) => println!("⚠ No markdown files found"),
        Err(e) => eprintln!("Build error: {:#}", e),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

fn index_summary(report: &IndexReport) -> serde_json::Value {
    serde_json::json!({
        "totalMappings": report.total_mappings(),
        "headingsPerDocument": report.headings_per_document,
        "skipped": report.skipped,
        "collisions": report.collisions(),
    })
}

/// Print an indexing summary
pub fn print_index_report(report: &IndexReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&index_summary(report))?);
        }
        OutputFormat::Text => {
            println!("\n✓ Indexed {} headers", report.total_mappings());

            println!("\nSummary by document:");
            for (doc, count) in &report.headings_per_document {
                println!("  {}: {} headers", doc, count);
            }

            println!("\nExample mappings:");
            let mappings = &report.mapping.mappings;
            for (topic, doc) in mappings.iter().take(EXAMPLE_MAPPINGS) {
                println!("  {:?} → {}", topic, doc);
            }
            if mappings.len() > EXAMPLE_MAPPINGS {
                println!("  ... and {} more", mappings.len() - EXAMPLE_MAPPINGS);
            }

            if !report.collisions().is_empty() {
                println!("\n⚠ {} topic collisions:", report.collisions().len());
                for c in report.collisions() {
                    println!("  {:?}: {} → {}", c.key, c.previous, c.current);
                }
            }

            if !report.skipped.is_empty() {
                println!("\n⚠ Skipped: {}", report.skipped.join(", "));
            }
        }
    }
    Ok(())
}

/// Print a conversion summary
pub fn print_convert_report(
    report: &ConvertReport,
    check: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text if report.empty_corpus => println!("⚠ No markdown files found"),
        OutputFormat::Text if check => {
            for page in &report.diffs {
                print!("{}", page.diff);
            }
            if report.changed.is_empty() {
                println!("✓ {} pages up to date", report.converted.len());
            } else {
                println!(
                    "⚠ {} pages out of date: {}",
                    report.changed.len(),
                    report.changed.join(", ")
                );
            }
        }
        OutputFormat::Text => println!("✓ Successfully converted {} files", report.converted.len()),
    }
    Ok(())
}

/// Print the summary of an index-then-convert run
pub fn print_build_report(
    index_report: &IndexReport,
    convert_report: &ConvertReport,
    check: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "index": index_summary(index_report),
                "convert": convert_report,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            print_index_report(index_report, format)?;
            print_convert_report(convert_report, check, format)?;
        }
    }
    Ok(())
}

/// Print resolved topics
pub fn print_resolved(resolved: &[ResolvedTopic], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(resolved)?),
        OutputFormat::Text => {
            for r in resolved {
                let via = match r.resolution.source {
                    crate::convert::ResolutionSource::Mapping => "mapping".to_string(),
                    crate::convert::ResolutionSource::Fallback(rule) => {
                        format!("fallback:{}", rule)
                    }
                };
                println!("{} → {} ({})", r.topic, r.link, via);
            }
        }
    }
    Ok(())
}
