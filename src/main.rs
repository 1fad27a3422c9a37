//! helpdocs - SharpMUSH helpfile indexer and converter
//!
//! Turns the upstream helpfiles into pages for the documentation site,
//! linking cross-references between them.

use anyhow::Result;
use clap::Parser;
use helpdocs::cli::{
    Cli, Commands,
    build, config, convert, index, resolve, watch,
    print_build_report, print_convert_report, print_index_report, print_resolved,
};
use helpdocs::project::Project;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let project = Project::open(&cli.path)?;

    // Execute command
    match cli.command {
        Commands::Index => {
            if let Some(report) = index(&project)? {
                print_index_report(&report, cli.format)?;
            }
        }

        Commands::Convert(args) => {
            let report = convert(&project, args.check)?;
            print_convert_report(&report, args.check, cli.format)?;
            ensure_up_to_date(&report.changed, args.check)?;
        }

        Commands::Build(args) => {
            if let Some((index_report, convert_report)) = build(&project, args.check)? {
                print_build_report(&index_report, &convert_report, args.check, cli.format)?;
                ensure_up_to_date(&convert_report.changed, args.check)?;
            }
        }

        Commands::Resolve(args) => {
            let resolved = resolve(&project, &args.topics);
            print_resolved(&resolved, cli.format)?;
        }

        Commands::Watch(args) => {
            watch(&project, args.debounce)?;
        }

        Commands::Config(args) => {
            config(&project, args.show, args.init)?;
        }
    }

    Ok(())
}

/// Fail a `--check` run when any page is out of date
fn ensure_up_to_date(changed: &[String], check: bool) -> Result<()> {
    if check && !changed.is_empty() {
        anyhow::bail!(
            "{} converted pages are out of date; run `helpdocs convert`",
            changed.len()
        );
    }
    Ok(())
}
