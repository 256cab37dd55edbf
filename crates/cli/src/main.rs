use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use findrefs_resolver::{
    build_target_set, CorpusLister, ProjectLayout, Referent, ResolverError, WalkLister,
};
use findrefs_scanner::{unreferenced_targets, MatchSink, ScanExtensions, Scanner};

mod report;

use report::{JsonReport, PathStyle, PrintSink};

/// Exit status for a search term that resolved to nothing, kept
/// distinct from general failures so scripts can tell the two apart.
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Parser)]
#[command(name = "findrefs")]
#[command(about = "Find which asset files reference a given asset", long_about = None)]
#[command(version)]
struct Cli {
    /// Files (or file name fragments) to find references to
    #[arg(required = true, value_name = "TERM")]
    terms: Vec<String>,

    /// Scan binary containers (.dll/.bin/.exe) as well
    #[arg(long)]
    binary: bool,

    /// Print absolute paths instead of paths relative to the current directory
    #[arg(long, visible_alias = "absolute-paths")]
    absolute: bool,

    /// Report targets with no reference at the end of the run
    #[arg(long, visible_alias = "print-unreferenced")]
    unreferenced: bool,

    /// Skip the guid scan; match resource targets by name only
    #[arg(long)]
    as_resources_only: bool,

    /// Stop scanning for a target after its first reference
    #[arg(long)]
    first_match_only: bool,

    /// Print which target each referring file refers to
    #[arg(long)]
    detail: bool,

    /// Emit a JSON report on stdout instead of per-match lines
    #[arg(long)]
    json: bool,

    /// Debug: scan only these files (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "FILE,...")]
    search_in_files: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ResolverError>() {
            Some(ResolverError::NotFound(term)) => {
                println!("Not found: {term}");
                ExitCode::from(EXIT_NOT_FOUND)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let invoke_dir = std::env::current_dir()?.canonicalize()?;
    let layout = ProjectLayout::discover(&invoke_dir)?;
    let lister = WalkLister;

    let targets = build_target_set(&cli.terms, &layout, &lister)?;
    let style = PathStyle::new(cli.absolute, invoke_dir);

    if !cli.json {
        for target in &targets {
            if cli.as_resources_only {
                println!(
                    "Finding references to: {} (as resource)",
                    target.file_name()
                );
            } else {
                println!(
                    "Finding references to: {} -- {}",
                    target.file_name(),
                    target.guid()
                );
            }
        }
    }

    let files = if cli.search_in_files.is_empty() {
        lister.list(&layout.assets_dir)
    } else {
        cli.search_in_files.clone()
    };
    log::debug!("scanning {} corpus files", files.len());

    let extensions = ScanExtensions::for_targets(&targets, cli.binary);
    let sink: Arc<dyn MatchSink> = if cli.json {
        Arc::new(())
    } else {
        Arc::new(PrintSink::new(style.clone(), cli.detail))
    };
    let scanner = Scanner::new(targets, extensions, cli.first_match_only, sink);

    if !cli.as_resources_only {
        if !cli.json {
            println!();
        }
        scanner.scan_for_guids(&files).await?;
    }

    let resources: Vec<Arc<Referent>> = scanner
        .targets()
        .iter()
        .filter(|t| t.is_resource())
        .cloned()
        .collect();
    if !resources.is_empty() {
        if !cli.json {
            println!();
            for resource in &resources {
                println!(
                    "{} is loaded by name at runtime, so also searching for references by name.",
                    resource.file_name()
                );
            }
            println!();
        }
        scanner.scan_for_resource_names(&files).await?;
    }

    let targets = scanner.targets().to_vec();
    let records = scanner.finish();

    if cli.json {
        let unreferenced = unreferenced_targets(&targets, &records);
        let report = JsonReport::build(&targets, &records, &unreferenced, &style);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if cli.unreferenced {
        println!();
        for target in unreferenced_targets(&targets, &records) {
            if cli.as_resources_only {
                println!(
                    "UNREFERENCED as resource: {}",
                    style.render(target.path())
                );
            } else {
                println!("UNREFERENCED: {}", style.render(target.path()));
            }
        }
    }

    Ok(())
}
