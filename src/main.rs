// Rollbook - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (platform config.toml or --config)
// 3. Logging initialisation (debug mode support)
// 4. Ingest -> summary counts -> optional view selection and CSV export

use rollbook::app::ingest::{load_paths, IngestConfig};
use rollbook::app::state::Dashboard;
use rollbook::core::counts::Counts;
use rollbook::core::filter::{CgpaConstraint, FilterCriteria, QuickFilter};
use rollbook::core::options::FilterOptions;
use rollbook::platform::config::{load_config, load_config_file, AppConfig, PlatformPaths};
use rollbook::platform::fs::write_artifact;
use rollbook::util;
use rollbook::util::error::{ExportError, Result};

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when the selected view has no records to export.
const EXIT_NO_DATA: u8 = 2;

/// Rollbook - student record dashboard.
///
/// Loads student record files (CSV or JSON, or directories of them), prints
/// the category counts and optionally exports one filtered view as CSV.
#[derive(Parser, Debug)]
#[command(name = "rollbook", version, about)]
struct Cli {
    /// Record files (.csv, .json) or directories containing them.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Export a quick-filter category (male, female, distinction, first,
    /// second, third, distWithFirst, year1..year4).
    #[arg(short = 'q', long = "quick", conflicts_with_all = ["search", "year", "branch", "caste", "gender", "cgpa"])]
    quick: Option<String>,

    /// Export records whose registration number or name contains this text.
    #[arg(short = 's', long = "search", conflicts_with_all = ["year", "branch", "caste", "gender", "cgpa"])]
    search: Option<String>,

    /// Criteria filter: exact year.
    #[arg(long)]
    year: Option<String>,

    /// Criteria filter: branch (case-insensitive).
    #[arg(long)]
    branch: Option<String>,

    /// Criteria filter: caste (case-insensitive).
    #[arg(long)]
    caste: Option<String>,

    /// Criteria filter: gender (case-insensitive).
    #[arg(long)]
    gender: Option<String>,

    /// Criteria filter: CGPA constraint such as "8.5", ">8" or "<7.25".
    #[arg(long, allow_hyphen_values = true)]
    cgpa: Option<String>,

    /// Directory the CSV export is written to.
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Read configuration from this file instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    fn criteria(&self) -> Result<FilterCriteria> {
        let cgpa = match &self.cgpa {
            Some(expr) => Some(CgpaConstraint::parse(expr)?),
            None => None,
        };
        Ok(FilterCriteria {
            year: self.year.clone(),
            branch: self.branch.clone(),
            caste: self.caste.clone(),
            gender: self.gender.clone(),
            cgpa,
        })
    }
}

/// What was written by an export, for the summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportReport {
    title: String,
    path: Option<PathBuf>,
    rows: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    records: usize,
    files: &'a [PathBuf],
    counts: Counts,
    options: FilterOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<ExportReport>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();

    // Config is read before logging starts so its level can apply.
    let (config, config_warnings) = match &cli.config {
        Some(path) => match load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => load_config(&platform_paths),
    };

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Rollbook starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match run(&cli, &config, &platform_paths) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Rollbook failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &AppConfig, platform_paths: &PlatformPaths) -> Result<ExitCode> {
    let ingest_config = IngestConfig {
        include_patterns: config.include_patterns.clone(),
        max_files: config.max_files,
    };
    let outcome = load_paths(&cli.paths, &ingest_config)?;
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    let mut dashboard = Dashboard::new();
    dashboard.replace_records(outcome.records);

    let selected = if let Some(name) = &cli.quick {
        let filter: QuickFilter = name.parse()?;
        dashboard.select_quick(filter);
        true
    } else if let Some(query) = &cli.search {
        dashboard.search(query);
        true
    } else {
        let criteria = cli.criteria()?;
        if criteria.is_empty() {
            false
        } else {
            dashboard.apply_criteria(&criteria);
            true
        }
    };

    let mut exit = ExitCode::SUCCESS;
    let mut export = None;

    if selected {
        let title = dashboard.export_title().to_string();
        match dashboard.export() {
            Ok(artifact) => {
                let dir = cli
                    .out
                    .clone()
                    .or_else(|| config.output_dir.clone())
                    .unwrap_or_else(|| platform_paths.exports_dir.clone());
                let path = write_artifact(&dir, &artifact.file_name, &artifact.bytes)?;
                tracing::info!(path = %path.display(), rows = artifact.rows, "Export written");
                export = Some(ExportReport {
                    title,
                    path: Some(path),
                    rows: artifact.rows,
                });
            }
            Err(ExportError::NoData) => {
                eprintln!("no data: \"{title}\" matched no records; nothing exported");
                export = Some(ExportReport {
                    title,
                    path: None,
                    rows: 0,
                });
                exit = ExitCode::from(EXIT_NO_DATA);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let summary = Summary {
        records: dashboard.records().len(),
        files: &outcome.files,
        counts: dashboard.counts(),
        options: dashboard.options(),
        export,
    };
    print_summary(&summary, cli.json).map_err(|e| ExportError::Io {
        path: PathBuf::from("<stdout>"),
        source: e,
    })?;

    Ok(exit)
}

fn print_summary(summary: &Summary<'_>, json: bool) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} records from {} file(s)",
        summary.records,
        summary.files.len()
    )?;
    for (filter, count) in summary.counts.iter() {
        writeln!(out, "  {:<28} {count:>6}", filter.label())?;
    }
    if let Some(export) = &summary.export {
        match &export.path {
            Some(path) => writeln!(
                out,
                "Exported {} row(s) as {} to {}",
                export.rows,
                export.title,
                path.display()
            )?,
            None => writeln!(out, "{}: no data", export.title)?,
        }
    }
    Ok(())
}
