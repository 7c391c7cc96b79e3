//! Enrollment streamgraph - command line entry point
//!
//! Reads an enrollment spreadsheet (or CSV), pivots student counts by term
//! and department and writes a streamgraph document (SVG or HTML).

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use enrollment_streamgraph::chart::{self, Mounts, OutputFormat};
use enrollment_streamgraph::config::StreamgraphConfig;
use enrollment_streamgraph::enrollment::PropertyReader;
use enrollment_streamgraph::pipeline;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "streamgraph_config.json";

const DOCUMENT_TITLE: &str = "Enrollment by Term and Department";

#[derive(Parser, Debug)]
#[command(author, version, about = "Draw an enrollment streamgraph from a spreadsheet", long_about = None)]
struct Cli {
    /// Spreadsheet (xlsx, xlsm, xlsb, xls, ods) or CSV file with Term, Department and Student_Count columns
    #[arg(default_value = "CSE_Enrollment.xlsx", value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output document path (defaults to streamgraph.<format>)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// JSON file of property overrides
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Property override as key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Output format, shorthand for --set output.format=<FORMAT>
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Print the pivoted rows as JSON to stdout
    #[arg(long)]
    print_pivot: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    info!("Enrollment streamgraph v{}", env!("CARGO_PKG_VERSION"));

    let props = load_properties(&cli)?;
    let config = StreamgraphConfig::from_properties(&props);
    debug!(?config, "resolved configuration");

    let mut mounts = Mounts::new();
    let enrollment = pipeline::load(&cli.input, &config, &mut mounts)
        .await
        .with_context(|| format!("failed to build streamgraph from {}", cli.input.display()))?;

    if cli.print_pivot {
        let json = serde_json::to_string_pretty(&enrollment.rows)
            .context("failed to serialise pivoted rows")?;
        println!("{}", json);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("streamgraph.{}", config.output_format.extension())));
    let document = chart::write(&mounts, config.output_format, DOCUMENT_TITLE);
    tokio::fs::write(&output, document)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("Wrote {} ({})", output.display(), config.output_format);
    Ok(())
}

/// Collect property values: config file, then `--set` overrides, then `--format`
fn load_properties(cli: &Cli) -> Result<PropertyReader> {
    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut props = match config_path {
        Some(path) => read_config_file(&path)?,
        None => PropertyReader::new(),
    };

    for assignment in &cli.overrides {
        props
            .set_assignment(assignment)
            .with_context(|| format!("invalid --set '{}'", assignment))?;
    }
    if let Some(format) = cli.format {
        props.set("output.format", format.to_string());
    }

    Ok(props)
}

fn read_config_file(path: &Path) -> Result<PropertyReader> {
    info!("Loading configuration from {}", path.display());
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    PropertyReader::from_json(&json).with_context(|| format!("invalid config file {}", path.display()))
}
