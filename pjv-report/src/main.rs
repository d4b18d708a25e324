//! pjv-report - Batch consolidation pipeline
//!
//! Reads a directory of per-subject lookup documents, consolidates all
//! case entries into one normalized CSV table plus a searched-subject
//! registry, and renders five static summary charts.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pjv_common::config::Config;
use pjv_common::{loader, normalize, store};
use tracing::{info, warn};

mod charts;

#[derive(Parser, Debug)]
#[command(
    name = "pjv-report",
    about = "Consolidate judicial lookup documents and render summary charts"
)]
struct Cli {
    /// Config file (overrides PJV_CONFIG and ./pjv.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of per-subject lookup documents
    #[arg(long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Consolidated CSV output path
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Searched-subject registry output path
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Directory to write chart images to
    #[arg(long, value_name = "DIR")]
    charts_dir: Option<PathBuf>,

    /// Skip chart rendering, only write the table and registry
    #[arg(long)]
    skip_charts: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting PJV report generator v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(input) = cli.input {
        config.input_dir = input;
    }
    if let Some(output) = cli.output {
        config.table_path = output;
    }
    if let Some(registry) = cli.registry {
        config.registry_path = registry;
    }
    if let Some(charts_dir) = cli.charts_dir {
        config.charts_dir = charts_dir;
    }

    info!("Reading lookup documents from {}", config.input_dir.display());
    let mut out = loader::load_directory(&config.input_dir)?;
    info!(
        "Loaded {} case row(s): {} file(s) total, {} with cases, {} without",
        out.rows.len(),
        out.summary.total_files,
        out.summary.with_cases,
        out.summary.without_cases
    );

    normalize::normalize(&mut out.rows);

    store::write_table(&config.table_path, &out.rows)?;
    info!("Consolidated table written to {}", config.table_path.display());

    store::write_registry(&config.registry_path, &out.registry)?;
    info!(
        "Registry of {} searched subject(s) written to {}",
        out.registry.len(),
        config.registry_path.display()
    );

    if cli.skip_charts {
        info!("Chart rendering skipped");
    } else if out.rows.is_empty() {
        warn!("No case data found; no charts rendered");
    } else {
        charts::render_all(&out.rows, &out.summary, &config.charts_dir);
    }

    Ok(())
}
