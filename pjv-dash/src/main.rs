//! pjv-dash - Interactive dashboard for consolidated judicial lookups
//!
//! Read-only web UI over the artifacts written by pjv-report: KPI cards,
//! venue/year charts, a filterable detail table with CSV export, and the
//! absence report.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pjv_common::config::Config;
use pjv_dash::{build_router, AppState};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "pjv-dash", about = "Dashboard for consolidated judicial lookups")]
struct Cli {
    /// Config file (overrides PJV_CONFIG and ./pjv.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting PJV dashboard v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let bind = config.dashboard.bind.clone();

    let state = AppState::new(config);

    // Warm the cache once so a missing table is reported immediately;
    // the server still starts and the API keeps answering with the
    // missing-data condition until pjv-report has run.
    match state.cache.lock().expect("cache poisoned").get() {
        Ok(snapshot) => info!("Consolidated table ready: {} row(s)", snapshot.rows.len()),
        Err(e) => warn!("{}", e),
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("pjv-dash listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
