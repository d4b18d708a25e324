//! Configuration loading
//!
//! Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `PJV_CONFIG` environment variable
//! 3. `./pjv.toml` in the working directory
//! 4. Compiled defaults (fallback)
//!
//! Every field is optional in the TOML file; unset fields take the
//! compiled default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PJV_CONFIG";

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "pjv.toml";

/// Tool-wide configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of per-subject lookup documents (batch input)
    pub input_dir: PathBuf,
    /// Consolidated CSV table (batch output, dashboard input)
    pub table_path: PathBuf,
    /// Searched-subject registry JSON (batch output, dashboard input)
    pub registry_path: PathBuf,
    /// Directory the five chart images are written to
    pub charts_dir: PathBuf,
    pub dashboard: DashboardConfig,
}

/// Dashboard-specific settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address the HTTP server binds to
    pub bind: String,
    /// Login credentials (single fixed pair, no lockout)
    pub username: String,
    pub password: String,
    /// Venue code the default filter and the absence analysis single out
    pub preferred_venue: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("consultas"),
            table_path: PathBuf::from("processos_consolidados.csv"),
            registry_path: PathBuf::from("servico-busca-cpf.json"),
            charts_dir: PathBuf::from("."),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5780".to_string(),
            username: "admin".to_string(),
            password: "pedro2026".to_string(),
            preferred_venue: "TJGO".to_string(),
        }
    }
}

impl Config {
    /// Resolve and load configuration per the priority order above.
    ///
    /// An explicitly named file (CLI or env) that is missing or invalid
    /// is an error; the implicit `./pjv.toml` is only used when present.
    pub fn load(cli_path: Option<&Path>) -> Result<Config> {
        if let Some(path) = cli_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }

        Ok(Config::default())
    }

    /// Parse a specific TOML config file
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }
}
