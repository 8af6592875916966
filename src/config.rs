use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::catalog;

/// Quiet period before a changing search input is considered settled.
pub const DEFAULT_QUIET_MILLIS: u64 = 400;

/// How many entries the trending panel shows.
pub const DEFAULT_TRENDING_LIMIT: i64 = 5;

/// Runtime configuration, resolved from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: String,
    pub trending_db: PathBuf,
    pub quiet_period: Duration,
    pub trending_limit: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing catalog API key: pass --api-key or set MOVIE_EXPLORER_API_KEY")]
    MissingApiKey,

    #[error("could not determine a data directory for the trending database")]
    NoDataDir,
}

impl Config {
    /// Resolve configuration. CLI values win over environment variables,
    /// which win over defaults.
    pub fn resolve(
        api_key: Option<String>,
        api_base: Option<String>,
        db: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key
            .or_else(|| std::env::var("MOVIE_EXPLORER_API_KEY").ok())
            .or_else(|| std::env::var("TMDB_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_base_url = api_base
            .or_else(|| std::env::var("MOVIE_EXPLORER_API_BASE").ok())
            .unwrap_or_else(|| catalog::DEFAULT_API_BASE_URL.to_string());

        let trending_db = match db {
            Some(path) => path,
            None => default_db_path()?,
        };

        Ok(Config {
            api_base_url,
            api_key,
            trending_db,
            quiet_period: Duration::from_millis(DEFAULT_QUIET_MILLIS),
            trending_limit: DEFAULT_TRENDING_LIMIT,
        })
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "movie-explorer", "movie-explorer")
}

fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("trending.db"))
}

/// Log destination. The terminal belongs to the TUI, so logs go to a file.
pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|d| d.cache_dir().join("movie-explorer.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("movie-explorer.log"))
}
