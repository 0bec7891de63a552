//! Resolved runtime configuration

use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;

use crate::types::{Result, UndermineError};

/// Name of the data directory under the home directory
const DATA_DIR_NAME: &str = ".undermine";

/// Runtime configuration shared by every subcommand
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Quote backend endpoint
    pub endpoint: String,
    /// Directory holding the checkbox store and log file
    pub data_dir: PathBuf,
    /// Initial profit threshold in percent
    pub threshold: f64,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Config {
    /// Build a config, resolving the default data directory (~/.undermine) when none is given
    pub fn resolve(
        endpoint: String,
        data_dir: Option<PathBuf>,
        threshold: f64,
        timeout_secs: u64,
    ) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(UndermineError::Config(format!(
                "threshold must be a finite number, got {}",
                threshold
            )));
        }

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        Ok(Self {
            endpoint,
            data_dir,
            threshold,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| UndermineError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
