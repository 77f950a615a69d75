use clap::Parser;
use madmemory_core::{Catalog, FeedbackMode, SessionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Play Mad Memory in the terminal
#[derive(Debug, Parser)]
#[command(name = "madmemory", version, about)]
pub struct Cli {
    /// Seed for the display and label draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Settings file (JSON); defaults to <config dir>/madmemory/config.json
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number shown in log records
    #[arg(long, default_value_t = 1)]
    pub module_id: u32,

    /// Where to write logs; defaults to <data dir>/madmemory/madmemory.log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Accept input again as soon as a submission is judged
    #[arg(long)]
    pub immediate: bool,

    /// Use the high contrast theme
    #[arg(long)]
    pub high_contrast: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Contents of the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The sixteen display strings
    pub catalog: Option<Catalog>,
    pub feedback: Option<FeedbackMode>,
}

impl Settings {
    /// Read `explicit`, or the default location if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let json = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse { path, source })?;
        Ok(settings)
    }

    /// Session settings after applying command line overrides
    pub fn session_config(&self, cli: &Cli) -> SessionConfig {
        let feedback = if cli.immediate {
            FeedbackMode::Immediate
        } else {
            self.feedback.unwrap_or(FeedbackMode::Deferred)
        };
        SessionConfig {
            module_id: cli.module_id,
            feedback,
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog.clone().unwrap_or_default()
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("madmemory").join("config.json"))
}

/// Log file to use when none is given on the command line
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("madmemory").join("madmemory.log"))
}
