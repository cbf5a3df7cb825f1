//! Runtime configuration, read from the environment (and an optional `.env`).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use validator::Validate;

use crate::brain::CommandPrecedence;
use crate::error::AppError;
use crate::fs_manager::DataPaths;
use crate::logging::LogFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Name the assistant introduces itself with.
    #[validate(length(min = 1))]
    pub assistant_name: String,
    pub data_dir: PathBuf,
    /// Overrides `<data_dir>/system_mode.json`.
    pub mode_file: Option<PathBuf>,
    pub command_precedence: CommandPrecedence,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant_name: "NEXUS".to_string(),
            data_dir: PathBuf::from("./data"),
            mode_file: None,
            command_precedence: CommandPrecedence::default(),
            log_format: LogFormat::default(),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Reads `NEXUS_*` variables on top of the defaults, then validates.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok(); // Don't fail if .env doesn't exist

        let defaults = Self::default();
        let config = Self {
            assistant_name: env::var("NEXUS_ASSISTANT_NAME").unwrap_or(defaults.assistant_name),
            data_dir: env_var("NEXUS_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            mode_file: env_var("NEXUS_MODE_FILE").map(PathBuf::from),
            command_precedence: env_var("NEXUS_COMMAND_PRECEDENCE")
                .map(|v| v.parse::<CommandPrecedence>())
                .transpose()?
                .unwrap_or(defaults.command_precedence),
            log_format: env_var("NEXUS_LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn data_paths(&self) -> DataPaths {
        let paths = DataPaths::new(&self.data_dir);
        match &self.mode_file {
            Some(file) => paths.with_mode_file(file),
            None => paths,
        }
    }
}
