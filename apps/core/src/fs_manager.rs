use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Layout of the NEXUS data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
    mode_file: PathBuf,
}

impl DataPaths {
    /// Uses `<root>/system_mode.json` as the mode file.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mode_file = root.join("system_mode.json");
        Self { root, mode_file }
    }

    pub fn with_mode_file(mut self, mode_file: impl Into<PathBuf>) -> Self {
        self.mode_file = mode_file.into();
        self
    }

    /// Data directory (./data).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Log directory (./data/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Generated projects (./data/projects).
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    pub fn mode_file(&self) -> &Path {
        &self.mode_file
    }

    /// Creates the directory tree if missing.
    pub fn init(&self) -> Result<(), std::io::Error> {
        let mut dirs = vec![self.root.clone(), self.logs_dir(), self.projects_dir()];
        if let Some(parent) = self.mode_file.parent() {
            if !parent.as_os_str().is_empty() {
                dirs.push(parent.to_path_buf());
            }
        }

        for dir in dirs {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
