//! Application modes and their persisted state.
//!
//! Exactly one mode is active per session. The value is persisted as a single
//! JSON object (`{"mode": "<ModeName>"}`) and re-read on every turn, so a
//! restart picks up where the last session left off.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::AppError;

/// Top-level context that decides which command grammar is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    General,
    Stock,
    CodingPractice,
    Project,
    PersonalAssistant,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::General
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Mode {
    /// All modes, in display order.
    pub const ALL: [Mode; 5] = [
        Mode::General,
        Mode::Stock,
        Mode::CodingPractice,
        Mode::Project,
        Mode::PersonalAssistant,
    ];

    /// Canonical persisted name
    pub fn name(&self) -> &'static str {
        match self {
            Mode::General => "General",
            Mode::Stock => "Stock",
            Mode::CodingPractice => "CodingPractice",
            Mode::Project => "Project",
            Mode::PersonalAssistant => "PersonalAssistant",
        }
    }

    /// Parses a canonical name or one of the short aliases users type.
    pub fn from_name(name: &str) -> Option<Mode> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "general" | "normal" | "default" => Some(Mode::General),
            "stock" | "stocks" => Some(Mode::Stock),
            "codingpractice" | "coding" | "dsa" => Some(Mode::CodingPractice),
            "project" | "projects" => Some(Mode::Project),
            "personalassistant" | "personal" | "assistant" => Some(Mode::PersonalAssistant),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mode::General => "General AI assistant for conversations and basic tasks",
            Mode::Stock => "Stock market analysis and portfolio management",
            Mode::CodingPractice => "Data Structures & Algorithms practice and progress tracking",
            Mode::Project => "Project management with Git integration for active development",
            Mode::PersonalAssistant => "Tasks, expenses, calendar and contacts",
        }
    }

    /// A few example utterances for the mode info listing.
    pub fn sample_commands(&self) -> &'static [&'static str] {
        match self {
            Mode::General => &["chat", "ask questions", "create react todo app"],
            Mode::Stock => &["show my portfolio", "technical analysis of AAPL", "should i buy TSLA"],
            Mode::CodingPractice => &["my progress", "arrays guide", "daily problem"],
            Mode::Project => &["git status", "commit <message>", "push", "save"],
            Mode::PersonalAssistant => &["add task <task>", "show tasks", "add expense <details>"],
        }
    }
}

/// On-disk shape of the mode file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRecord {
    /// Absent or `null` in the file reads as `None`.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Durable storage for the active mode.
pub trait ModeStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<ModeRecord>, AppError>;

    fn save(&self, mode: Mode) -> Result<(), AppError>;
}

/// Mode store backed by a JSON file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a failed write never leaves a half-written mode file behind.
pub struct FileModeStore {
    path: PathBuf,
}

impl FileModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "system_mode.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ModeStore for FileModeStore {
    fn load(&self) -> Result<Option<ModeRecord>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str::<ModeRecord>(&raw)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("corrupt mode file {}: {}", self.path.display(), e)))
    }

    fn save(&self, mode: Mode) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let record = ModeRecord {
            mode: Some(mode.name().to_string()),
        };
        let body = serde_json::to_vec_pretty(&record)?;

        let tmp = self.temp_path();
        fs::write(&tmp, body)
            .map_err(|e| AppError::Storage(format!("cannot write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::Storage(format!("cannot replace {}: {}", self.path.display(), e))
        })
    }
}

/// In-memory mode store, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryModeStore {
    record: Mutex<Option<ModeRecord>>,
}

impl MemoryModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an arbitrary (possibly unknown) mode string.
    pub fn with_raw(mode: &str) -> Self {
        Self {
            record: Mutex::new(Some(ModeRecord {
                mode: Some(mode.to_string()),
            })),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.lock().as_ref().and_then(|r| r.mode.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ModeRecord>> {
        // A poisoned lock still holds a valid record.
        self.record.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ModeStore for MemoryModeStore {
    fn load(&self) -> Result<Option<ModeRecord>, AppError> {
        Ok(self.lock().clone())
    }

    fn save(&self, mode: Mode) -> Result<(), AppError> {
        *self.lock() = Some(ModeRecord {
            mode: Some(mode.name().to_string()),
        });
        Ok(())
    }
}

/// The single active mode of one session, backed by a [`ModeStore`].
pub struct ModeState {
    store: Box<dyn ModeStore>,
}

impl ModeState {
    pub fn new(store: impl ModeStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryModeStore::new())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileModeStore::new(path))
    }

    /// Reads the persisted mode.
    ///
    /// A missing record, a record without a mode name, or an unknown mode
    /// name yields `General`, which is written back. An unreadable or unparsable store is a `Storage` error.
    pub fn get_mode(&self) -> Result<Mode, AppError> {
        match self.store.load()? {
            None => {
                info!("No persisted mode found, initializing to {}", Mode::General);
                self.store.save(Mode::General)?;
                Ok(Mode::General)
            }
            Some(record) => match record.mode.as_deref().and_then(Mode::from_name) {
                Some(mode) => Ok(mode),
                None => {
                    warn!(
                        "Unknown persisted mode {:?}, resetting to {}",
                        record.mode,
                        Mode::General
                    );
                    self.store.save(Mode::General)?;
                    Ok(Mode::General)
                }
            },
        }
    }

    /// Like [`get_mode`](Self::get_mode), but recovers from storage errors by
    /// resetting to `General`.
    pub fn current(&self) -> Mode {
        match self.get_mode() {
            Ok(mode) => mode,
            Err(e) => {
                warn!("Mode state unavailable ({}), falling back to {}", e, Mode::General);
                if let Err(e) = self.store.save(Mode::General) {
                    error!("Failed to reset mode state: {}", e);
                }
                Mode::General
            }
        }
    }

    pub fn set_mode(&self, new_mode: Mode) -> Result<(), AppError> {
        self.store.save(new_mode)?;
        info!("Mode set to {}", new_mode);
        Ok(())
    }
}
