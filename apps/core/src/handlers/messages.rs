use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::brain::{CommandArgs, CommandKind, Mode};
pub use crate::error::AppError;

/// What a mode handler receives for one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerRequest {
    /// Mode that was active when the utterance arrived.
    pub mode: Mode,
    /// The recognized command, if any.
    pub kind: Option<CommandKind>,
    pub args: CommandArgs,
    pub raw_text: String,
}

impl HandlerRequest {
    pub fn command(mode: Mode, kind: CommandKind, args: CommandArgs, raw_text: impl Into<String>) -> Self {
        Self {
            mode,
            kind: Some(kind),
            args,
            raw_text: raw_text.into(),
        }
    }
}

/// One file produced by a template generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the project root.
    pub path: String,
    pub content: String,
}

/// Result of a project generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProject {
    pub display_name: String,
    pub files: Vec<GeneratedFile>,
}

/// Messages that can be sent to a `SessionRunner`.
#[derive(Debug)]
pub enum SessionMessage {
    /// One user utterance to dispatch.
    Utterance {
        text: String,
        /// A channel to send the reply back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
    /// Stops the runner after the messages already queued.
    Shutdown,
}
