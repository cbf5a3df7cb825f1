//! Seams to the external collaborators (mode handlers, chat, generator).

pub mod messages;
pub mod offline;
pub mod traits;

pub use messages::{GeneratedFile, GeneratedProject, HandlerRequest, SessionMessage};
pub use offline::{OfflineChat, OfflineGenerator, OfflineModeHandler};
pub use traits::{ChatHandler, ModeHandler, TemplateGenerator};
