use crate::brain::{Mode, RequirementExtraction};
use crate::handlers::messages::{AppError, GeneratedProject, HandlerRequest};
use async_trait::async_trait;

/// Defines the public interface for a per-mode command handler.
///
/// One implementation is registered for each non-General mode. This crate
/// only routes; what a command actually does is the handler's business.
#[async_trait]
pub trait ModeHandler: Send + Sync + 'static {
    /// Serves one recognized command and returns the reply text.
    async fn handle(&self, request: HandlerRequest) -> Result<String, AppError>;
}

/// Defines the public interface for the general conversational fallback.
#[async_trait]
pub trait ChatHandler: Send + Sync + 'static {
    async fn chat(&self, mode: Mode, utterance: String) -> Result<String, AppError>;
}

/// Defines the public interface for project template generation.
#[async_trait]
pub trait TemplateGenerator: Send + Sync + 'static {
    async fn generate(&self, requirements: RequirementExtraction) -> Result<GeneratedProject, AppError>;
}
