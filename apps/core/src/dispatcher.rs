//! Routes one classified utterance to the right collaborator.
//!
//! Nothing that happens in a collaborator crosses this boundary: errors and
//! panics alike become a short user-facing message.

use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::brain::{
    Classification, CommandPrecedence, CommandRoute, IntentClassifier, MatchedCommand, Mode,
    ModeState, RequirementAnalyzer,
};
use crate::error::AppError;
use crate::handlers::{ChatHandler, HandlerRequest, ModeHandler, TemplateGenerator};

/// Reply used whenever a collaborator fails.
pub const FAILURE_REPLY: &str = "I couldn't complete that, please try again.";

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Awaits a collaborator call, turning a panic into `AppError::Handler`.
async fn guarded<T, F>(what: &str, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(AppError::Handler(format!(
            "{} panicked: {}",
            what,
            panic_message(payload.as_ref())
        ))),
    }
}

pub struct Dispatcher {
    mode_state: ModeState,
    classifier: IntentClassifier,
    analyzer: RequirementAnalyzer,
    handlers: HashMap<Mode, Arc<dyn ModeHandler>>,
    chat: Arc<dyn ChatHandler>,
    generator: Arc<dyn TemplateGenerator>,
}

impl Dispatcher {
    pub fn new(
        mode_state: ModeState,
        chat: Arc<dyn ChatHandler>,
        generator: Arc<dyn TemplateGenerator>,
    ) -> Self {
        Self {
            mode_state,
            classifier: IntentClassifier::new(),
            analyzer: RequirementAnalyzer::new(),
            handlers: HashMap::new(),
            chat,
            generator,
        }
    }

    /// Registers the handler serving `mode`'s commands.
    pub fn with_handler(mut self, mode: Mode, handler: Arc<dyn ModeHandler>) -> Self {
        self.handlers.insert(mode, handler);
        self
    }

    pub fn with_precedence(mut self, precedence: CommandPrecedence) -> Self {
        self.classifier = IntentClassifier::with_precedence(precedence);
        self
    }

    pub fn mode_state(&self) -> &ModeState {
        &self.mode_state
    }

    /// Processes one utterance and returns the reply. Never fails.
    #[instrument(skip(self))]
    pub async fn handle(&self, utterance: &str) -> String {
        let mode = self.mode_state.current();
        let result = self.classifier.classify(utterance, mode);

        match result.classification {
            Classification::ModeSwitch { mode: target } => self.switch_mode(target),
            Classification::Command(command) => self.dispatch_command(mode, command, utterance).await,
            Classification::Chat => {
                let reply = guarded("chat handler", self.chat.chat(mode, utterance.to_string())).await;
                self.reply_or_failure(reply, mode, utterance)
            }
        }
    }

    fn switch_mode(&self, target: Mode) -> String {
        if let Err(e) = self.mode_state.set_mode(target) {
            error!("Failed to persist mode {}: {}", target, e);
            return format!(
                "I couldn't switch to {} mode, please try again.",
                target.name().to_uppercase()
            );
        }
        format!(
            "Switched to {} mode. {}.",
            target.name().to_uppercase(),
            target.description()
        )
    }

    async fn dispatch_command(&self, mode: Mode, command: MatchedCommand, utterance: &str) -> String {
        match command.kind.route() {
            CommandRoute::ModeInfo => self.mode_info(mode),
            CommandRoute::Handler(owner) => {
                let Some(handler) = self.handlers.get(&owner) else {
                    warn!("No handler registered for {} mode", owner);
                    return format!("{} commands are not available right now.", owner);
                };
                info!(kind = %command.kind, %owner, "Forwarding command");
                let request = HandlerRequest::command(mode, command.kind, command.args, utterance);
                let reply = guarded("mode handler", handler.handle(request)).await;
                self.reply_or_failure(reply, mode, utterance)
            }
            CommandRoute::ProjectGeneration => {
                let requirements = self.analyzer.analyze(utterance);
                if requirements.is_empty() {
                    info!("Project request without recognized tech or features");
                }
                let generated = guarded("template generator", self.generator.generate(requirements)).await;
                let reply = generated.map(|project| {
                    let files: Vec<&str> = project.files.iter().map(|f| f.path.as_str()).collect();
                    format!(
                        "Generated {} ({} files): {}",
                        project.display_name,
                        files.len(),
                        files.join(", ")
                    )
                });
                self.reply_or_failure(reply, mode, utterance)
            }
        }
    }

    fn mode_info(&self, current: Mode) -> String {
        let mut lines = vec![format!("Current mode: {}", current)];
        for mode in Mode::ALL {
            let marker = if mode == current { "*" } else { "-" };
            lines.push(format!(
                "{} {}: {} (e.g. {})",
                marker,
                mode,
                mode.description(),
                mode.sample_commands().join(", ")
            ));
        }
        lines.join("\n")
    }

    fn reply_or_failure(&self, reply: Result<String, AppError>, mode: Mode, utterance: &str) -> String {
        match reply {
            Ok(text) => text,
            Err(e) => {
                error!(%mode, utterance, "Collaborator failed: {}", e);
                FAILURE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn explode() -> Result<String, AppError> {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_guarded_converts_panic() {
        let result = guarded("test", explode()).await;
        match result {
            Err(AppError::Handler(msg)) => assert!(msg.contains("boom")),
            other => panic!("Expected Handler error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_guarded_passes_through() {
        let result = guarded("test", async { Ok::<_, AppError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
