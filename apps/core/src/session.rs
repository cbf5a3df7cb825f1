use crate::dispatcher::Dispatcher;
use crate::handlers::messages::{AppError, SessionMessage};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, info_span, instrument, Instrument};
use uuid::Uuid;

/// A handle to one running session.
///
/// Every utterance sent through a handle is queued to a single runner task,
/// so a session never processes two utterances at once. Handles are cheap
/// to clone; independent sessions each get their own runner and `ModeState`.
#[derive(Clone)]
pub struct SessionHandle {
    id: String,
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Spawns a runner that owns `dispatcher` and returns a handle to it.
    pub fn spawn(dispatcher: Dispatcher) -> Self {
        let id = Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::channel(32);
        let runner = SessionRunner {
            receiver,
            dispatcher,
        };
        let span = info_span!("session", session_id = %id);
        tokio::spawn(async move { runner.run().await }.instrument(span));
        Self { id, sender }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sends one utterance and waits for its reply.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn process(&self, text: &str) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SessionMessage::Utterance {
            text: text.to_string(),
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Internal(format!("session closed: {}", e)))?;
        recv.await
            .map_err(|e| AppError::Internal(format!("session dropped reply: {}", e)))?
    }

    /// Asks the runner to stop once queued utterances are served.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SessionMessage::Shutdown)
            .await
            .map_err(|e| AppError::Internal(format!("session closed: {}", e)))
    }
}

// --- Session Runner ---
struct SessionRunner {
    receiver: mpsc::Receiver<SessionMessage>,
    dispatcher: Dispatcher,
}

impl SessionRunner {
    async fn run(mut self) {
        info!("Session started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SessionMessage::Utterance { text, responder } => {
                    let reply = self.dispatcher.handle(&text).await;
                    let _ = responder.send(Ok(reply));
                }
                SessionMessage::Shutdown => {
                    info!("Session shutting down...");
                    break;
                }
            }
        }
        info!("Session stopped");
    }
}
