use crate::brain::{Mode, ModeState};
use crate::dispatcher::Dispatcher;
use crate::error::AppError;
use crate::handlers::{ChatHandler, HandlerRequest, ModeHandler, OfflineGenerator};
use crate::session::SessionHandle;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

// --- Mock Components ---

/// Slow handler that tracks how many calls overlap.
#[derive(Default)]
struct OverlapTracker {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl ModeHandler for OverlapTracker {
    async fn handle(&self, request: HandlerRequest) -> Result<String, AppError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(request.raw_text)
    }
}

struct EchoChat;

#[async_trait]
impl ChatHandler for EchoChat {
    async fn chat(&self, mode: Mode, utterance: String) -> Result<String, AppError> {
        Ok(format!("{}: {}", mode, utterance))
    }
}

fn session_with(tracker: Arc<OverlapTracker>, state: ModeState) -> SessionHandle {
    let dispatcher = Dispatcher::new(state, Arc::new(EchoChat), Arc::new(OfflineGenerator::new()))
        .with_handler(Mode::Stock, tracker);
    SessionHandle::spawn(dispatcher)
}

// --- Tests ---

#[tokio::test]
async fn test_session_processes_a_conversation() {
    let session = session_with(Arc::new(OverlapTracker::default()), ModeState::in_memory());

    let ack = session.process("stock mode").await.unwrap();
    assert!(ack.starts_with("Switched to STOCK mode"));

    let reply = session.process("show my portfolio").await.unwrap();
    assert_eq!(reply, "show my portfolio");

    let reply = session.process("what a day").await.unwrap();
    assert_eq!(reply, "Stock: what a day");
}

#[tokio::test]
async fn test_utterances_of_one_session_never_overlap() {
    let tracker = Arc::new(OverlapTracker::default());
    let state = ModeState::in_memory();
    state.set_mode(Mode::Stock).unwrap();
    let session = session_with(tracker.clone(), state);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handle = session.clone();
        tasks.push(tokio::spawn(async move { handle.process("portfolio").await }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "portfolio");
    }

    assert_eq!(tracker.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sessions_have_independent_mode_state() {
    let a = session_with(Arc::new(OverlapTracker::default()), ModeState::in_memory());
    let b = session_with(Arc::new(OverlapTracker::default()), ModeState::in_memory());
    assert_ne!(a.id(), b.id());

    a.process("stock mode").await.unwrap();
    let reply = b.process("hello").await.unwrap();
    assert_eq!(reply, "General: hello");
}

#[tokio::test]
async fn test_process_after_shutdown_fails() {
    let session = session_with(Arc::new(OverlapTracker::default()), ModeState::in_memory());
    session.shutdown().await.unwrap();

    // Give the runner time to drop its receiver.
    sleep(Duration::from_millis(20)).await;
    let result = session.process("hello").await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}

struct SlowHandler;

#[async_trait]
impl ModeHandler for SlowHandler {
    async fn handle(&self, request: HandlerRequest) -> Result<String, AppError> {
        sleep(Duration::from_millis(300)).await;
        Ok(format!("slow: {}", request.raw_text))
    }
}

#[tokio::test]
async fn test_process_waits_for_a_slow_handler() {
    let state = ModeState::in_memory();
    state.set_mode(Mode::Stock).unwrap();
    let dispatcher = Dispatcher::new(state, Arc::new(EchoChat), Arc::new(OfflineGenerator::new()))
        .with_handler(Mode::Stock, Arc::new(SlowHandler));
    let session = SessionHandle::spawn(dispatcher);

    let reply = session.process("show my portfolio").await.unwrap();
    assert_eq!(reply, "slow: show my portfolio");
}
