//! Best-effort progress notifications.
//!
//! The loop is the single producer. Sends never wait: when the channel is
//! full or the receiver is gone the event is dropped.

use dockerizer_domain::{AgentEvent, AgentEventType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{trace, warn};

#[derive(Debug, Clone, Default)]
pub struct AgentEventEmitter {
    sender: Option<mpsc::Sender<AgentEvent>>,
    dropped: Arc<AtomicUsize>,
}

impl AgentEventEmitter {
    /// Bounded channel of `capacity` events (at least one).
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AgentEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender: Some(tx),
                dropped: Arc::new(AtomicUsize::new(0)),
            },
            rx,
        )
    }

    /// Emitter with no observer.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event_type: AgentEventType, message: impl Into<String>) {
        self.send(AgentEvent::new(event_type, message));
    }

    pub fn emit_with(
        &self,
        event_type: AgentEventType,
        message: impl Into<String>,
        data: serde_json::Value,
    ) {
        self.send(AgentEvent::new(event_type, message).with_data(data));
    }

    /// Events dropped because the channel was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    fn send(&self, event: AgentEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(event = %event.event_type, "Progress channel full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                trace!(event = %event.event_type, "Progress receiver gone, dropping event");
            }
        }
    }
}
