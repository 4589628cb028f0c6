use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Session lifecycle notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    SignedIn {
        remembered: bool,
    },
    SignedOut,
    /// The session was invalidated and the operator must be sent to `location`.
    LoginRequired {
        location: String,
        trigger_path: Option<String>,
    },
}

pub type EventSender = broadcast::Sender<SessionEvent>;
pub type EventReceiver = broadcast::Receiver<SessionEvent>;

#[derive(Clone, Debug)]
pub struct EventBus {
    sender: EventSender,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    pub fn publish(&self, event: SessionEvent) {
        // No subscribers is fine: nobody is rendering.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
