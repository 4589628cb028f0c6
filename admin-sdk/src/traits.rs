use async_trait::async_trait;

use crate::{
    errors::Result,
    events::{EventBus, SessionEvent},
    transport::{ApiRequest, ApiResponse},
};

/// Sends one request over the network and returns whatever came back.
///
/// Implementations must not interpret status codes; a non-2xx answer is a
/// successful exchange. Only failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Performs the hard navigation to the login entry point.
///
/// Called by the HTTP client core after it has cleared the session. It must
/// not issue requests of its own.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str, trigger_path: &str);
}

/// Navigator that announces the redirect on the session event bus.
#[derive(Debug, Clone)]
pub struct EventNavigator {
    events: EventBus,
}

impl EventNavigator {
    pub fn new(events: EventBus) -> Self {
        Self { events }
    }
}

impl Navigator for EventNavigator {
    fn navigate(&self, location: &str, trigger_path: &str) {
        tracing::info!("Redirecting to {} after {}", location, trigger_path);
        self.events.publish(SessionEvent::LoginRequired {
            location: location.to_string(),
            trigger_path: Some(trigger_path.to_string()),
        });
    }
}
