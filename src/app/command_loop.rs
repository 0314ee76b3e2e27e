//! Command poll loop: exchange the button token and decide whether to push.
//!
//! ```text
//!  GarageServerPort ──▶ TokenStore (should_push / consume) ──▶ PushSink
//! ```
//!
//! A failed exchange leaves the store untouched and is simply retried on
//! the next period; there is no backoff.

use log::{debug, info, warn};

use crate::config::DeviceIdString;
use crate::error::CommsError;

use super::button_token::{ButtonToken, TokenStore};
use super::ports::{GarageServerPort, PushSink};

/// Result of one [`CommandPollLoop::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The exchange failed; nothing was consumed.
    ExchangeFailed(CommsError),
    /// First token since boot; stored without pushing.
    Armed,
    /// Same token as last time.
    Unchanged,
    /// New token; a push was queued.
    PushRequested,
    /// New token, but a push was already pending and absorbs this one.
    PushCollapsed,
}

pub struct CommandPollLoop {
    device_id: DeviceIdString,
    store: TokenStore,
}

impl CommandPollLoop {
    pub fn new(device_id: &DeviceIdString) -> Self {
        Self {
            device_id: device_id.clone(),
            store: TokenStore::new(),
        }
    }

    /// Run one exchange and act on it.
    pub fn poll(
        &mut self,
        server: &mut impl GarageServerPort,
        sink: &mut impl PushSink,
    ) -> PollOutcome {
        let observed = match server.exchange_button_token(&self.device_id, self.store.current()) {
            Ok(token) => token,
            Err(e) => {
                warn!("Button: token exchange failed: {}", e);
                return PollOutcome::ExchangeFailed(e);
            }
        };

        let outcome = self.decide(&observed, sink);
        self.store.consume(observed);
        outcome
    }

    fn decide(&self, observed: &ButtonToken, sink: &mut impl PushSink) -> PollOutcome {
        if !self.store.has_consumed_any() {
            info!("Button: armed with initial token '{}'", observed);
            return PollOutcome::Armed;
        }
        if !self.store.should_push(observed) {
            debug!("Button: token unchanged");
            return PollOutcome::Unchanged;
        }

        info!("Button: new token '{}', requesting push", observed);
        match sink.request_push() {
            Ok(()) => PollOutcome::PushRequested,
            Err(e) => {
                warn!("Button: push already pending ({}), collapsing", e);
                PollOutcome::PushCollapsed
            }
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}
