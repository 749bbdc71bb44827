//! Connection channel configuration.

use std::sync::Arc;

use runway_core::{DebugTarget, Launcher};
use tokio::sync::broadcast;

use crate::events::ChannelEvent;

/// Configuration for a [`crate::LaunchChannel`].
///
/// Every collaborator the channel uses is named here explicitly: the endpoint
/// URL, the owning launcher, the optional debug session, and an optional
/// caller-supplied event sender. Passing the sender in lets callers register
/// broadcast subscribers before the connection task runs, so the `Connected`
/// event cannot be missed.
pub struct ChannelConfig {
    /// WebSocket URL of the launcher backend. Must be non-empty.
    pub endpoint: String,
    /// The owning launcher; receives decoded messages, status transitions,
    /// and lifecycle signals.
    pub launcher: Arc<dyn Launcher>,
    /// Attached debug session, deactivated only on normal closure.
    pub debugger: Option<Arc<dyn DebugTarget>>,
    /// Caller-supplied sender for [`ChannelEvent`]s. When `None` the channel
    /// creates its own and subscribers join via
    /// [`crate::LaunchChannel::subscribe`].
    pub events: Option<broadcast::Sender<ChannelEvent>>,
}

impl ChannelConfig {
    /// Configuration with the two required collaborators.
    pub fn new(endpoint: impl Into<String>, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            endpoint: endpoint.into(),
            launcher,
            debugger: None,
            events: None,
        }
    }

    /// Attach a debug session.
    #[must_use]
    pub fn with_debugger(mut self, debugger: Arc<dyn DebugTarget>) -> Self {
        self.debugger = Some(debugger);
        self
    }

    /// Use a caller-owned event sender instead of a channel-internal one.
    #[must_use]
    pub fn with_events(mut self, events: broadcast::Sender<ChannelEvent>) -> Self {
        self.events = Some(events);
        self
    }
}
