//! Session status, lifecycle signals, and collaborator traits.
//!
//! The connection channel never mutates launcher state directly; it reports
//! status transitions and lifecycle signals through the narrow [`Launcher`]
//! interface and lets the owner decide what to do with them.

/// Whether the launcher session is currently live.
///
/// Updated only through [`Launcher::set_status`] / [`DebugTarget::set_status`];
/// the channel has no other way to touch owner state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The connection is open and the session is usable.
    Active,
    /// The session has ended (closed or failed) and will not come back.
    Inactive,
}

/// Owner-directed lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSignal {
    /// The remote peer closed the connection (any close code).
    Terminated,
    /// The transport failed. Carries no payload; the channel logs the
    /// underlying error for diagnostics instead.
    Error,
}

/// The owning side of a launcher session.
///
/// Implemented by whatever object owns session-level state — it receives every
/// decoded message plus status transitions and lifecycle signals from the
/// connection channel. Callbacks are invoked from the channel's connection
/// task, one at a time, in wire order.
pub trait Launcher: Send + Sync + 'static {
    /// Handle one decoded inbound message.
    fn process_message(&self, message: crate::message::LaunchMessage);

    /// Record a session status transition.
    fn set_status(&self, status: SessionStatus);

    /// Receive a lifecycle signal.
    fn signal(&self, signal: SessionSignal);
}

/// An attached debug session.
///
/// Deactivated by the channel only when the connection closes normally.
pub trait DebugTarget: Send + Sync + 'static {
    /// Record a debug session status transition.
    fn set_status(&self, status: SessionStatus);
}
