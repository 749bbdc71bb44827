//! The launcher connection channel: one socket, one session, single-use.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use runway_core::{DebugTarget, LaunchMessage, Launcher, SessionSignal, SessionStatus};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::config::ChannelConfig;
use crate::error::ChannelError;
use crate::events::{ChannelEvent, ChannelState, CloseKind};

/// Outbound frames in flight before `send` awaits.
const OUTBOUND_BUFFER: usize = 64;

/// Lifecycle events buffered per subscriber.
const EVENT_BUFFER: usize = 16;

/// Close frame with no status code present, per RFC 6455 §7.4.1.
const WS_NO_STATUS_CODE: u16 = 1005;

/// Connection channel to the launcher backend.
///
/// Owns exactly one WebSocket for its whole lifetime. Constructing the channel
/// initiates the connection; there is no separate start step and no reconnect.
/// Once any terminal state is reached ([`ChannelState::Closed`] or
/// [`ChannelState::Errored`]) the instance is spent: no further events fire
/// and [`LaunchChannel::send`] fails with [`ChannelError::Closed`].
pub struct LaunchChannel {
    frame_tx: mpsc::Sender<String>,
    events: broadcast::Sender<ChannelEvent>,
    state_rx: watch::Receiver<ChannelState>,
    _task: JoinHandle<()>,
}

/// Everything the connection task needs to report back.
struct SessionCtx {
    endpoint: String,
    launcher: Arc<dyn Launcher>,
    debugger: Option<Arc<dyn DebugTarget>>,
    events: broadcast::Sender<ChannelEvent>,
    state: watch::Sender<ChannelState>,
}

impl LaunchChannel {
    /// Validate the configuration and start connecting.
    ///
    /// Fails synchronously with [`ChannelError::MissingEndpoint`] when the
    /// endpoint is blank; no socket is opened in that case. Otherwise the
    /// connection task is spawned immediately and the handle returned. Must
    /// be called from within a tokio runtime.
    pub fn open(config: ChannelConfig) -> Result<Self, ChannelError> {
        if config.endpoint.trim().is_empty() {
            return Err(ChannelError::MissingEndpoint);
        }
        let events = config
            .events
            .unwrap_or_else(|| broadcast::channel(EVENT_BUFFER).0);
        let (frame_tx, frame_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let ctx = SessionCtx {
            endpoint: config.endpoint,
            launcher: config.launcher,
            debugger: config.debugger,
            events: events.clone(),
            state: state_tx,
        };
        let task = tokio::spawn(run_session(ctx, frame_rx));
        Ok(Self {
            frame_tx,
            events,
            state_rx,
            _task: task,
        })
    }

    /// Serialize a value and send it as one JSON text frame.
    ///
    /// Returns [`ChannelError::Closed`] once the session has reached a
    /// terminal state.
    pub async fn send<T>(&self, message: &T) -> Result<(), ChannelError>
    where
        T: Serialize + ?Sized,
    {
        let frame = serde_json::to_string(message)?;
        self.frame_tx
            .send(frame)
            .await
            .map_err(|_| ChannelError::Closed)
    }

    /// Subscribe to lifecycle events.
    ///
    /// Subscribers only see events emitted after they join; to observe the
    /// `Connected` event reliably, pass a sender in via
    /// [`ChannelConfig::with_events`] before opening the channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }

    /// Current channel state.
    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    /// Watch state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }
}

/// Connection task: handshake, then pump frames until a terminal event.
async fn run_session(ctx: SessionCtx, mut frame_rx: mpsc::Receiver<String>) {
    let ws = match connect_async(ctx.endpoint.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(error) => {
            warn!(endpoint = %ctx.endpoint, error = %error, "launcher connection failed");
            fail(&ctx);
            return;
        }
    };

    ctx.launcher.set_status(SessionStatus::Active);
    let _ = ctx.state.send(ChannelState::Open);
    let _ = ctx.events.send(ChannelEvent::Connected);
    debug!(endpoint = %ctx.endpoint, "launcher connection open");

    let (mut ws_tx, mut ws_rx) = ws.split();
    loop {
        tokio::select! {
            outbound = frame_rx.recv() => {
                // The handle was dropped: local teardown, not a remote close,
                // so no signals are raised.
                let Some(frame) = outbound else { break };
                if let Err(error) = ws_tx.send(Message::Text(frame.into())).await {
                    warn!(error = %error, "launcher send failed");
                    fail(&ctx);
                    break;
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => dispatch_frame(&ctx, text.as_str()),
                    Some(Ok(Message::Close(frame))) => {
                        let code = frame.map_or(WS_NO_STATUS_CODE, |f| u16::from(f.code));
                        handle_close(&ctx, code);
                        break;
                    }
                    // Binary frames are not part of the protocol; ping/pong
                    // stay at the transport level.
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        warn!(error = %error, "launcher socket error");
                        fail(&ctx);
                        break;
                    }
                    None => {
                        warn!("launcher socket ended without close handshake");
                        fail(&ctx);
                        break;
                    }
                }
            }
        }
    }
}

/// Decode one inbound text frame and forward it to the launcher.
///
/// An undecodable frame is logged and dropped rather than tearing down the
/// session; delivery order for valid frames is wire order.
fn dispatch_frame(ctx: &SessionCtx, raw: &str) {
    match serde_json::from_str::<LaunchMessage>(raw) {
        Ok(message) => ctx.launcher.process_message(message),
        Err(error) => warn!(error = %error, "dropping undecodable launcher frame"),
    }
}

/// Apply the close-code table for a close frame from the peer.
fn handle_close(ctx: &SessionCtx, code: u16) {
    ctx.launcher.set_status(SessionStatus::Inactive);
    ctx.launcher.signal(SessionSignal::Terminated);
    let kind = CloseKind::from_code(code);
    match kind {
        // Only normal closure announces the end of session to subscribers
        // and releases the attached debug session.
        CloseKind::Normal => {
            let _ = ctx.events.send(ChannelEvent::SessionEnded);
            if let Some(debugger) = &ctx.debugger {
                debugger.set_status(SessionStatus::Inactive);
            }
        }
        CloseKind::CertificateIssue => {
            debug!(code, "launcher socket closed, reason Certificate Issue");
        }
        CloseKind::Unknown(other) => {
            debug!(code = other, "launcher socket closed, unknown reason");
        }
    }
    let _ = ctx.state.send(ChannelState::Closed(kind));
}

/// Transport error path: the error itself is logged by the caller, the owner
/// only learns that the session failed.
fn fail(ctx: &SessionCtx) {
    ctx.launcher.set_status(SessionStatus::Inactive);
    ctx.launcher.signal(SessionSignal::Error);
    let _ = ctx.state.send(ChannelState::Errored);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        messages: Mutex<Vec<LaunchMessage>>,
        statuses: Mutex<Vec<SessionStatus>>,
        signals: Mutex<Vec<SessionSignal>>,
    }

    impl Launcher for RecordingLauncher {
        fn process_message(&self, message: LaunchMessage) {
            self.messages.lock().push(message);
        }
        fn set_status(&self, status: SessionStatus) {
            self.statuses.lock().push(status);
        }
        fn signal(&self, signal: SessionSignal) {
            self.signals.lock().push(signal);
        }
    }

    #[derive(Default)]
    struct RecordingDebugger {
        statuses: Mutex<Vec<SessionStatus>>,
    }

    impl DebugTarget for RecordingDebugger {
        fn set_status(&self, status: SessionStatus) {
            self.statuses.lock().push(status);
        }
    }

    struct Harness {
        launcher: Arc<RecordingLauncher>,
        debugger: Arc<RecordingDebugger>,
        ctx: SessionCtx,
        events_rx: broadcast::Receiver<ChannelEvent>,
        state_rx: watch::Receiver<ChannelState>,
    }

    fn harness() -> Harness {
        let launcher = Arc::new(RecordingLauncher::default());
        let debugger = Arc::new(RecordingDebugger::default());
        let (events, events_rx) = broadcast::channel(16);
        let (state, state_rx) = watch::channel(ChannelState::Open);
        let ctx = SessionCtx {
            endpoint: "ws://127.0.0.1:0/launch".into(),
            launcher: launcher.clone(),
            debugger: Some(debugger.clone()),
            events,
            state,
        };
        Harness {
            launcher,
            debugger,
            ctx,
            events_rx,
            state_rx,
        }
    }

    #[test]
    fn normal_close_ends_session_and_releases_debugger() {
        let mut h = harness();
        handle_close(&h.ctx, 1000);

        assert_eq!(*h.launcher.statuses.lock(), vec![SessionStatus::Inactive]);
        assert_eq!(*h.launcher.signals.lock(), vec![SessionSignal::Terminated]);
        assert!(matches!(
            h.events_rx.try_recv(),
            Ok(ChannelEvent::SessionEnded)
        ));
        assert_eq!(*h.debugger.statuses.lock(), vec![SessionStatus::Inactive]);
        assert_eq!(*h.state_rx.borrow(), ChannelState::Closed(CloseKind::Normal));
    }

    #[test]
    fn tls_close_terminates_without_session_ended() {
        let mut h = harness();
        handle_close(&h.ctx, 1015);

        assert_eq!(*h.launcher.statuses.lock(), vec![SessionStatus::Inactive]);
        assert_eq!(*h.launcher.signals.lock(), vec![SessionSignal::Terminated]);
        assert!(h.events_rx.try_recv().is_err());
        assert!(h.debugger.statuses.lock().is_empty());
        assert_eq!(
            *h.state_rx.borrow(),
            ChannelState::Closed(CloseKind::CertificateIssue)
        );
    }

    #[test]
    fn unknown_close_carries_the_code() {
        let mut h = harness();
        handle_close(&h.ctx, 1006);

        assert_eq!(*h.launcher.signals.lock(), vec![SessionSignal::Terminated]);
        assert!(h.events_rx.try_recv().is_err());
        assert!(h.debugger.statuses.lock().is_empty());
        assert_eq!(
            *h.state_rx.borrow(),
            ChannelState::Closed(CloseKind::Unknown(1006))
        );
    }

    #[test]
    fn close_without_debugger_still_terminates() {
        let mut h = harness();
        h.ctx.debugger = None;
        handle_close(&h.ctx, 1000);

        assert_eq!(*h.launcher.signals.lock(), vec![SessionSignal::Terminated]);
        assert!(matches!(
            h.events_rx.try_recv(),
            Ok(ChannelEvent::SessionEnded)
        ));
    }

    #[test]
    fn transport_failure_signals_error_only() {
        let mut h = harness();
        fail(&h.ctx);

        assert_eq!(*h.launcher.statuses.lock(), vec![SessionStatus::Inactive]);
        assert_eq!(*h.launcher.signals.lock(), vec![SessionSignal::Error]);
        assert!(h.events_rx.try_recv().is_err());
        assert!(h.debugger.statuses.lock().is_empty());
        assert_eq!(*h.state_rx.borrow(), ChannelState::Errored);
    }

    #[test]
    fn valid_frame_is_forwarded() {
        let h = harness();
        dispatch_frame(&h.ctx, r#"{"code":"OUTPUT","message":"hello"}"#);

        assert_eq!(
            *h.launcher.messages.lock(),
            vec![LaunchMessage::Output {
                message: "hello".into()
            }]
        );
    }

    #[test]
    fn undecodable_frame_is_dropped() {
        let h = harness();
        dispatch_frame(&h.ctx, "not json at all");
        dispatch_frame(&h.ctx, r#"{"code":"NOT_A_CODE"}"#);

        assert!(h.launcher.messages.lock().is_empty());
    }

    #[test]
    fn frames_are_forwarded_in_order() {
        let h = harness();
        dispatch_frame(&h.ctx, r#"{"code":"EXECUTION_STARTED"}"#);
        dispatch_frame(&h.ctx, r#"{"code":"OUTPUT","message":"line 1"}"#);
        dispatch_frame(&h.ctx, r#"{"code":"EXECUTION_STOPPED"}"#);

        assert_eq!(
            *h.launcher.messages.lock(),
            vec![
                LaunchMessage::ExecutionStarted,
                LaunchMessage::Output {
                    message: "line 1".into()
                },
                LaunchMessage::ExecutionStopped,
            ]
        );
    }

    #[tokio::test]
    async fn blank_endpoint_is_a_construction_error() {
        let launcher: Arc<dyn Launcher> = Arc::new(RecordingLauncher::default());
        for endpoint in ["", "   "] {
            let result = LaunchChannel::open(ChannelConfig::new(endpoint, launcher.clone()));
            assert!(matches!(result, Err(ChannelError::MissingEndpoint)));
        }
    }
}
