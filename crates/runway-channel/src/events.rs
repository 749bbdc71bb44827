//! Observable channel lifecycle: broadcast events and the state machine.

// See https://tools.ietf.org/html/rfc6455#section-7.4.1
const WS_NORMAL_CODE: u16 = 1000;
const WS_TLS_CODE: u16 = 1015;

/// Lifecycle event broadcast to channel subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The socket finished its handshake and the session is live.
    Connected,
    /// The remote peer closed the connection with a normal-closure code.
    ///
    /// Emitted only on normal closure; abnormal and unknown close codes end
    /// the session without this event.
    SessionEnded,
}

/// How a close status code is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseKind {
    /// 1000 — graceful end of session.
    Normal,
    /// 1015 — the TLS handshake failed.
    CertificateIssue,
    /// Any other code, carried verbatim.
    Unknown(u16),
}

impl CloseKind {
    /// Classify a raw close status code.
    pub fn from_code(code: u16) -> Self {
        match code {
            WS_NORMAL_CODE => Self::Normal,
            WS_TLS_CODE => Self::CertificateIssue,
            other => Self::Unknown(other),
        }
    }
}

/// Connection channel state machine.
///
/// `Connecting` is the initial state, set the instant construction begins.
/// `Closed` and `Errored` are absorbing: the channel is single-use and never
/// transitions out of a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// Construction has begun; the handshake has not completed yet.
    Connecting,
    /// The socket is open and frames flow in both directions.
    Open,
    /// The remote peer closed the connection. Terminal.
    Closed(CloseKind),
    /// The transport failed. Terminal.
    Errored,
}

impl ChannelState {
    /// Whether this state is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed(_) | Self::Errored)
    }
}
