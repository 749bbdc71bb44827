//! Channel error types.

use thiserror::Error;

/// Errors surfaced through `Result`s by the connection channel.
///
/// Transport failures are not listed here: they arrive asynchronously through
/// the owner's [`runway_core::SessionSignal::Error`] path, matching the
/// callback contract of the session.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The configuration has no endpoint to connect to.
    #[error("invalid endpoint: configuration requires a non-empty endpoint URL")]
    MissingEndpoint,

    /// An outbound message could not be serialized to JSON.
    #[error("failed to serialize outbound message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The session has already reached a terminal state; the channel is
    /// single-use and accepts no further sends.
    #[error("channel closed: the launcher session has ended")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_endpoint_names_the_field() {
        let message = ChannelError::MissingEndpoint.to_string();
        assert!(message.contains("endpoint"));
    }

    #[test]
    fn serialize_error_wraps_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ChannelError::from(serde_err);
        assert!(matches!(error, ChannelError::Serialize(_)));
        assert!(error.to_string().contains("serialize"));
    }

    #[test]
    fn closed_mentions_the_session() {
        assert!(ChannelError::Closed.to_string().contains("session has ended"));
    }
}
