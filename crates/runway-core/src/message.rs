//! Wire message schema for the launcher session.
//!
//! Every frame on the socket is a complete JSON document. Inbound frames are
//! tagged by a `code` field, outbound frames by a `command` field; an inbound
//! frame whose tag is unknown fails deserialization at the boundary rather
//! than leaking an untyped value into the session.

use serde::{Deserialize, Serialize};

/// A message received from the launcher backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchMessage {
    /// Program execution has started on the backend.
    ExecutionStarted,

    /// Program execution finished on its own.
    ExecutionStopped,

    /// Program execution was terminated on request.
    ExecutionTerminated,

    /// A line of program output.
    Output {
        /// The output text, exactly as produced by the program.
        message: String,
    },

    /// The backend reported a launch or runtime error.
    Error {
        /// Human-readable error description.
        message: String,
    },

    /// Keepalive reply to a [`LaunchCommand::Ping`].
    Pong,
}

/// A command sent to the launcher backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchCommand {
    /// Run a program to completion.
    RunProgram {
        /// Path of the source file to run.
        path: String,
        /// Arguments passed to the program.
        args: Vec<String>,
    },

    /// Start a long-running service.
    RunService {
        /// Path of the source file to start.
        path: String,
    },

    /// Terminate the currently running program or service.
    Terminate,

    /// Keepalive probe.
    Ping,
}
