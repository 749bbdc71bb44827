//! # runway-core
//!
//! Shared vocabulary for the Runway launcher client:
//!
//! - **Messages**: [`message::LaunchMessage`] (inbound, tagged by `code`) and
//!   [`message::LaunchCommand`] (outbound, tagged by `command`)
//! - **Session state**: [`session::SessionStatus`] and [`session::SessionSignal`]
//! - **Collaborators**: the [`session::Launcher`] owner trait and the optional
//!   [`session::DebugTarget`] trait
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `runway-channel` and by anything that
//! implements the launcher side of the session.

#![deny(unsafe_code)]

pub mod message;
pub mod session;

pub use message::{LaunchCommand, LaunchMessage};
pub use session::{DebugTarget, Launcher, SessionSignal, SessionStatus};
