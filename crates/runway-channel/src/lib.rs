//! # runway-channel
//!
//! Client-side connection channel to the Runway launcher backend.
//!
//! A [`LaunchChannel`] owns exactly one WebSocket to a fixed endpoint for its
//! whole lifetime: construct, connect, operate, terminal close or error. There
//! is no reconnection, multiplexing, or retry. Inbound text frames are decoded
//! into [`runway_core::LaunchMessage`] values and forwarded to the owning
//! [`runway_core::Launcher`] in wire order; outbound values are serialized to
//! single JSON text frames. Lifecycle is observable two ways: broadcast
//! [`ChannelEvent`]s for subscribers and a watchable [`ChannelState`].

#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod error;
pub mod events;

pub use channel::LaunchChannel;
pub use config::ChannelConfig;
pub use error::ChannelError;
pub use events::{ChannelEvent, ChannelState, CloseKind};
