//! Signaling broker for two-party WebRTC calls.
//!
//! Connections join rooms by key, the first participant is told when a peer
//! arrives and owns the offer, and offers, answers and ICE candidates are
//! relayed verbatim to the other slot. Media never passes through here.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod hub;
pub mod registry;
pub mod room;
pub mod server;
pub mod signaling;


pub use config::ServerConfig;
pub use error::SignalingError;
pub use hub::SignalingHub;
pub use registry::*;
pub use room::*;
pub use server::serve;
pub use signaling::*;
