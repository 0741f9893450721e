//! Communication with the remote CAN bridge service
//!
//! This module handles:
//! - The transport abstraction devices send wire messages through
//! - The HTTP client for the CAN bridge REST endpoints
//! - Interface status probing with bounded timeouts

mod bridge;
mod traits;

pub use bridge::{BridgeError, HttpBridgeClient, SEND_TIMEOUT, STATUS_TIMEOUT};
pub use traits::Communicator;
