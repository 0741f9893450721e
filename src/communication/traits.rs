//! Transport trait abstraction for pluggable bridge backends

use async_trait::async_trait;
use hands_shared::RawMessage;
use std::collections::HashMap;

use super::BridgeError;

/// A transport that relays wire messages to the CAN bridge
///
/// Implementations make exactly one attempt per call. Retry policy belongs to
/// the caller.
#[async_trait]
pub trait Communicator: Send + Sync {
    /// Deliver one frame to the bridge
    async fn send_message(&self, msg: &RawMessage) -> Result<(), BridgeError>;

    /// Whether a single CAN interface is up
    async fn interface_status(&self, interface: &str) -> Result<bool, BridgeError>;

    /// Activity flag for every interface the bridge knows about
    async fn all_interface_statuses(&self) -> Result<HashMap<String, bool>, BridgeError>;

    /// Base URL of the bridge this communicator talks to
    fn service_url(&self) -> &str;

    /// Probe whether the bridge answers at all
    async fn is_connected(&self) -> bool {
        self.all_interface_statuses().await.is_ok()
    }
}
