//! HTTP client for the CAN bridge service
//!
//! Endpoints used:
//! - `POST {url}/api/can` with a JSON [`RawMessage`]
//! - `GET {url}/api/status` returning `{"can0": true, ...}`
//! - `GET {url}/api/status/{interface}` returning `{"active": true}`

use async_trait::async_trait;
use hands_shared::RawMessage;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::Communicator;

/// Upper bound for delivering one frame
pub const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for a status poll
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(1);

/// Errors returned by the bridge client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("CAN bridge unavailable: {0}")]
    Unavailable(String),

    #[error("CAN bridge rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid response from CAN bridge: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BridgeError::InvalidResponse(err.to_string())
        } else {
            BridgeError::Unavailable(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct InterfaceStatus {
    active: bool,
}

/// Talks to the CAN bridge over HTTP
pub struct HttpBridgeClient {
    service_url: String,
    base: Url,
    client: reqwest::Client,
}

impl HttpBridgeClient {
    /// Create a client for the bridge at `service_url`
    pub fn new(service_url: impl Into<String>) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| BridgeError::Unavailable(format!("failed to create HTTP client: {}", e)))?;

        let service_url = service_url.into().trim_end_matches('/').to_string();
        let base = Url::parse(&service_url)
            .map_err(|e| BridgeError::Unavailable(format!("invalid bridge URL {:?}: {}", service_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(BridgeError::Unavailable(format!(
                "bridge URL {:?} cannot carry a path",
                service_url
            )));
        }

        Ok(Self {
            service_url,
            base,
            client,
        })
    }

    /// Bridge URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_status<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T, BridgeError> {
        let response = self
            .client
            .get(url)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Communicator for HttpBridgeClient {
    async fn send_message(&self, msg: &RawMessage) -> Result<(), BridgeError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "can"]))
            .json(msg)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                interface = %msg.interface,
                id = msg.id,
                status = status.as_u16(),
                "CAN bridge rejected frame"
            );
            return Err(BridgeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(interface = %msg.interface, id = msg.id, data = ?&msg.data[..], "Frame delivered");
        Ok(())
    }

    async fn interface_status(&self, interface: &str) -> Result<bool, BridgeError> {
        let status: InterfaceStatus = self
            .get_status(self.endpoint(&["api", "status", interface]))
            .await?;
        Ok(status.active)
    }

    async fn all_interface_statuses(&self) -> Result<HashMap<String, bool>, BridgeError> {
        self.get_status(self.endpoint(&["api", "status"])).await
    }

    fn service_url(&self) -> &str {
        &self.service_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubBridge;
    use bytes::Bytes;

    fn frame() -> RawMessage {
        RawMessage {
            interface: "can0".into(),
            id: 0x27,
            data: Bytes::from_static(&[0x01, 64, 64, 64, 64, 64, 64]),
        }
    }

    #[tokio::test]
    async fn test_send_message_posts_json() {
        let bridge = StubBridge::spawn().await;
        let client = HttpBridgeClient::new(bridge.url()).expect("client");

        client.send_message(&frame()).await.expect("send failed");

        let received = bridge.received().await;
        assert_eq!(received, vec![frame()]);
    }

    #[tokio::test]
    async fn test_send_message_rejected() {
        let bridge = StubBridge::spawn().await;
        bridge.set_reject(true).await;
        let client = HttpBridgeClient::new(bridge.url()).expect("client");

        let result = client.send_message(&frame()).await;
        assert!(matches!(result, Err(BridgeError::Rejected { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_send_message_unavailable() {
        // Nothing listens on port 9 locally
        let client = HttpBridgeClient::new("http://127.0.0.1:9").expect("client");
        let result = client.send_message(&frame()).await;
        assert!(matches!(result, Err(BridgeError::Unavailable(_))));
        assert!(!client.is_connected().await);
    }

    #[tokio::test]
    async fn test_interface_statuses() {
        let bridge = StubBridge::spawn().await;
        let client = HttpBridgeClient::new(format!("{}/", bridge.url())).expect("client");

        let statuses = client.all_interface_statuses().await.expect("statuses");
        assert_eq!(statuses.get("can0"), Some(&true));
        assert_eq!(statuses.get("can1"), Some(&false));

        assert!(client.interface_status("can0").await.expect("status"));
        assert!(!client.interface_status("can1").await.expect("status"));
        assert!(client.is_connected().await);
    }

    #[test]
    fn test_interface_name_is_one_path_segment() {
        let client = HttpBridgeClient::new("http://bridge:5260/").expect("client");
        assert_eq!(
            client.endpoint(&["api", "status", "vcan 0/1"]).as_str(),
            "http://bridge:5260/api/status/vcan%200%2F1"
        );
        assert_eq!(client.endpoint(&["api", "can"]).as_str(), "http://bridge:5260/api/can");
    }

    #[tokio::test]
    async fn test_interface_status_does_not_traverse_paths() {
        let bridge = StubBridge::spawn().await;
        let client = HttpBridgeClient::new(bridge.url()).expect("client");

        // Unescaped this would resolve to /api/status/can1
        let result = client.interface_status("can0/../can1").await;
        assert!(matches!(result, Err(BridgeError::Rejected { status: 404, .. })));
    }

    #[test]
    fn test_invalid_service_url() {
        assert!(matches!(
            HttpBridgeClient::new("not a url"),
            Err(BridgeError::Unavailable(_))
        ));
    }

    #[test]
    fn test_service_url_trailing_slash_trimmed() {
        let client = HttpBridgeClient::new("http://bridge:5260/").expect("client");
        assert_eq!(client.service_url(), "http://bridge:5260");
    }
}
