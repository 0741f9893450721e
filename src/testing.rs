//! Test doubles shared by unit tests

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use hands_shared::{FingerPose, HandType, PalmPose, RawMessage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::communication::{BridgeError, Communicator};
use crate::config::ConfigBag;
use crate::device::PoseExecutor;
use crate::error::Result;

/// Poll `condition` until it holds, panicking after two seconds
pub(crate) async fn wait_until<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not met within 2s");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Minimal valid L10 config bag
pub(crate) fn l10_bag(id: &str) -> ConfigBag {
    json!({"id": id, "endpoint": "http://127.0.0.1:5260", "interface": "can0"})
        .as_object()
        .cloned()
        .unwrap_or_default()
}

fn bridge_statuses() -> HashMap<String, bool> {
    HashMap::from([("can0".to_string(), true), ("can1".to_string(), false)])
}

/// In-memory communicator recording every frame it is asked to send
#[derive(Default)]
pub(crate) struct RecordingCommunicator {
    sent: Mutex<Vec<RawMessage>>,
    calls: AtomicUsize,
    failure: Mutex<Option<BridgeError>>,
}

impl RecordingCommunicator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail with `error`
    pub(crate) fn fail_with(&self, error: BridgeError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Frames delivered successfully
    pub(crate) fn sent(&self) -> Vec<RawMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Send attempts, successful or not
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Communicator for RecordingCommunicator {
    async fn send_message(&self, msg: &RawMessage) -> Result<(), BridgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.sent.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn interface_status(&self, interface: &str) -> Result<bool, BridgeError> {
        Ok(bridge_statuses().get(interface).copied().unwrap_or(false))
    }

    async fn all_interface_statuses(&self) -> Result<HashMap<String, bool>, BridgeError> {
        Ok(bridge_statuses())
    }

    fn service_url(&self) -> &str {
        "memory://"
    }
}

/// Pose executor that only counts what it is told to do
pub(crate) struct CountingExecutor {
    id: String,
    fingers: Mutex<Vec<FingerPose>>,
    palms: Mutex<Vec<PalmPose>>,
    resets: AtomicUsize,
}

impl CountingExecutor {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fingers: Mutex::new(Vec::new()),
            palms: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
        }
    }

    pub(crate) fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub(crate) fn finger_poses(&self) -> Vec<FingerPose> {
        self.fingers.lock().unwrap().clone()
    }

    pub(crate) fn palm_poses(&self) -> Vec<PalmPose> {
        self.palms.lock().unwrap().clone()
    }
}

#[async_trait]
impl PoseExecutor for CountingExecutor {
    async fn set_finger_pose(&self, pose: FingerPose) -> Result<()> {
        self.fingers.lock().unwrap().push(pose);
        Ok(())
    }

    async fn set_palm_pose(&self, pose: PalmPose) -> Result<()> {
        self.palms.lock().unwrap().push(pose);
        Ok(())
    }

    async fn reset_pose(&self) -> Result<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn hand_type(&self) -> HandType {
        HandType::Right
    }

    fn executor_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

#[derive(Default)]
struct StubState {
    received: tokio::sync::Mutex<Vec<RawMessage>>,
    reject: AtomicBool,
}

/// Local HTTP server speaking the CAN bridge API
pub(crate) struct StubBridge {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubBridge {
    pub(crate) async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/api/can", post(ingest))
            .route("/api/status", get(all_statuses))
            .route("/api/status/{interface}", get(one_status))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub bridge");
        let addr = listener.local_addr().expect("stub bridge address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) async fn received(&self) -> Vec<RawMessage> {
        self.state.received.lock().await.clone()
    }

    /// Answer every frame with a 500 while set
    pub(crate) async fn set_reject(&self, reject: bool) {
        self.state.reject.store(reject, Ordering::SeqCst);
    }
}

async fn ingest(State(state): State<Arc<StubState>>, Json(msg): Json<RawMessage>) -> StatusCode {
    if state.reject.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.received.lock().await.push(msg);
    StatusCode::OK
}

async fn all_statuses() -> Json<HashMap<String, bool>> {
    Json(bridge_statuses())
}

async fn one_status(Path(interface): Path<String>) -> std::result::Result<Json<Value>, StatusCode> {
    bridge_statuses()
        .get(&interface)
        .map(|active| Json(json!({ "active": active })))
        .ok_or(StatusCode::NOT_FOUND)
}
