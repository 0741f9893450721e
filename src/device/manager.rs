//! Registry of live device instances

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::{Device, PoseExecutor};
use crate::error::{HandError, Result};

/// Holds the devices created at startup, keyed by id
#[derive(Default)]
pub struct DeviceManager {
    devices: RwLock<HashMap<String, Arc<dyn Device>>>,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device; fails if its id is already taken
    pub async fn register(&self, device: Arc<dyn Device>) -> Result<()> {
        let mut devices = self.devices.write().await;
        let id = device.id().to_string();
        if devices.contains_key(&id) {
            return Err(HandError::AlreadyExists(id));
        }
        info!(device = %id, model = device.model(), "Device registered");
        devices.insert(id, device);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Arc<dyn Device>> {
        self.devices
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| HandError::NotFound(id.to_string()))
    }

    /// All devices, ordered by id
    pub async fn all(&self) -> Vec<Arc<dyn Device>> {
        let devices = self.devices.read().await;
        let mut all: Vec<Arc<dyn Device>> = devices.values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    pub async fn remove(&self, id: &str) -> Result<Arc<dyn Device>> {
        self.devices
            .write()
            .await
            .remove(id)
            .ok_or_else(|| HandError::NotFound(id.to_string()))
    }

    /// Stop animations, return every device to neutral and disconnect it
    pub async fn shutdown(&self) {
        for device in self.all().await {
            let engine = device.animation_engine();
            if engine.is_running().await {
                // The stopped run resets the pose on its way out
                engine.stop_and_wait().await;
            } else if let Err(e) = device.reset_pose().await {
                warn!(device = %device.id(), error = %e, "Failed to reset pose on shutdown");
            }

            if let Err(e) = device.disconnect().await {
                error!(device = %device.id(), error = %e, "Failed to disconnect");
            }
        }
    }
}
