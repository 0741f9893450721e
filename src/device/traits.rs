//! Device and pose execution surfaces

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hands_shared::{Command, FingerPose, HandType, PalmPose};
use serde::Serialize;
use std::sync::Arc;

use super::AnimationEngine;
use crate::component::{Component, ComponentType, SensorData};
use crate::error::Result;

/// Ability to drive the hand into a pose
///
/// Animations only ever see this surface.
#[async_trait]
pub trait PoseExecutor: Send + Sync {
    /// Send a six channel finger pose
    async fn set_finger_pose(&self, pose: FingerPose) -> Result<()>;

    /// Send a four channel palm pose
    async fn set_palm_pose(&self, pose: PalmPose) -> Result<()>;

    /// Return to the neutral pose
    async fn reset_pose(&self) -> Result<()>;

    async fn hand_type(&self) -> HandType;

    /// Identity used to label log output, for executors that have one
    fn executor_id(&self) -> Option<&str> {
        None
    }
}

/// Snapshot of a device's connection and error state
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatus {
    pub is_connected: bool,
    pub is_active: bool,
    pub last_update: DateTime<Utc>,
    pub error_count: u32,
    pub last_error: Option<String>,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            is_connected: false,
            is_active: false,
            last_update: Utc::now(),
            error_count: 0,
            last_error: None,
        }
    }
}

/// A controllable hand
#[async_trait]
pub trait Device: PoseExecutor {
    fn id(&self) -> &str;

    /// Model tag, e.g. "L10"
    fn model(&self) -> &str;

    /// Change the hand side; the next encoded message uses the new CAN id
    async fn set_hand_type(&self, hand_type: HandType) -> Result<()>;

    /// Encode and send one command. Requires the device to be connected and active.
    async fn execute_command(&self, command: &Command) -> Result<()>;

    async fn read_sensor_data(&self, sensor_id: &str) -> Result<SensorData>;

    fn components(&self, component_type: ComponentType) -> Vec<Arc<dyn Component>>;

    async fn status(&self) -> Result<DeviceStatus>;

    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    fn animation_engine(&self) -> &AnimationEngine;

    fn supported_presets(&self) -> Vec<String>;

    async fn execute_preset(&self, name: &str) -> Result<()>;

    fn preset_description(&self, name: &str) -> Option<String>;
}
