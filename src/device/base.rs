//! Shared device state and command execution
//!
//! `DeviceCore` holds everything a hand model has in common: identity, hand
//! side, connection status, the bridge communicator and the model's encoder.
//! Models compose it and supply a [`CommandEncoder`] and a [`PoseProfile`].

use async_trait::async_trait;
use chrono::Utc;
use hands_shared::{codec, Command, EncodeError, FingerPose, HandType, PalmPose, RawMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::{DeviceStatus, PoseExecutor};
use crate::communication::Communicator;
use crate::error::{HandError, Result};

/// Translates abstract commands into model-specific wire messages
pub trait CommandEncoder: Send + Sync {
    /// Encode `command` for a hand currently mounted as `hand_type`
    fn encode(
        &self,
        command: &Command,
        hand_type: HandType,
        interface: &str,
    ) -> Result<RawMessage, EncodeError>;
}

/// Model-specific pose behaviour
#[derive(Debug, Clone)]
pub struct PoseProfile {
    /// Max per-channel perturbation applied to finger poses
    pub finger_noise: u8,
    /// Max per-channel perturbation applied to palm poses
    pub palm_noise: u8,
    pub neutral_finger: FingerPose,
    pub neutral_palm: PalmPose,
    /// Pause between the finger and palm halves of a reset
    pub reset_settle: Duration,
}

/// State and transport shared by every hand model
pub struct DeviceCore {
    id: String,
    model: String,
    interface: String,
    hand_type: RwLock<HandType>,
    status: RwLock<DeviceStatus>,
    communicator: Arc<dyn Communicator>,
    encoder: Box<dyn CommandEncoder>,
    profile: PoseProfile,
}

impl DeviceCore {
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        interface: impl Into<String>,
        hand_type: HandType,
        communicator: Arc<dyn Communicator>,
        encoder: Box<dyn CommandEncoder>,
        profile: PoseProfile,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            interface: interface.into(),
            hand_type: RwLock::new(hand_type),
            status: RwLock::new(DeviceStatus::default()),
            communicator,
            encoder,
            profile,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn set_hand_type(&self, hand_type: HandType) -> Result<()> {
        if hand_type == HandType::Unknown {
            return Err(HandError::InvalidHandType(hand_type.to_string()));
        }
        *self.hand_type.write().await = hand_type;
        info!(device = %self.id, hand = %hand_type, "Hand type updated");
        Ok(())
    }

    pub async fn status(&self) -> DeviceStatus {
        self.status.read().await.clone()
    }

    pub async fn connect(&self) -> Result<()> {
        let mut status = self.status.write().await;
        status.is_connected = true;
        status.is_active = true;
        status.last_update = Utc::now();
        info!(device = %self.id, interface = %self.interface, "Device connected");
        Ok(())
    }

    pub async fn disconnect(&self) -> Result<()> {
        let mut status = self.status.write().await;
        status.is_connected = false;
        status.is_active = false;
        status.last_update = Utc::now();
        info!(device = %self.id, "Device disconnected");
        Ok(())
    }

    /// Encode and deliver a command, returning the frame that was sent
    ///
    /// The CAN id is derived from the hand side at the moment of encoding.
    /// No lock is held while the bridge call is in flight.
    pub async fn execute_command(&self, command: &Command) -> Result<RawMessage> {
        {
            let status = self.status.read().await;
            if !status.is_connected || !status.is_active {
                return Err(HandError::DeviceNotReady(self.id.clone()));
            }
        }

        let hand_type = *self.hand_type.read().await;
        let msg = match self.encoder.encode(command, hand_type, &self.interface) {
            Ok(msg) => msg,
            Err(e) => {
                self.record_error(e.to_string()).await;
                warn!(device = %self.id, command = command.command_type(), error = %e, "Failed to encode command");
                return Err(e.into());
            }
        };

        if let Err(e) = self.communicator.send_message(&msg).await {
            self.record_error(e.to_string()).await;
            error!(
                device = %self.id,
                hand = %hand_type,
                id = msg.id,
                data = ?&msg.data[..],
                error = %e,
                "Failed to send command"
            );
            return Err(e.into());
        }

        self.status.write().await.last_update = Utc::now();
        Ok(msg)
    }

    async fn record_error(&self, message: String) {
        let mut status = self.status.write().await;
        status.error_count += 1;
        status.last_error = Some(message);
    }
}

#[async_trait]
impl PoseExecutor for DeviceCore {
    async fn set_finger_pose(&self, pose: FingerPose) -> Result<()> {
        let perturbed = codec::perturb_pose(&pose, self.profile.finger_noise);
        let msg = self.execute_command(&Command::finger_pose(perturbed)).await?;
        info!(device = %self.id, id = msg.id, pose = ?perturbed, "Finger pose sent");
        Ok(())
    }

    async fn set_palm_pose(&self, pose: PalmPose) -> Result<()> {
        let perturbed = codec::perturb_pose(&pose, self.profile.palm_noise);
        let msg = self.execute_command(&Command::palm_pose(perturbed)).await?;
        info!(device = %self.id, id = msg.id, pose = ?perturbed, "Palm pose sent");
        Ok(())
    }

    async fn reset_pose(&self) -> Result<()> {
        info!(device = %self.id, "Resetting to neutral pose");
        self.set_finger_pose(self.profile.neutral_finger).await?;
        tokio::time::sleep(self.profile.reset_settle).await;
        self.set_palm_pose(self.profile.neutral_palm).await?;
        Ok(())
    }

    async fn hand_type(&self) -> HandType {
        *self.hand_type.read().await
    }

    fn executor_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}
