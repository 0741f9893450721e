//! L10 dexterous hand
//!
//! Wire format (CAN id = hand side, 0x27 right / 0x28 left):
//! ```text
//! finger pose:  [0x01][6 bytes]
//! palm pose:    [0x04][4 bytes]
//! joint speeds: [0x05][5 bytes]
//! ```

use async_trait::async_trait;
use hands_shared::{
    codec, wire, Command, EncodeError, FingerPose, HandType, JointSpeeds, PalmPose, RawMessage,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::l10_animation::{SwayAnimation, WaveAnimation};
use super::l10_presets;
use crate::communication::{Communicator, HttpBridgeClient};
use crate::component::{Component, ComponentType, PressureSensor, Sensor, SensorData};
use crate::config::ConfigBag;
use crate::device::{
    AnimationEngine, CommandEncoder, Device, DeviceCore, DeviceStatus, PoseExecutor, PoseProfile,
    PresetManager,
};
use crate::error::{HandError, Result};

pub const MODEL: &str = "L10";

pub const FINGER_OPCODE: u8 = 0x01;
pub const PALM_OPCODE: u8 = 0x04;
pub const JOINT_SPEED_OPCODE: u8 = 0x05;

const FINGER_NOISE: u8 = 5;
const PALM_NOISE: u8 = 8;
const SPEED_NOISE: u8 = 3;

fn default_interface() -> String {
    "can0".into()
}

/// Typed L10 configuration, deserialized from the factory bag
#[derive(Debug, Clone, Deserialize)]
pub struct L10Config {
    pub id: String,
    /// CAN bridge base URL
    #[serde(alias = "can_service_url")]
    pub endpoint: String,
    #[serde(default = "default_interface", alias = "can_interface")]
    pub interface: String,
    /// "left" or "right"; right when absent
    #[serde(default)]
    pub hand_type: Option<String>,
}

impl L10Config {
    pub fn from_bag(bag: &ConfigBag) -> Result<Self> {
        let config: Self = serde_json::from_value(Value::Object(bag.clone()))
            .map_err(|e| HandError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(HandError::Configuration("device id must not be empty".into()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(HandError::Configuration(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.interface.trim().is_empty() {
            return Err(HandError::Configuration("interface must not be empty".into()));
        }
        self.hand_type().map(|_| ())
    }

    pub fn hand_type(&self) -> Result<HandType> {
        match self.hand_type.as_deref() {
            None => Ok(HandType::Right),
            Some(name) => match HandType::parse(name) {
                HandType::Unknown => Err(HandError::Configuration(format!(
                    "hand_type must be \"left\" or \"right\", got {:?}",
                    name
                ))),
                hand_type => Ok(hand_type),
            },
        }
    }
}

/// L10 command encoder
#[derive(Debug, Default, Clone, Copy)]
pub struct L10Encoder;

impl CommandEncoder for L10Encoder {
    fn encode(
        &self,
        command: &Command,
        hand_type: HandType,
        interface: &str,
    ) -> Result<RawMessage, EncodeError> {
        let payload = command.payload();
        let data = match command.command_type() {
            wire::SET_FINGER_POSE => {
                codec::frame_pose::<{ wire::FINGER_POSE_LEN }>(FINGER_OPCODE, payload)?
            }
            wire::SET_PALM_POSE => codec::frame_pose::<{ wire::PALM_POSE_LEN }>(PALM_OPCODE, payload)?,
            wire::SET_JOINT_SPEEDS => {
                codec::frame_pose::<{ wire::JOINT_SPEED_LEN }>(JOINT_SPEED_OPCODE, payload)?
            }
            other => return Err(EncodeError::UnsupportedCommand(other.to_string())),
        };

        Ok(RawMessage {
            interface: interface.to_string(),
            id: hand_type.can_id(),
            data,
        })
    }
}

fn profile() -> PoseProfile {
    PoseProfile {
        finger_noise: FINGER_NOISE,
        palm_noise: PALM_NOISE,
        neutral_finger: [0x40; 6],
        neutral_palm: [0x80; 4],
        reset_settle: Duration::from_millis(20),
    }
}

/// L10 hand: six finger channels, four palm channels, five pressure sensors
pub struct L10Hand {
    core: Arc<DeviceCore>,
    engine: AnimationEngine,
    presets: PresetManager,
    components: HashMap<ComponentType, Vec<Arc<dyn Component>>>,
}

impl L10Hand {
    /// Build a hand talking to the HTTP bridge named in the config
    pub fn from_config(bag: &ConfigBag) -> Result<Self> {
        let config = L10Config::from_bag(bag)?;
        let communicator = HttpBridgeClient::new(config.endpoint.clone())
            .map_err(|e| HandError::Configuration(e.to_string()))?;
        Self::build(config, Arc::new(communicator))
    }

    /// Build a hand on a caller-supplied transport
    pub fn with_communicator(bag: &ConfigBag, communicator: Arc<dyn Communicator>) -> Result<Self> {
        Self::build(L10Config::from_bag(bag)?, communicator)
    }

    fn build(config: L10Config, communicator: Arc<dyn Communicator>) -> Result<Self> {
        let hand_type = config.hand_type()?;
        let core = Arc::new(DeviceCore::new(
            config.id.clone(),
            MODEL,
            config.interface.clone(),
            hand_type,
            communicator,
            Box::new(L10Encoder),
            profile(),
        ));

        let engine = AnimationEngine::new(core.clone())
            .with_animation(Arc::new(WaveAnimation))
            .with_animation(Arc::new(SwayAnimation));

        let presets = l10_presets::presets().into_iter().collect();

        let sensors: Vec<Arc<dyn Component>> = ["thumb", "index", "middle", "ring", "pinky"]
            .into_iter()
            .map(|finger| {
                Arc::new(PressureSensor::at_location(format!("pressure_{}", finger), finger))
                    as Arc<dyn Component>
            })
            .collect();
        let mut components = HashMap::new();
        components.insert(ComponentType::Sensor, sensors);

        info!(device = %config.id, hand = %hand_type, interface = %config.interface, "L10 hand created");

        Ok(Self {
            core,
            engine,
            presets,
            components,
        })
    }

    /// Send per-finger joint speeds
    pub async fn set_joint_speeds(&self, speeds: JointSpeeds) -> Result<()> {
        let perturbed = codec::perturb_pose(&speeds, SPEED_NOISE);
        let msg = self.core.execute_command(&Command::joint_speeds(perturbed)).await?;
        info!(device = %self.core.id(), id = msg.id, speeds = ?perturbed, "Joint speeds sent");
        Ok(())
    }
}

#[async_trait]
impl PoseExecutor for L10Hand {
    async fn set_finger_pose(&self, pose: FingerPose) -> Result<()> {
        self.core.set_finger_pose(pose).await
    }

    async fn set_palm_pose(&self, pose: PalmPose) -> Result<()> {
        self.core.set_palm_pose(pose).await
    }

    async fn reset_pose(&self) -> Result<()> {
        self.core.reset_pose().await
    }

    async fn hand_type(&self) -> HandType {
        self.core.hand_type().await
    }

    fn executor_id(&self) -> Option<&str> {
        Some(self.core.id())
    }
}

#[async_trait]
impl Device for L10Hand {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn model(&self) -> &str {
        self.core.model()
    }

    async fn set_hand_type(&self, hand_type: HandType) -> Result<()> {
        self.core.set_hand_type(hand_type).await
    }

    async fn execute_command(&self, command: &Command) -> Result<()> {
        self.core.execute_command(command).await.map(|_| ())
    }

    async fn read_sensor_data(&self, sensor_id: &str) -> Result<SensorData> {
        self.components
            .get(&ComponentType::Sensor)
            .into_iter()
            .flatten()
            .filter(|c| c.id() == sensor_id)
            .find_map(|c| c.as_sensor())
            .ok_or_else(|| HandError::SensorNotFound(sensor_id.to_string()))?
            .read_data()
    }

    fn components(&self, component_type: ComponentType) -> Vec<Arc<dyn Component>> {
        self.components
            .get(&component_type)
            .cloned()
            .unwrap_or_default()
    }

    async fn status(&self) -> Result<DeviceStatus> {
        Ok(self.core.status().await)
    }

    async fn connect(&self) -> Result<()> {
        self.core.connect().await
    }

    async fn disconnect(&self) -> Result<()> {
        self.core.disconnect().await
    }

    fn animation_engine(&self) -> &AnimationEngine {
        &self.engine
    }

    fn supported_presets(&self) -> Vec<String> {
        self.presets.supported_presets()
    }

    async fn execute_preset(&self, name: &str) -> Result<()> {
        let preset = self
            .presets
            .get(name)
            .ok_or_else(|| HandError::PresetNotFound(name.to_string()))?;

        info!(device = %self.core.id(), preset = name, "Executing preset");
        self.core.set_finger_pose(preset.finger_pose).await?;
        if let Some(palm) = preset.palm_pose {
            self.core.set_palm_pose(palm).await?;
        }
        Ok(())
    }

    fn preset_description(&self, name: &str) -> Option<String> {
        self.presets.description(name)
    }
}
