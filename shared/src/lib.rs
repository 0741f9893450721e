//! Dexterous Hand Shared Wire Types
//!
//! This crate provides the wire-level types and payload codec shared by every
//! hand model: the abstract [`Command`] issued by callers, the concrete
//! [`RawMessage`] relayed to the CAN bridge, and the hand-side identifiers.

pub mod codec;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use codec::EncodeError;

/// Wire-level limits and command type tags
pub mod wire {
    /// Maximum CAN frame payload accepted by the bridge
    pub const MAX_PAYLOAD_LEN: usize = 8;

    /// Finger group channel count
    pub const FINGER_POSE_LEN: usize = 6;

    /// Palm group channel count
    pub const PALM_POSE_LEN: usize = 4;

    /// One speed byte per finger
    pub const JOINT_SPEED_LEN: usize = 5;

    pub const SET_FINGER_POSE: &str = "SetFingerPose";
    pub const SET_PALM_POSE: &str = "SetPalmPose";
    pub const SET_JOINT_SPEEDS: &str = "SetJointSpeeds";
}

/// Six finger channel positions
pub type FingerPose = [u8; wire::FINGER_POSE_LEN];

/// Four palm degrees of freedom
pub type PalmPose = [u8; wire::PALM_POSE_LEN];

/// Per-finger joint speeds
pub type JointSpeeds = [u8; wire::JOINT_SPEED_LEN];

/// Which hand a device is mounted as. Determines the CAN id on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandType {
    Left,
    #[default]
    Right,
    Unknown,
}

impl HandType {
    /// CAN id used for messages addressed to this hand
    pub fn can_id(self) -> u32 {
        match self {
            HandType::Left => 0x28,
            HandType::Right => 0x27,
            HandType::Unknown => 0x00,
        }
    }

    /// Parse a loose hand name; anything unrecognised is `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => HandType::Left,
            "right" => HandType::Right,
            _ => HandType::Unknown,
        }
    }
}

impl std::fmt::Display for HandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandType::Left => write!(f, "left"),
            HandType::Right => write!(f, "right"),
            HandType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A frame as accepted by the CAN bridge ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Target CAN interface, e.g. "can0"
    pub interface: String,
    /// CAN frame id
    pub id: u32,
    /// Frame payload, at most [`wire::MAX_PAYLOAD_LEN`] bytes
    #[serde(with = "codec::base64_bytes")]
    pub data: Bytes,
}

/// An abstract device command, encoded per model into a [`RawMessage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetFingerPose { pose: FingerPose, target: String },
    SetPalmPose { pose: PalmPose },
    SetJointSpeeds { speeds: JointSpeeds },
    /// Free-form command; the model encoder decides whether it understands `cmd_type`
    Generic {
        cmd_type: String,
        payload: Bytes,
        target: String,
    },
}

impl Command {
    /// Finger pose addressed to the whole finger group
    pub fn finger_pose(pose: FingerPose) -> Self {
        Command::SetFingerPose {
            pose,
            target: "finger_all".to_string(),
        }
    }

    pub fn palm_pose(pose: PalmPose) -> Self {
        Command::SetPalmPose { pose }
    }

    pub fn joint_speeds(speeds: JointSpeeds) -> Self {
        Command::SetJointSpeeds { speeds }
    }

    pub fn generic(
        cmd_type: impl Into<String>,
        payload: impl Into<Bytes>,
        target: impl Into<String>,
    ) -> Self {
        Command::Generic {
            cmd_type: cmd_type.into(),
            payload: payload.into(),
            target: target.into(),
        }
    }

    /// Type tag, e.g. "SetFingerPose"
    pub fn command_type(&self) -> &str {
        match self {
            Command::SetFingerPose { .. } => wire::SET_FINGER_POSE,
            Command::SetPalmPose { .. } => wire::SET_PALM_POSE,
            Command::SetJointSpeeds { .. } => wire::SET_JOINT_SPEEDS,
            Command::Generic { cmd_type, .. } => cmd_type,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Command::SetFingerPose { pose, .. } => pose,
            Command::SetPalmPose { pose } => pose,
            Command::SetJointSpeeds { speeds } => speeds,
            Command::Generic { payload, .. } => payload,
        }
    }

    pub fn target_component(&self) -> &str {
        match self {
            Command::SetFingerPose { target, .. } => target,
            Command::SetPalmPose { .. } => "palm",
            Command::SetJointSpeeds { .. } => "joints",
            Command::Generic { target, .. } => target,
        }
    }
}
