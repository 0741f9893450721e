//! Error taxonomy for device operations

use hands_shared::EncodeError;
use thiserror::Error;

use crate::communication::BridgeError;

/// Errors surfaced by devices, the factory and the device manager
#[derive(Error, Debug)]
pub enum HandError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown device model: {0}")]
    UnknownModel(String),

    #[error("Device {0} is not connected or not active")]
    DeviceNotReady(String),

    #[error("Failed to encode command: {0}")]
    Encode(#[from] EncodeError),

    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),

    #[error("Sensor {0} is inactive")]
    SensorInactive(String),

    #[error("Sensor {0} not found")]
    SensorNotFound(String),

    #[error("Sampling rate {0} Hz out of range (1-1000 Hz)")]
    InvalidSamplingRate(u32),

    #[error("Animation {0} is not registered")]
    UnknownAnimation(String),

    #[error("Preset {0} not found")]
    PresetNotFound(String),

    #[error("Invalid hand type: {0}")]
    InvalidHandType(String),

    #[error("Device {0} already exists")]
    AlreadyExists(String),

    #[error("Device {0} not found")]
    NotFound(String),
}

pub type Result<T, E = HandError> = std::result::Result<T, E>;
