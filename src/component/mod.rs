//! Pluggable device components
//!
//! A device owns a set of components grouped by [`ComponentType`]. Components
//! that can be sampled expose the [`Sensor`] capability through
//! [`Component::as_sensor`].

mod pressure;

pub use pressure::PressureSensor;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ConfigBag;
use crate::error::Result;

/// Component categories a device can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Sensor,
    Skin,
    Actuator,
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentType::Sensor => write!(f, "sensor"),
            ComponentType::Skin => write!(f, "skin"),
            ComponentType::Actuator => write!(f, "actuator"),
        }
    }
}

/// A pluggable sub-unit of a device
pub trait Component: Send + Sync {
    fn id(&self) -> &str;

    fn component_type(&self) -> ComponentType;

    /// Component-specific settings, e.g. `{"location": "thumb"}`
    fn configuration(&self) -> &ConfigBag;

    fn is_active(&self) -> bool;

    /// Sensor capability, if this component can be sampled
    fn as_sensor(&self) -> Option<&dyn Sensor> {
        None
    }
}

/// A component that produces timestamped readings
pub trait Sensor: Component {
    /// Take one reading. Fails with `SensorInactive` when deactivated.
    fn read_data(&self) -> Result<SensorData>;

    /// Kind of quantity measured, e.g. "pressure"
    fn data_type(&self) -> &str;

    /// Sampling rate in Hz
    fn sampling_rate(&self) -> u32;

    /// Change the sampling rate; accepted range is 1-1000 Hz
    fn set_sampling_rate(&self, hz: u32) -> Result<()>;

    fn set_active(&self, active: bool);
}

/// One reading from a sensor
#[derive(Debug, Clone, Serialize)]
pub struct SensorData {
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    pub values: Map<String, Value>,
}

impl SensorData {
    pub fn new(sensor_id: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp: Utc::now(),
            values,
        }
    }
}
