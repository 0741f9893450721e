//! Simulated fingertip pressure sensor
//!
//! Readings are synthetic and stand in for values that would come from the
//! bridge once tactile frames are relayed.

use rand::Rng;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::{Component, ComponentType, Sensor, SensorData};
use crate::config::ConfigBag;
use crate::error::{HandError, Result};

pub const DEFAULT_SAMPLING_RATE_HZ: u32 = 100;
pub const MAX_SAMPLING_RATE_HZ: u32 = 1000;

/// Pressure sensor attached to one finger
pub struct PressureSensor {
    id: String,
    config: ConfigBag,
    active: AtomicBool,
    sampling_rate: AtomicU32,
}

impl PressureSensor {
    pub fn new(id: impl Into<String>, config: ConfigBag) -> Self {
        Self {
            id: id.into(),
            config,
            active: AtomicBool::new(true),
            sampling_rate: AtomicU32::new(DEFAULT_SAMPLING_RATE_HZ),
        }
    }

    /// Sensor mounted at a named finger location
    pub fn at_location(id: impl Into<String>, location: &str) -> Self {
        let mut config = Map::new();
        config.insert("location".into(), Value::String(location.into()));
        Self::new(id, config)
    }
}

impl Component for PressureSensor {
    fn id(&self) -> &str {
        &self.id
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::Sensor
    }

    fn configuration(&self) -> &ConfigBag {
        &self.config
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn as_sensor(&self) -> Option<&dyn Sensor> {
        Some(self)
    }
}

impl Sensor for PressureSensor {
    fn read_data(&self) -> Result<SensorData> {
        if !self.is_active() {
            return Err(HandError::SensorInactive(self.id.clone()));
        }

        let pressure: f64 = rand::thread_rng().gen_range(0.0..100.0);

        let mut values = Map::new();
        values.insert("pressure".into(), json!(pressure));
        values.insert("unit".into(), json!("kPa"));
        values.insert(
            "location".into(),
            self.config.get("location").cloned().unwrap_or(Value::Null),
        );

        Ok(SensorData::new(self.id.clone(), values))
    }

    fn data_type(&self) -> &str {
        "pressure"
    }

    fn sampling_rate(&self) -> u32 {
        self.sampling_rate.load(Ordering::Acquire)
    }

    fn set_sampling_rate(&self, hz: u32) -> Result<()> {
        if hz == 0 || hz > MAX_SAMPLING_RATE_HZ {
            return Err(HandError::InvalidSamplingRate(hz));
        }
        self.sampling_rate.store(hz, Ordering::Release);
        Ok(())
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }
}
