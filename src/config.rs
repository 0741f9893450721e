//! Controller configuration
//!
//! Devices are built from an open key/value bag at the factory boundary; each
//! model deserializes and validates its own typed config from it.

use serde_json::{Map, Value};
use tracing::warn;

/// Open key/value configuration handed to device constructors
pub type ConfigBag = Map<String, Value>;

/// Legacy spellings of `endpoint` and `interface`; the bag always carries the
/// canonical keys, so these would be duplicates
const SUPERSEDED_KEYS: [&str; 2] = ["can_service_url", "can_interface"];

/// Per-device configuration used by the composition root
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Unique device id
    pub id: String,
    /// Model tag registered with the factory, e.g. "L10"
    pub model: String,
    /// CAN interface on the bridge
    pub interface: String,
    /// Extra model-specific parameters merged into the bag
    pub parameters: ConfigBag,
}

impl DeviceConfig {
    /// Build the constructor bag for this device
    pub fn to_bag(&self, can_service_url: &str) -> ConfigBag {
        let mut bag = ConfigBag::new();
        bag.insert("id".into(), Value::String(self.id.clone()));
        bag.insert("endpoint".into(), Value::String(can_service_url.to_string()));
        bag.insert("interface".into(), Value::String(self.interface.clone()));
        for (key, value) in &self.parameters {
            if SUPERSEDED_KEYS.contains(&key.as_str()) {
                warn!(device = %self.id, key = %key, "Ignoring legacy parameter, set by the controller config");
                continue;
            }
            bag.insert(key.clone(), value.clone());
        }
        bag
    }
}

/// Configuration for the controller process
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// CAN bridge base URL
    pub can_service_url: String,
    /// Devices to create at startup
    pub devices: Vec<DeviceConfig>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let mut parameters = ConfigBag::new();
        parameters.insert("hand_type".into(), Value::String("right".into()));

        Self {
            can_service_url: "http://127.0.0.1:5260".into(),
            devices: vec![DeviceConfig {
                id: "hand0".into(),
                model: "L10".into(),
                interface: "can0".into(),
                parameters,
            }],
        }
    }
}

impl ControllerConfig {
    /// Defaults overridden by `CAN_SERVICE_URL`, `DEFAULT_INTERFACE` and `HAND_TYPE`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from any key lookup (environment, tests)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CAN_SERVICE_URL").filter(|v| !v.is_empty()) {
            self.can_service_url = url;
        }
        if let Some(interface) = lookup("DEFAULT_INTERFACE").filter(|v| !v.is_empty()) {
            for device in &mut self.devices {
                device.interface = interface.clone();
            }
        }
        if let Some(hand_type) = lookup("HAND_TYPE").filter(|v| !v.is_empty()) {
            for device in &mut self.devices {
                device
                    .parameters
                    .insert("hand_type".into(), Value::String(hand_type.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::L10Config;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.can_service_url, "http://127.0.0.1:5260");
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.devices[0].model, "L10");
    }

    #[test]
    fn test_overrides() {
        let mut config = ControllerConfig::default();
        config.apply_overrides(|key| match key {
            "CAN_SERVICE_URL" => Some("http://bridge:9000".into()),
            "DEFAULT_INTERFACE" => Some("vcan0".into()),
            "HAND_TYPE" => Some("left".into()),
            _ => None,
        });

        assert_eq!(config.can_service_url, "http://bridge:9000");
        assert_eq!(config.devices[0].interface, "vcan0");
        assert_eq!(config.devices[0].parameters["hand_type"], "left");
    }

    #[test]
    fn test_empty_override_ignored() {
        let mut config = ControllerConfig::default();
        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.can_service_url, "http://127.0.0.1:5260");
    }

    #[test]
    fn test_device_bag_drops_legacy_aliases() {
        let mut config = ControllerConfig::default();
        let device = &mut config.devices[0];
        device
            .parameters
            .insert("can_service_url".into(), Value::String("http://elsewhere:1".into()));
        device
            .parameters
            .insert("can_interface".into(), Value::String("can9".into()));

        let bag = config.devices[0].to_bag(&config.can_service_url);
        assert!(!bag.contains_key("can_service_url"));
        assert!(!bag.contains_key("can_interface"));

        let l10 = L10Config::from_bag(&bag).expect("bag accepted");
        assert_eq!(l10.endpoint, "http://127.0.0.1:5260");
        assert_eq!(l10.interface, "can0");
    }

    #[test]
    fn test_device_bag() {
        let config = ControllerConfig::default();
        let bag = config.devices[0].to_bag(&config.can_service_url);

        assert_eq!(bag["id"], "hand0");
        assert_eq!(bag["endpoint"], "http://127.0.0.1:5260");
        assert_eq!(bag["interface"], "can0");
        assert_eq!(bag["hand_type"], "right");
    }
}
