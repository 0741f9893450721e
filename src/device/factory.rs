//! Device factory keyed by model tag
//!
//! Owned by the composition root; constructors are registered once at startup.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::Device;
use crate::config::ConfigBag;
use crate::error::{HandError, Result};

/// Builds a device from an open configuration bag
pub type DeviceConstructor = Box<dyn Fn(&ConfigBag) -> Result<Arc<dyn Device>> + Send + Sync>;

/// Maps model tags to device constructors
#[derive(Default)]
pub struct DeviceFactory {
    constructors: HashMap<String, DeviceConstructor>,
}

impl DeviceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `model` with `constructor`, replacing any previous one
    pub fn register<F>(&mut self, model: impl Into<String>, constructor: F)
    where
        F: Fn(&ConfigBag) -> Result<Arc<dyn Device>> + Send + Sync + 'static,
    {
        let model = model.into();
        if self.constructors.contains_key(&model) {
            warn!(model = %model, "Device model already registered, replacing");
        }
        debug!(model = %model, "Device model registered");
        self.constructors.insert(model, Box::new(constructor));
    }

    /// Build a device of the given model
    pub fn create(&self, model: &str, config: &ConfigBag) -> Result<Arc<dyn Device>> {
        let constructor = self
            .constructors
            .get(model)
            .ok_or_else(|| HandError::UnknownModel(model.to_string()))?;
        constructor(config)
    }

    /// All registered model tags, sorted
    pub fn supported_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.constructors.keys().cloned().collect();
        models.sort();
        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::L10Hand;
    use crate::testing::RecordingCommunicator;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> ConfigBag {
        value.as_object().cloned().unwrap_or_default()
    }

    fn factory() -> DeviceFactory {
        let mut factory = DeviceFactory::new();
        factory.register("L10", |config: &ConfigBag| {
            let hand = L10Hand::with_communicator(config, Arc::new(RecordingCommunicator::new()))?;
            Ok(Arc::new(hand) as Arc<dyn Device>)
        });
        factory
    }

    #[test]
    fn test_create_registered_model() {
        let factory = factory();
        let device = factory
            .create("L10", &bag(json!({"id": "h1", "endpoint": "http://x"})))
            .expect("create failed");

        assert_eq!(device.id(), "h1");
        assert_eq!(device.model(), "L10");
    }

    #[test]
    fn test_create_unknown_model() {
        let factory = factory();
        let before = factory.supported_models();

        let result = factory.create("L20", &bag(json!({"id": "h1", "endpoint": "http://x"})));
        assert!(matches!(result, Err(HandError::UnknownModel(model)) if model == "L20"));
        assert_eq!(factory.supported_models(), before);
    }

    #[test]
    fn test_constructor_errors_propagate() {
        let factory = factory();
        let result = factory.create("L10", &bag(json!({"endpoint": "http://x"})));
        assert!(matches!(result, Err(HandError::Configuration(_))));
    }

    #[test]
    fn test_supported_models() {
        let mut factory = factory();
        factory.register("O7", |_: &ConfigBag| Err(HandError::Configuration("unsupported".into())));
        assert_eq!(factory.supported_models(), vec!["L10", "O7"]);
    }
}
