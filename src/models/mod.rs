//! Hand models
//!
//! Each model supplies its typed config, command encoder, presets and
//! animations, and registers a constructor with the [`DeviceFactory`].

mod l10;
mod l10_animation;
mod l10_presets;

pub use l10::{L10Config, L10Encoder, L10Hand};
pub use l10_animation::{SwayAnimation, WaveAnimation};

use std::sync::Arc;

use crate::config::ConfigBag;
use crate::device::{Device, DeviceFactory};

/// Register every built-in model with `factory`
pub fn register_device_types(factory: &mut DeviceFactory) {
    factory.register(l10::MODEL, |config: &ConfigBag| {
        let hand = L10Hand::from_config(config)?;
        Ok(Arc::new(hand) as Arc<dyn Device>)
    });
}
