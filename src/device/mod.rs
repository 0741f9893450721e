//! Device abstraction for dexterous hands
//!
//! This module handles:
//! - The `Device` / `PoseExecutor` surfaces consumed by outer layers
//! - Connection state, command execution and error bookkeeping (`DeviceCore`)
//! - Repeating pose animations with race-free handoff (`AnimationEngine`)
//! - Static preset poses
//! - Model registration (`DeviceFactory`) and live instances (`DeviceManager`)

mod animation;
mod base;
mod engine;
mod factory;
mod manager;
mod preset;
mod traits;

pub use animation::{pause_or_cancel, Animation};
pub use base::{CommandEncoder, DeviceCore, PoseProfile};
pub use engine::{AnimationEngine, DEFAULT_ANIMATION_PERIOD};
pub use factory::{DeviceConstructor, DeviceFactory};
pub use manager::DeviceManager;
pub use preset::{PresetManager, PresetPose};
pub use traits::{Device, DeviceStatus, PoseExecutor};
