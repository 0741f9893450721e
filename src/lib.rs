//! Dexterous hand controller
//!
//! Device abstraction for robotic hands driven through an HTTP CAN bridge:
//! per-model command encoding, a device factory and registry, presets,
//! pluggable components and a per-device animation engine.

pub mod communication;
pub mod component;
pub mod config;
pub mod device;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HandError, Result};
