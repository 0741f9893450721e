//! Named static poses

use hands_shared::{FingerPose, PalmPose};
use serde::Serialize;
use std::collections::HashMap;

/// A statically named pose
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetPose {
    pub name: String,
    pub description: String,
    pub finger_pose: FingerPose,
    pub palm_pose: Option<PalmPose>,
}

impl PresetPose {
    pub fn fingers(name: &str, description: &str, finger_pose: FingerPose) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            finger_pose,
            palm_pose: None,
        }
    }

    pub fn with_palm(mut self, palm_pose: PalmPose) -> Self {
        self.palm_pose = Some(palm_pose);
        self
    }
}

/// Preset table, populated once when a device is built
#[derive(Debug, Default)]
pub struct PresetManager {
    presets: HashMap<String, PresetPose>,
}

impl PresetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preset, replacing any with the same name
    pub fn register(&mut self, preset: PresetPose) {
        self.presets.insert(preset.name.clone(), preset);
    }

    pub fn get(&self, name: &str) -> Option<&PresetPose> {
        self.presets.get(name)
    }

    /// Preset names, sorted
    pub fn supported_presets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.presets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn description(&self, name: &str) -> Option<String> {
        self.presets.get(name).map(|p| p.description.clone())
    }
}

impl FromIterator<PresetPose> for PresetManager {
    fn from_iter<I: IntoIterator<Item = PresetPose>>(iter: I) -> Self {
        let mut manager = Self::new();
        for preset in iter {
            manager.register(preset);
        }
        manager
    }
}
