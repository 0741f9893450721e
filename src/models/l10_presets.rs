//! L10 preset poses

use crate::device::PresetPose;

const CLOSED: u8 = 64;
const OPEN: u8 = 192;

/// Everyday gestures followed by counting gestures 1-9
pub fn presets() -> Vec<PresetPose> {
    vec![
        PresetPose::fingers("fist", "Closed fist", [CLOSED; 6]),
        PresetPose::fingers("open", "Fully open hand", [OPEN; 6]),
        PresetPose::fingers("pinch", "Thumb and index pinch", [120, 120, CLOSED, CLOSED, CLOSED, CLOSED]),
        PresetPose::fingers("thumbsup", "Thumbs up", [CLOSED, OPEN, OPEN, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("point", "Index finger pointing", [OPEN, CLOSED, OPEN, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("1", "Number one", [OPEN, CLOSED, OPEN, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("2", "Number two", [OPEN, CLOSED, CLOSED, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("3", "Number three", [OPEN, CLOSED, CLOSED, CLOSED, OPEN, CLOSED]),
        PresetPose::fingers("4", "Number four", [OPEN, CLOSED, CLOSED, CLOSED, CLOSED, CLOSED]),
        PresetPose::fingers("5", "Number five", [OPEN; 6]),
        PresetPose::fingers("6", "Number six", [CLOSED, OPEN, OPEN, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("7", "Number seven", [CLOSED, CLOSED, OPEN, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("8", "Number eight", [CLOSED, CLOSED, CLOSED, OPEN, OPEN, CLOSED]),
        PresetPose::fingers("9", "Number nine", [CLOSED, CLOSED, CLOSED, CLOSED, OPEN, CLOSED]),
    ]
}
