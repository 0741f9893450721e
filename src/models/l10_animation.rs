//! L10 animations

use async_trait::async_trait;
use hands_shared::{FingerPose, PalmPose};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::device::{pause_or_cancel, Animation, PoseExecutor};
use crate::error::Result;

const LOW: u8 = 0x40;
const HIGH: u8 = 0xC0;

/// Finger pose with `idx` at `value` and every other finger at `rest`
fn single_finger(idx: usize, value: u8, rest: u8) -> FingerPose {
    let mut pose = [rest; 6];
    pose[idx] = value;
    pose
}

/// Fingers move one at a time: first each drops low among raised fingers,
/// then each rises among lowered ones
pub struct WaveAnimation;

#[async_trait]
impl Animation for WaveAnimation {
    fn name(&self) -> &str {
        "wave"
    }

    async fn run(
        &self,
        executor: &dyn PoseExecutor,
        cancel: &CancellationToken,
        period: Duration,
    ) -> Result<()> {
        let steps = (0..6)
            .map(|i| single_finger(i, LOW, HIGH))
            .chain((0..6).map(|i| single_finger(i, HIGH, LOW)));

        for pose in steps {
            executor.set_finger_pose(pose).await?;
            if pause_or_cancel(cancel, period).await {
                return Ok(());
            }
        }

        Ok(())
    }
}

/// Palm swings side to side
pub struct SwayAnimation;

const SWAY_LEFT: PalmPose = [0x30; 4];
const SWAY_RIGHT: PalmPose = [0xD0; 4];

#[async_trait]
impl Animation for SwayAnimation {
    fn name(&self) -> &str {
        "sway"
    }

    async fn run(
        &self,
        executor: &dyn PoseExecutor,
        cancel: &CancellationToken,
        period: Duration,
    ) -> Result<()> {
        for pose in [SWAY_LEFT, SWAY_RIGHT] {
            executor.set_palm_pose(pose).await?;
            if pause_or_cancel(cancel, period).await {
                return Ok(());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingExecutor;

    #[tokio::test]
    async fn test_wave_cycle() {
        let executor = CountingExecutor::new("l10");
        let cancel = CancellationToken::new();

        WaveAnimation
            .run(&executor, &cancel, Duration::from_millis(1))
            .await
            .expect("cycle failed");

        let poses = executor.finger_poses();
        assert_eq!(poses.len(), 12);
        assert_eq!(poses[0], [LOW, HIGH, HIGH, HIGH, HIGH, HIGH]);
        assert_eq!(poses[5], [HIGH, HIGH, HIGH, HIGH, HIGH, LOW]);
        assert_eq!(poses[6], [HIGH, LOW, LOW, LOW, LOW, LOW]);
        assert_eq!(poses[11], [LOW, LOW, LOW, LOW, LOW, HIGH]);
    }

    #[tokio::test]
    async fn test_wave_stops_when_cancelled() {
        let executor = CountingExecutor::new("l10");
        let cancel = CancellationToken::new();
        cancel.cancel();

        WaveAnimation
            .run(&executor, &cancel, Duration::from_secs(10))
            .await
            .expect("cycle failed");

        // The step in flight completes, nothing after it
        assert_eq!(executor.finger_poses().len(), 1);
    }

    #[tokio::test]
    async fn test_sway_cycle() {
        let executor = CountingExecutor::new("l10");
        let cancel = CancellationToken::new();

        SwayAnimation
            .run(&executor, &cancel, Duration::from_millis(1))
            .await
            .expect("cycle failed");

        assert_eq!(executor.palm_poses(), vec![SWAY_LEFT, SWAY_RIGHT]);
        assert!(executor.finger_poses().is_empty());
    }
}
