//! Animation descriptor trait

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::PoseExecutor;
use crate::error::Result;

/// A named, repeating pose sequence
///
/// `run` performs one cycle. Implementations check `cancel` between steps and
/// return early once it fires; an `Err` ends the animation.
#[async_trait]
pub trait Animation: Send + Sync {
    fn name(&self) -> &str;

    async fn run(
        &self,
        executor: &dyn PoseExecutor,
        cancel: &CancellationToken,
        period: Duration,
    ) -> Result<()>;
}

/// Sleep for `period` unless cancelled first. Returns `true` if cancelled.
pub async fn pause_or_cancel(cancel: &CancellationToken, period: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = tokio::time::sleep(period) => false,
    }
}
