//! Animation Engine
//!
//! Runs at most one animation per device. Each `start` cancels the previous
//! run without waiting for it and bumps a generation counter; a finishing task
//! only clears engine state and resets the pose if its generation is still the
//! current one. A superseded task exits quietly.
//!
//! Two independent locks are used and never nested: one for the running state
//! and one for the registration table. Neither is held across an await on the
//! executor.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{Animation, PoseExecutor};
use crate::error::{HandError, Result};

/// Period used when `start` is given a zero period
pub const DEFAULT_ANIMATION_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct EngineState {
    running: bool,
    current: Option<String>,
    cancel: Option<CancellationToken>,
    /// Bumped on every start; identifies the run that owns pose output
    generation: u64,
    /// Task of the most recent run
    task: Option<JoinHandle<()>>,
}

/// Why an animation loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    Cancelled,
    CancelledAtCycleEnd,
    Failed,
}

/// Manages and runs a device's animations
pub struct AnimationEngine {
    executor: Arc<dyn PoseExecutor>,
    animations: RwLock<HashMap<String, Arc<dyn Animation>>>,
    state: Arc<Mutex<EngineState>>,
}

impl AnimationEngine {
    /// Create an engine driving `executor`
    pub fn new(executor: Arc<dyn PoseExecutor>) -> Self {
        Self {
            executor,
            animations: RwLock::new(HashMap::new()),
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    /// Register an animation while building the engine
    pub fn with_animation(mut self, animation: Arc<dyn Animation>) -> Self {
        insert_animation(self.animations.get_mut(), animation);
        self
    }

    /// Register an animation, replacing any with the same name
    pub async fn register(&self, animation: Arc<dyn Animation>) {
        insert_animation(&mut *self.animations.write().await, animation);
    }

    /// Names of all registered animations, sorted
    pub async fn registered_animations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.animations.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    fn device_name(&self) -> String {
        self.executor.executor_id().unwrap_or("device").to_string()
    }

    /// Start `name`, superseding whatever is running
    ///
    /// Returns as soon as the new run is scheduled. A zero `period` selects
    /// [`DEFAULT_ANIMATION_PERIOD`].
    pub async fn start(&self, name: &str, period: Duration) -> Result<()> {
        let animation = self
            .animations
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| HandError::UnknownAnimation(name.to_string()))?;

        let period = if period.is_zero() {
            DEFAULT_ANIMATION_PERIOD
        } else {
            period
        };
        let device = self.device_name();

        let (cancel, generation) = {
            let mut state = self.state.lock().await;

            if let Some(previous) = state.cancel.take() {
                if state.running {
                    info!(
                        device = %device,
                        from = state.current.as_deref().unwrap_or(""),
                        to = name,
                        "Superseding running animation"
                    );
                }
                previous.cancel();
            }

            state.generation += 1;
            let cancel = CancellationToken::new();
            state.cancel = Some(cancel.clone());
            state.running = true;
            state.current = Some(name.to_string());
            (cancel, state.generation)
        };

        info!(device = %device, animation = name, period_ms = period.as_millis() as u64, "Starting animation");

        let task = tokio::spawn(run_animation_loop(
            animation,
            self.executor.clone(),
            self.state.clone(),
            cancel,
            generation,
            period,
            device,
        ));

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.task = Some(task);
        }

        Ok(())
    }

    /// Signal the running animation to stop. No-op if nothing is running.
    ///
    /// State is cleared immediately; the task resets the pose when it exits.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;

        if !state.running {
            debug!(device = %self.device_name(), "No animation running");
            return;
        }

        info!(
            device = %self.device_name(),
            animation = state.current.as_deref().unwrap_or(""),
            "Stopping animation"
        );
        if let Some(cancel) = &state.cancel {
            cancel.cancel();
        }
        state.running = false;
        state.current = None;
    }

    /// Stop, then wait for the last run's task to exit
    ///
    /// When this returns the task has sent its final pose, including the
    /// neutral reset if it still owned the engine.
    pub async fn stop_and_wait(&self) {
        self.stop().await;

        let task = self.state.lock().await.task.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(device = %self.device_name(), error = %e, "Animation task did not exit cleanly");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// Name of the running animation, if any
    pub async fn current_animation(&self) -> Option<String> {
        self.state.lock().await.current.clone()
    }

    #[cfg(test)]
    async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }
}

fn insert_animation(table: &mut HashMap<String, Arc<dyn Animation>>, animation: Arc<dyn Animation>) {
    let name = animation.name().to_string();
    if table.insert(name.clone(), animation).is_some() {
        warn!(animation = %name, "Animation already registered, replacing");
    } else {
        debug!(animation = %name, "Animation registered");
    }
}

async fn run_animation_loop(
    animation: Arc<dyn Animation>,
    executor: Arc<dyn PoseExecutor>,
    state: Arc<Mutex<EngineState>>,
    cancel: CancellationToken,
    generation: u64,
    period: Duration,
    device: String,
) {
    let name = animation.name().to_string();
    debug!(device = %device, animation = %name, generation, "Animation loop started");

    let exit = loop {
        if cancel.is_cancelled() {
            break LoopExit::Cancelled;
        }

        if let Err(e) = animation.run(executor.as_ref(), &cancel, period).await {
            error!(device = %device, animation = %name, error = %e, "Animation cycle failed");
            break LoopExit::Failed;
        }

        // Catch a stop that arrived while the cycle was running
        if cancel.is_cancelled() {
            break LoopExit::CancelledAtCycleEnd;
        }

        tokio::task::yield_now().await;
    };

    handle_loop_exit(&state, executor.as_ref(), generation, exit, &device, &name).await;
}

async fn handle_loop_exit(
    state: &Mutex<EngineState>,
    executor: &dyn PoseExecutor,
    generation: u64,
    exit: LoopExit,
    device: &str,
    name: &str,
) {
    let still_owner = {
        let mut state = state.lock().await;
        if state.generation == generation {
            state.running = false;
            state.current = None;
            true
        } else {
            false
        }
    };

    if !still_owner {
        debug!(
            device,
            animation = name,
            generation,
            "Superseded animation exited, leaving pose to the newer run"
        );
        return;
    }

    info!(device, animation = name, exit = ?exit, "Animation ended, resetting pose");
    match executor.reset_pose().await {
        Ok(()) => info!(device, "Pose reset"),
        Err(e) => warn!(device, error = %e, "Failed to reset pose after animation"),
    }
}
