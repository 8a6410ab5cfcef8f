use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::guardian::types::{GuardianExit, TickOutcome};

use super::tick::Guardian;

/// Handle on a running guardian loop.
///
/// Dropping the handle stops the loop, like unloading the page it runs in.
pub struct GuardianHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<GuardianExit>,
}

impl GuardianHandle {
    /// Stop the loop, abandoning any tick in flight, and wait for it to end.
    pub async fn stop(self) -> GuardianExit {
        let _ = self.shutdown.send(true);
        Self::join(self.task).await
    }

    /// Wait for the loop to end on its own, which happens after a logout.
    pub async fn wait(self) -> GuardianExit {
        let GuardianHandle { shutdown, task } = self;
        let exit = Self::join(task).await;
        drop(shutdown);
        exit
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    async fn join(task: JoinHandle<GuardianExit>) -> GuardianExit {
        match task.await {
            Ok(exit) => exit,
            Err(e) => {
                tracing::error!("Guardian task failed: {}", e);
                GuardianExit::Stopped
            }
        }
    }
}

/// Start ticking `guardian` every `refresh_interval` on the current tokio runtime.
///
/// The first tick happens one interval after the start, or immediately with
/// `check_on_start`.
pub fn spawn_guardian(guardian: Arc<Guardian>) -> GuardianHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run_guardian(guardian, shutdown_rx));
    GuardianHandle { shutdown, task }
}

async fn run_guardian(
    guardian: Arc<Guardian>,
    mut shutdown: watch::Receiver<bool>,
) -> GuardianExit {
    let period = guardian.settings().refresh_interval;
    let start = if guardian.settings().check_on_start {
        Instant::now()
    } else {
        Instant::now() + period
    };

    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!("Session guardian started, checking every {:?}", period);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::info!("Session guardian stopped");
                return GuardianExit::Stopped;
            }
        }

        let outcome = tokio::select! {
            outcome = guardian.tick() => outcome,
            _ = shutdown.changed() => {
                tracing::info!("Session guardian stopped during a tick");
                return GuardianExit::Stopped;
            }
        };

        match outcome {
            Ok(TickOutcome::LoggedOut(reason)) => {
                tracing::info!("Session ended: {}", reason);
                return GuardianExit::LoggedOut(reason);
            }
            Ok(outcome) => tracing::debug!("Tick finished: {:?}", outcome),
            Err(e) => tracing::error!("Guardian tick failed: {}", e),
        }
    }
}
