use std::sync::Arc;
use std::time::Duration;
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::controller::UiController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollerState {
    Running,
    Paused,
    Stopped,
}

/// Periodic `/progress` refresh.
///
/// Each tick is awaited before the next one is considered and missed ticks are
/// skipped, so at most one progress request is ever in flight.
pub struct ProgressPoller;

impl ProgressPoller {
    pub fn start(controller: Arc<UiController>, period: Duration) -> PollerHandle {
        let (control, state) = watch::channel(PollerState::Running);
        let task = tokio::spawn(run(controller, period, state));
        info!("Progress polling started every {:?}", period);

        PollerHandle { control, task }
    }
}

/// Lifecycle of a running poller. Dropping the handle stops the task.
pub struct PollerHandle {
    control: watch::Sender<PollerState>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn pause(&self) {
        if self.control.send_replace(PollerState::Paused) == PollerState::Running {
            info!("Progress polling paused");
        }
    }

    pub fn resume(&self) {
        if self.control.send_replace(PollerState::Running) == PollerState::Paused {
            info!("Progress polling resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        *self.control.borrow() == PollerState::Paused
    }

    /// Stops polling and cancels a request still in flight.
    pub fn stop(&self) {
        self.control.send_replace(PollerState::Stopped);
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(controller: Arc<UiController>, period: Duration, mut state: watch::Receiver<PollerState>) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let current = *state.borrow_and_update();
        match current {
            PollerState::Stopped => break,
            PollerState::Paused => {
                if state.changed().await.is_err() {
                    break;
                }
                continue;
            }
            PollerState::Running => {}
        }

        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = controller.poll_progress().await {
                    debug!("Progress tick skipped: {}", e);
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!("Progress polling stopped");
}
