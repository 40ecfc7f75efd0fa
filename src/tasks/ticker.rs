//! Periodic tick source for the countdown

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, error};

use crate::state::{TickOutcome, TimerCore};

/// Spawn a task that ticks `core` once per `period` until the countdown
/// expires, the generation goes stale or the timer is dropped.
///
/// The first tick fires one full period after spawning.
pub fn spawn_ticker(core: Weak<TimerCore>, generation: u64, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(1));
    let first_tick = Instant::now() + period;

    tokio::spawn(async move {
        debug!("Tick source {} started ({:?} period)", generation, period);
        let mut interval = interval_at(first_tick, period);

        loop {
            interval.tick().await;

            let Some(timer) = core.upgrade() else {
                debug!("Timer dropped, tick source {} exiting", generation);
                break;
            };

            match timer.tick(generation) {
                Ok(TickOutcome::Ticked { .. }) => {}
                Ok(TickOutcome::Expired) | Ok(TickOutcome::Ignored) => break,
                Err(e) => {
                    error!("Tick source {} failed: {}", generation, e);
                    break;
                }
            }
        }

        debug!("Tick source {} finished", generation);
    })
}
