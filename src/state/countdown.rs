//! Countdown timer: idle/running state machine with an owned tick source
//!
//! The timer owns at most one tick task at a time. Every `start` bumps a
//! generation counter and ticks carry the generation they were spawned
//! with, so a tick that was already queued when the timer stopped or
//! restarted is dropped instead of decrementing the new countdown.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use super::{
    selection::{Minutes, Seconds},
    TimerState,
};
use crate::{
    error::{Result, TimerError},
    tasks::spawn_ticker,
};

/// Notification sent to event subscribers after each mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Selected { minutes: Minutes, seconds: Seconds },
    Started { remaining_seconds: u32 },
    Ticked { remaining_seconds: u32 },
    /// Countdown reached zero and the timer reset itself
    Expired,
    Stopped,
}

/// Event plus the snapshot it produced, in publication order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerUpdate {
    pub event: TimerEvent,
    pub state: TimerState,
}

/// Result of delivering one tick to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running with this many seconds left
    Ticked { remaining: u32 },
    /// Countdown hit zero and the timer is idle again
    Expired,
    /// Tick came from a cancelled source or arrived while idle
    Ignored,
}

struct Inner {
    state: TimerState,
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

/// State shared between the timer handle and its tick task
pub struct TimerCore {
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<TimerState>,
    event_tx: broadcast::Sender<TimerUpdate>,
    tick_period: Duration,
}

impl TimerCore {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| TimerError::LockPoisoned { what: "timer state" })
    }

    fn publish(&self, state: &TimerState, event: TimerEvent) {
        self.snapshot_tx.send_replace(state.clone());
        let update = TimerUpdate {
            event,
            state: state.clone(),
        };
        // No subscribers is the normal case when nothing is rendering
        if self.event_tx.send(update).is_err() {
            debug!("No event subscribers for timer update");
        }
    }

    /// Cancel the tick source and return to the idle default
    fn halt(&self, inner: &mut Inner) {
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        inner.generation += 1;
        inner.state.reset();
    }

    /// Apply one tick if it belongs to the live tick source
    pub fn tick(&self, generation: u64) -> Result<TickOutcome> {
        let mut inner = self.lock()?;

        if generation != inner.generation || !inner.state.is_running {
            debug!(
                "Ignoring stale tick (generation {}, current {})",
                generation, inner.generation
            );
            return Ok(TickOutcome::Ignored);
        }

        let remaining = inner.state.remaining_seconds.saturating_sub(1);
        inner.state.remaining_seconds = remaining;
        debug!("Tick: {} seconds remaining", remaining);

        if remaining > 0 {
            let state = inner.state.clone();
            self.publish(&state, TimerEvent::Ticked { remaining_seconds: remaining });
            return Ok(TickOutcome::Ticked { remaining });
        }

        self.expire(&mut inner);
        Ok(TickOutcome::Expired)
    }

    /// Show the zero moment, then run the same stop procedure as an explicit stop
    fn expire(&self, inner: &mut Inner) {
        inner.state.remaining_seconds = 0;
        inner.state.is_running = false;
        let zero = inner.state.clone();
        self.publish(&zero, TimerEvent::Ticked { remaining_seconds: 0 });

        info!("Countdown reached zero, stopping timer");
        self.halt(inner);
        let state = inner.state.clone();
        self.publish(&state, TimerEvent::Expired);
    }
}

/// Countdown timer owning its periodic tick source
pub struct CountdownTimer {
    core: Arc<TimerCore>,
}

impl CountdownTimer {
    /// Create an idle timer that ticks every `tick_period` once started
    pub fn new(tick_period: Duration) -> Self {
        let state = TimerState::new();
        let (snapshot_tx, _) = watch::channel(state.clone());
        let (event_tx, _) = broadcast::channel(64);

        Self {
            core: Arc::new(TimerCore {
                inner: Mutex::new(Inner {
                    state,
                    generation: 0,
                    ticker: None,
                }),
                snapshot_tx,
                event_tx,
                tick_period,
            }),
        }
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> Result<TimerState> {
        self.core.lock().map(|inner| inner.state.clone())
    }

    /// Watch the latest snapshot; the receiver is marked changed after every mutation
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.core.snapshot_tx.subscribe()
    }

    /// Receive every event with its snapshot, in order and without coalescing
    pub fn events(&self) -> broadcast::Receiver<TimerUpdate> {
        self.core.event_tx.subscribe()
    }

    /// Generation of the current tick source
    pub fn generation(&self) -> Result<u64> {
        self.core.lock().map(|inner| inner.generation)
    }

    /// Whether a tick task is currently owned by the timer
    pub fn has_tick_source(&self) -> Result<bool> {
        self.core
            .lock()
            .map(|inner| inner.ticker.as_ref().is_some_and(|t| !t.is_finished()))
    }

    /// Set the minutes picker. Returns false without changing anything while running.
    pub fn select_minutes(&self, minutes: Minutes) -> Result<bool> {
        self.select(|state| state.selected_minutes = minutes)
    }

    /// Set the seconds picker. Returns false without changing anything while running.
    pub fn select_seconds(&self, seconds: Seconds) -> Result<bool> {
        self.select(|state| state.selected_seconds = seconds)
    }

    fn select<F>(&self, updater: F) -> Result<bool>
    where
        F: FnOnce(&mut TimerState),
    {
        let mut inner = self.core.lock()?;
        if inner.state.is_running {
            debug!("Ignoring selection change while running");
            return Ok(false);
        }

        updater(&mut inner.state);
        let state = inner.state.clone();
        debug!(
            "Selection set to {}m {}s",
            state.selected_minutes, state.selected_seconds
        );
        self.core.publish(
            &state,
            TimerEvent::Selected {
                minutes: state.selected_minutes,
                seconds: state.selected_seconds,
            },
        );
        Ok(true)
    }

    /// Start counting down from the selected duration.
    ///
    /// Any tick source from an earlier start is cancelled first, so calling
    /// this while running restarts the countdown rather than doubling its
    /// speed. A zero selection expires immediately. Must be called from
    /// within a tokio runtime.
    pub fn start(&self) -> Result<TimerState> {
        let mut inner = self.core.lock()?;

        if let Some(previous) = inner.ticker.take() {
            debug!("Cancelling previous tick source before restart");
            previous.abort();
        }
        inner.generation += 1;
        inner.state.remaining_seconds = inner.state.selected_total();
        inner.state.is_running = true;

        let state = inner.state.clone();
        info!("Starting countdown from {} seconds", state.remaining_seconds);
        self.core.publish(
            &state,
            TimerEvent::Started {
                remaining_seconds: state.remaining_seconds,
            },
        );

        if state.remaining_seconds == 0 {
            self.core.expire(&mut inner);
            return Ok(inner.state.clone());
        }

        let generation = inner.generation;
        inner.ticker = Some(spawn_ticker(
            Arc::downgrade(&self.core),
            generation,
            self.core.tick_period,
        ));
        Ok(state)
    }

    /// Cancel the tick source and reset to the idle default. A no-op while idle.
    pub fn stop(&self) -> Result<TimerState> {
        let mut inner = self.core.lock()?;

        if !inner.state.is_running && inner.ticker.is_none() {
            debug!("Stop requested while idle");
            return Ok(inner.state.clone());
        }

        self.core.halt(&mut inner);
        let state = inner.state.clone();
        info!("Countdown stopped");
        self.core.publish(&state, TimerEvent::Stopped);
        Ok(state)
    }

    /// Deliver a tick for the given generation, as the tick task does
    pub fn tick(&self, generation: u64) -> Result<TickOutcome> {
        self.core.tick(generation)
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        let mut inner = match self.core.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> CountdownTimer {
        CountdownTimer::new(Duration::from_secs(1))
    }

    fn select(timer: &CountdownTimer, minutes: u8, seconds: u8) {
        assert!(timer.select_minutes(Minutes::new(minutes).unwrap()).unwrap());
        assert!(timer.select_seconds(Seconds::new(seconds).unwrap()).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn start_snapshots_every_selection() {
        let timer = timer();
        for minutes in 0..=9u8 {
            for seconds in 0..=59u8 {
                timer.stop().unwrap();
                select(&timer, minutes, seconds);
                timer.start().unwrap();
                let state = timer.snapshot().unwrap();
                if minutes == 0 && seconds == 0 {
                    // zero selection expires on the spot
                    assert_eq!(state.remaining_seconds, 5);
                    assert!(!state.is_running);
                } else {
                    assert_eq!(state.remaining_seconds, u32::from(minutes) * 60 + u32::from(seconds));
                    assert!(state.is_running);
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tick_decrements_while_running() {
        let timer = timer();
        select(&timer, 1, 0);
        timer.start().unwrap();
        let generation = timer.generation().unwrap();

        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Ticked { remaining: 59 });
        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Ticked { remaining: 58 });
        let state = timer.snapshot().unwrap();
        assert_eq!(state.remaining_seconds, 58);
        assert!(state.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_stop_at_zero_resets_to_default() {
        let timer = timer();
        let mut events = timer.events();
        select(&timer, 0, 2);
        let started = timer.start().unwrap();
        assert_eq!(started.remaining_seconds, 2);
        assert!(started.is_running);
        let generation = timer.generation().unwrap();

        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Ticked { remaining: 1 });
        assert!(timer.snapshot().unwrap().is_running);
        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Expired);

        let state = timer.snapshot().unwrap();
        assert_eq!(state.remaining_seconds, 5);
        assert!(!state.is_running);
        assert!(!timer.has_tick_source().unwrap());

        let mut seen = Vec::new();
        while let Ok(update) = events.try_recv() {
            seen.push(update.event);
        }
        assert_eq!(
            seen,
            vec![
                TimerEvent::Selected { minutes: Minutes::new(0).unwrap(), seconds: Seconds::new(5).unwrap() },
                TimerEvent::Selected { minutes: Minutes::new(0).unwrap(), seconds: Seconds::new(2).unwrap() },
                TimerEvent::Started { remaining_seconds: 2 },
                TimerEvent::Ticked { remaining_seconds: 1 },
                TimerEvent::Ticked { remaining_seconds: 0 },
                TimerEvent::Expired,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tick_after_expiry_is_ignored() {
        let timer = timer();
        select(&timer, 0, 1);
        timer.start().unwrap();
        let generation = timer.generation().unwrap();
        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Expired);
        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Ignored);
        assert_eq!(timer.snapshot().unwrap().remaining_seconds, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_idle_changes_nothing() {
        let timer = timer();
        let mut rx = timer.subscribe();
        let before = timer.snapshot().unwrap();

        let after = timer.stop().unwrap();
        assert_eq!(before, after);
        assert_eq!(after.remaining_seconds, 5);
        assert!(!after.is_running);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_resets_and_drops_queued_tick() {
        let timer = timer();
        select(&timer, 3, 0);
        timer.start().unwrap();
        let generation = timer.generation().unwrap();
        timer.tick(generation).unwrap();

        let stopped = timer.stop().unwrap();
        assert_eq!(stopped.remaining_seconds, 5);
        assert!(!stopped.is_running);
        assert!(!timer.has_tick_source().unwrap());

        // a tick the scheduler had already queued before stop
        assert_eq!(timer.tick(generation).unwrap(), TickOutcome::Ignored);
        assert_eq!(timer.snapshot().unwrap(), stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_invalidates_previous_generation() {
        let timer = timer();
        select(&timer, 0, 30);
        timer.start().unwrap();
        let first = timer.generation().unwrap();
        timer.start().unwrap();
        let second = timer.generation().unwrap();
        assert_ne!(first, second);

        assert_eq!(timer.tick(first).unwrap(), TickOutcome::Ignored);
        assert_eq!(timer.tick(second).unwrap(), TickOutcome::Ticked { remaining: 29 });
    }

    #[tokio::test(start_paused = true)]
    async fn selection_is_locked_while_running() {
        let timer = timer();
        select(&timer, 2, 10);
        timer.start().unwrap();

        assert!(!timer.select_minutes(Minutes::new(7).unwrap()).unwrap());
        assert!(!timer.select_seconds(Seconds::new(1).unwrap()).unwrap());
        let state = timer.snapshot().unwrap();
        assert_eq!(state.selected_minutes.get(), 2);
        assert_eq!(state.selected_seconds.get(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_selection_expires_without_tick_source() {
        let timer = timer();
        select(&timer, 0, 0);
        let state = timer.start().unwrap();
        assert_eq!(state.remaining_seconds, 5);
        assert!(!state.is_running);
        assert!(!timer.has_tick_source().unwrap());
    }
}
