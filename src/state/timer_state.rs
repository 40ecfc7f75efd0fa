//! Timer state structure and management

use serde::{Deserialize, Serialize};

use super::{
    display::{remaining_time, RemainingTime},
    selection::{Minutes, Seconds},
};

/// Remaining seconds shown before the first start and after every stop
pub const DEFAULT_REMAINING_SECONDS: u32 = 5;

/// Snapshot of the countdown, published after every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub selected_minutes: Minutes,
    pub selected_seconds: Seconds,
}

impl TimerState {
    /// Create the idle state a fresh screen starts in (0 minutes, 5 seconds)
    pub fn new() -> Self {
        Self {
            remaining_seconds: DEFAULT_REMAINING_SECONDS,
            is_running: false,
            selected_minutes: Minutes::DEFAULT,
            selected_seconds: Seconds::DEFAULT,
        }
    }

    /// Total seconds described by the current picker selection
    pub fn selected_total(&self) -> u32 {
        u32::from(self.selected_minutes.get()) * 60 + u32::from(self.selected_seconds.get())
    }

    /// Countdown text for the current remaining seconds
    pub fn display(&self) -> RemainingTime {
        remaining_time(self.remaining_seconds)
    }

    /// Whether a screen shows the countdown text rather than the pickers.
    ///
    /// Includes the zero moment published just before an auto-stop resets
    /// the timer, so "00:00" is drawn once.
    pub fn shows_countdown(&self) -> bool {
        self.is_running || self.remaining_seconds == 0
    }

    pub(crate) fn reset(&mut self) {
        self.remaining_seconds = DEFAULT_REMAINING_SECONDS;
        self.is_running = false;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_screen() {
        let state = TimerState::new();
        assert_eq!(state.remaining_seconds, 5);
        assert!(!state.is_running);
        assert!(!state.shows_countdown());
        assert_eq!(state.selected_minutes.get(), 0);
        assert_eq!(state.selected_seconds.get(), 5);
        assert_eq!(state.selected_total(), 5);
    }

    #[test]
    fn selected_total_combines_components() {
        let state = TimerState {
            selected_minutes: Minutes::new(9).unwrap(),
            selected_seconds: Seconds::new(59).unwrap(),
            ..TimerState::new()
        };
        assert_eq!(state.selected_total(), 599);
    }

    #[test]
    fn zero_moment_shows_countdown() {
        let zero = TimerState {
            remaining_seconds: 0,
            is_running: false,
            ..TimerState::new()
        };
        assert!(zero.shows_countdown());
        assert_eq!(zero.display().to_string(), "00:00");
    }

    #[test]
    fn serializes_selection_as_integers() {
        let json = serde_json::to_value(TimerState::new()).unwrap();
        assert_eq!(json["selected_minutes"], 0);
        assert_eq!(json["selected_seconds"], 5);
        assert_eq!(json["remaining_seconds"], 5);
        assert_eq!(json["is_running"], false);
    }
}
