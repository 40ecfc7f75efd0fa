//! Error types shared across the timer, state and API layers

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Failed to lock {what}: lock poisoned")]
    LockPoisoned { what: &'static str },

    #[error("Invalid {field} selection '{value}': expected a whole number from 0 to {max}")]
    InvalidSelection {
        field: &'static str,
        value: String,
        max: u8,
    },

    #[error("Selection cannot change while the countdown is running")]
    SelectionLocked,
}

pub type Result<T> = std::result::Result<T, TimerError>;
