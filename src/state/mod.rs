//! State management module
//! 
//! This module contains the countdown timer, its snapshot type, picker values
//! and the server-wide application state.

pub mod app_state;
pub mod countdown;
pub mod display;
pub mod selection;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{CountdownTimer, TickOutcome, TimerCore, TimerEvent, TimerUpdate};
pub use display::{format_number, remaining_time, RemainingTime};
pub use selection::{Minutes, Seconds};
pub use timer_state::{TimerState, DEFAULT_REMAINING_SECONDS};
