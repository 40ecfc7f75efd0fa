//! Countdown Timer - A state-managed HTTP server driving a countdown
//! 
//! This library provides a minutes/seconds countdown timer with an owned,
//! cancellable tick source, plus the HTTP surface a screen uses to pick a
//! duration, start and stop the countdown and observe its state.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TimerError};
pub use state::{AppState, CountdownTimer, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
