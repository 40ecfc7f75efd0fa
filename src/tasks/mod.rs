//! Background tasks module
//! 
//! This module contains the countdown's tick source and the task that
//! renders timer snapshots to the log.

pub mod render_log;
pub mod ticker;

// Re-export main functions
pub use render_log::render_log_task;
pub use ticker::spawn_ticker;
