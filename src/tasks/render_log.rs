//! Log-based renderer for timer snapshots

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::state::{TimerState, TimerUpdate};

/// One line describing what the screen shows for `state`
pub fn render_line(state: &TimerState) -> String {
    if state.shows_countdown() {
        format!("[countdown] {} [Stop]", state.display())
    } else {
        format!(
            "[pickers] {} Minutes {} Seconds [Start]",
            state.selected_minutes, state.selected_seconds
        )
    }
}

/// Background task that redraws (logs) the screen after every timer update
pub async fn render_log_task(initial: TimerState, mut updates: broadcast::Receiver<TimerUpdate>) {
    info!("Starting render task");
    info!("{}", render_line(&initial));

    loop {
        match updates.recv().await {
            Ok(update) => info!("{}", render_line(&update.state)),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Render task fell behind, skipped {} frames", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Timer dropped, render task exiting");
}
