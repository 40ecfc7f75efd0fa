//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{
    error::TimerError,
    state::{
        selection::{minute_options, second_options},
        AppState, Minutes, Seconds, TimerState,
    },
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, HelloResponse, OptionsResponse, ScreenView,
    StatusResponse,
};

/// Handle POST /start - Start the countdown from the selected duration
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.timer.start()?;
    state.record_action("start");
    info!("Start endpoint called - countdown from {} seconds", timer.remaining_seconds);

    let message = if timer.is_running {
        "Countdown started"
    } else {
        "Countdown finished immediately"
    };
    Ok(Json(ApiResponse::new(message.to_string(), timer)))
}

/// Handle POST /stop - Stop the countdown and reset it
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.timer.stop()?;
    state.record_action("stop");
    info!("Stop endpoint called - countdown reset");
    Ok(Json(ApiResponse::new("Countdown stopped".to_string(), timer)))
}

/// Handle POST /select/minutes/:value - Change the minutes picker
pub async fn select_minutes_handler(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let minutes = value.parse::<Minutes>().map_err(|e: TimerError| {
        warn!("Rejected minutes selection: {}", e);
        e
    })?;

    if !state.timer.select_minutes(minutes)? {
        return Err(TimerError::SelectionLocked.into());
    }
    state.record_action("select-minutes");
    Ok(Json(ApiResponse::new(
        format!("Selected {} minutes", minutes),
        state.timer.snapshot()?,
    )))
}

/// Handle POST /select/seconds/:value - Change the seconds picker
pub async fn select_seconds_handler(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let seconds = value.parse::<Seconds>().map_err(|e: TimerError| {
        warn!("Rejected seconds selection: {}", e);
        e
    })?;

    if !state.timer.select_seconds(seconds)? {
        return Err(TimerError::SelectionLocked.into());
    }
    state.record_action("select-seconds");
    Ok(Json(ApiResponse::new(
        format!("Selected {} seconds", seconds),
        state.timer.snapshot()?,
    )))
}

/// Handle GET /status - Return the timer snapshot and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let timer = state.timer.snapshot()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        screen: ScreenView::from(&timer),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /options - List picker values
pub async fn options_handler() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        minutes: minute_options(),
        seconds: second_options(),
    })
}

fn screen_event(timer: &TimerState) -> Event {
    Event::default()
        .event("timer")
        .json_data(ScreenView::from(timer))
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// Handle GET /events - Stream the screen after every timer update
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    debug!("Events subscriber connected");
    // Subscribe before reading the snapshot so no update falls in between
    let updates = state.timer.events();
    let initial = state.timer.snapshot()?;

    // First frame is the current screen, then one per update until the timer goes away
    let stream = stream::unfold((Some(initial), updates), |(pending, mut updates)| async move {
        let timer = match pending {
            Some(timer) => timer,
            None => loop {
                match updates.recv().await {
                    Ok(update) => break update.state,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Events subscriber fell behind, skipped {} frames", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            },
        };
        Some((Ok(screen_event(&timer)), (None, updates)))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Handle POST /hello - The greeting button
pub async fn hello_handler() -> Json<HelloResponse> {
    info!("Hello endpoint called");
    Json(HelloResponse::hello_world())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
