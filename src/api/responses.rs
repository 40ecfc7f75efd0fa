//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::TimerError, state::TimerState};

/// Which half of the screen is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Pickers,
    Countdown,
}

/// What a screen should draw for a timer snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenView {
    pub view: ViewKind,
    /// "MM:SS", only while counting down
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Picker values as the picker widgets expect them (strings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_minutes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_seconds: Option<String>,
    pub button: String,
}

impl From<&TimerState> for ScreenView {
    fn from(state: &TimerState) -> Self {
        if state.shows_countdown() {
            Self {
                view: ViewKind::Countdown,
                display: Some(state.display().to_string()),
                selected_minutes: None,
                selected_seconds: None,
                button: "Stop".to_string(),
            }
        } else {
            Self {
                view: ViewKind::Pickers,
                display: None,
                selected_minutes: Some(state.selected_minutes.to_string()),
                selected_seconds: Some(state.selected_seconds.to_string()),
                button: "Start".to_string(),
            }
        }
    }
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
    pub screen: ScreenView,
}

impl ApiResponse {
    /// Create a new API response, deriving the status from the timer
    pub fn new(message: String, timer: TimerState) -> Self {
        let status = if timer.is_running { "running" } else { "idle" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            screen: ScreenView::from(&timer),
            timer,
        }
    }
}

/// Error body returned for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Handler error carrying the status code to answer with
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        let status = match &err {
            TimerError::InvalidSelection { .. } => StatusCode::BAD_REQUEST,
            TimerError::SelectionLocked => StatusCode::CONFLICT,
            TimerError::LockPoisoned { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

/// Status response with timer snapshot and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub screen: ScreenView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Values offered by the minutes and seconds pickers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub minutes: Vec<String>,
    pub seconds: Vec<String>,
}

/// Response for the greeting button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl HelloResponse {
    pub fn hello_world() -> Self {
        Self {
            message: "Hello world!".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
