//! Countdown text formatting

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remaining time split into zero-padded minutes and seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    pub minutes: String,
    pub seconds: String,
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.minutes, self.seconds)
    }
}

/// Keep the last two digits of `number`, padding with a leading zero: 3 => "03", 10 => "10"
pub fn format_number(number: u32) -> String {
    let padded = format!("{:02}", number);
    padded[padded.len() - 2..].to_string()
}

/// Split a remaining-seconds count into its display parts
pub fn remaining_time(remaining_seconds: u32) -> RemainingTime {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds - minutes * 60;
    RemainingTime {
        minutes: format_number(minutes),
        seconds: format_number(seconds),
    }
}
