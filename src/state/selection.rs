//! Bounded picker values and their string encoding
//!
//! Pickers only ever hand over strings, so parsing happens here at the
//! boundary and the timer itself only sees `Minutes` and `Seconds`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Largest selectable minutes value
pub const MAX_MINUTES: u8 = 9;
/// Largest selectable seconds value
pub const MAX_SECONDS: u8 = 59;

/// Minutes component chosen before a countdown starts (0-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Minutes(u8);

/// Seconds component chosen before a countdown starts (0-59)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seconds(u8);

macro_rules! bounded_picker_value {
    ($ty:ident, $field:literal, $max:expr) => {
        impl $ty {
            pub const MAX: u8 = $max;

            pub fn new(value: u8) -> Option<Self> {
                (value <= $max).then_some(Self(value))
            }

            pub fn get(self) -> u8 {
                self.0
            }

            /// Every selectable value in ascending order
            pub fn all() -> impl Iterator<Item = Self> {
                (0..=$max).map(Self)
            }
        }

        impl TryFrom<u8> for $ty {
            type Error = TimerError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| TimerError::InvalidSelection {
                    field: $field,
                    value: value.to_string(),
                    max: $max,
                })
            }
        }

        impl From<$ty> for u8 {
            fn from(value: $ty) -> u8 {
                value.0
            }
        }

        impl FromStr for $ty {
            type Err = TimerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let invalid = || TimerError::InvalidSelection {
                    field: $field,
                    value: s.to_string(),
                    max: $max,
                };
                let trimmed = s.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                trimmed
                    .parse::<u8>()
                    .ok()
                    .and_then(Self::new)
                    .ok_or_else(invalid)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

bounded_picker_value!(Minutes, "minutes", MAX_MINUTES);
bounded_picker_value!(Seconds, "seconds", MAX_SECONDS);

impl Minutes {
    /// Minutes preselected on a fresh screen
    pub const DEFAULT: Minutes = Minutes(0);
}

impl Seconds {
    /// Seconds preselected on a fresh screen
    pub const DEFAULT: Seconds = Seconds(5);
}

/// Picker labels for the minutes dropdown: "0" through "9"
pub fn minute_options() -> Vec<String> {
    Minutes::all().map(|m| m.to_string()).collect()
}

/// Picker labels for the seconds dropdown: "0" through "59"
pub fn second_options() -> Vec<String> {
    Seconds::all().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0", 0; "lower bound")]
    #[test_case("9", 9; "upper bound")]
    #[test_case(" 3 ", 3; "surrounding whitespace")]
    #[test_case("07", 7; "leading zero")]
    fn parses_minutes(input: &str, expected: u8) {
        let minutes: Minutes = input.parse().unwrap();
        assert_eq!(minutes.get(), expected);
    }

    #[test_case("10"; "above range")]
    #[test_case("-1"; "negative")]
    #[test_case(""; "empty")]
    #[test_case("abc"; "not a number")]
    #[test_case("+5"; "explicit sign")]
    #[test_case("300"; "overflows u8")]
    fn rejects_bad_minutes(input: &str) {
        let err = input.parse::<Minutes>().unwrap_err();
        assert!(matches!(err, TimerError::InvalidSelection { field: "minutes", max: 9, .. }));
    }

    #[test]
    fn seconds_bounds() {
        assert_eq!("59".parse::<Seconds>().unwrap().get(), 59);
        assert!("60".parse::<Seconds>().is_err());
        assert!(Seconds::new(60).is_none());
        assert_eq!(Seconds::try_from(0).unwrap().get(), 0);
    }

    #[test]
    fn option_lists_match_picker_ranges() {
        let minutes = minute_options();
        assert_eq!(minutes.len(), 10);
        assert_eq!(minutes.first().map(String::as_str), Some("0"));
        assert_eq!(minutes.last().map(String::as_str), Some("9"));

        let seconds = second_options();
        assert_eq!(seconds.len(), 60);
        assert_eq!(seconds[42], "42");
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Minutes>("4").is_ok());
        assert!(serde_json::from_str::<Minutes>("12").is_err());
    }
}
