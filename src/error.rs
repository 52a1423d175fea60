use crate::state::Field;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

/// Error returned when a classified interaction cannot be turned into an
/// [`Event`](crate::Event)
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EventError {
    #[error("unrecognized event {0:?}")]
    Unrecognized(String),
    #[error("invalid date {value:?} in day event")]
    InvalidDate {
        value: String,
        #[source]
        source: DateParseError,
    },
}

/// Error returned for a date string that is neither `YYYY-MM-DD` nor an RFC
/// 3339 timestamp
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("expected YYYY-MM-DD or an RFC 3339 timestamp: {0}")]
pub struct DateParseError(#[from] pub time::error::Parse);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    #[error("weeks_displayed must be between {min} and {max}, got {got}")]
    Weeks { got: usize, min: usize, max: usize },
    #[error("invalid date format {pattern:?}")]
    Format {
        pattern: String,
        #[source]
        source: time::error::InvalidFormatDescription,
    },
    #[error("date format {pattern:?} cannot be applied to a calendar date")]
    Unformattable {
        pattern: String,
        #[source]
        source: time::error::Format,
    },
    #[error("invalid date for {field}: {value:?}")]
    Date {
        field: &'static str,
        value: String,
        #[source]
        source: DateParseError,
    },
    #[error("invalid weekday {0:?}")]
    Weekday(String),
}

/// A write to the state store that would break its invariants
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot set {0} while the picker is closed")]
pub struct StateError(pub Field);

/// Failure reported by a disabled-date policy
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{0}")]
pub struct PolicyError(pub String);

impl PolicyError {
    pub fn new<S: Into<String>>(msg: S) -> PolicyError {
        PolicyError(msg.into())
    }
}
