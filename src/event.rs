use crate::error::{DateParseError, EventError};
use std::str::FromStr;
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// An interaction, already classified by the host's event router
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Event {
    /// The launcher was activated
    OpenRequested,
    Previous,
    Next,
    /// A day cell was chosen; stages the date without committing it
    DayPicked(Date),
    Commit,
    /// Cancel, or focus left the widget
    Discard,
}

impl FromStr for Event {
    type Err = EventError;

    /// Parses the router's classification: `open` (or `open-requested`),
    /// `previous`, `next`, `day:<date>`, `commit`, or `discard`, where
    /// `<date>` is `YYYY-MM-DD` or an RFC 3339 timestamp.
    fn from_str(s: &str) -> Result<Event, EventError> {
        match s.trim() {
            "open" | "open-requested" => Ok(Event::OpenRequested),
            "previous" => Ok(Event::Previous),
            "next" => Ok(Event::Next),
            "commit" => Ok(Event::Commit),
            "discard" => Ok(Event::Discard),
            other => match other.strip_prefix("day:") {
                Some(value) => parse_date(value)
                    .map(Event::DayPicked)
                    .map_err(|source| EventError::InvalidDate {
                        value: value.to_owned(),
                        source,
                    }),
                None => Err(EventError::Unrecognized(other.to_owned())),
            },
        }
    }
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into the calendar date it
/// names.  Timestamps keep their own offset's date; no time zone conversion is
/// done.
pub fn parse_date(s: &str) -> Result<Date, DateParseError> {
    let s = s.trim();
    if s.len() > 10 {
        Ok(OffsetDateTime::parse(s, &Rfc3339)?.date())
    } else {
        Ok(Date::parse(s, &YMD_FMT)?)
    }
}
