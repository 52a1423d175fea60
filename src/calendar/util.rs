use std::iter::successors;
use time::{Date, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;

    /// Number of days from `first` forwards to `self`, in `0..7`
    fn days_since(&self, first: Weekday) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }

    fn days_since(&self, first: Weekday) -> u8 {
        (self.index0() + 7 - first.index0()) % 7
    }
}

/// Two-letter labels for the seven days of the week, starting at `first`
pub(crate) fn weekday_labels(first: Weekday) -> [&'static str; DAYS_IN_WEEK] {
    let mut labels = [""; DAYS_IN_WEEK];
    let mut wd = first;
    for slot in &mut labels {
        *slot = short_name(wd);
        wd = wd.next();
    }
    labels
}

fn short_name(wd: Weekday) -> &'static str {
    match wd {
        Weekday::Sunday => "Su",
        Weekday::Monday => "Mo",
        Weekday::Tuesday => "Tu",
        Weekday::Wednesday => "We",
        Weekday::Thursday => "Th",
        Weekday::Friday => "Fr",
        Weekday::Saturday => "Sa",
    }
}

pub(crate) fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_ascii_lowercase().as_str() {
        "sunday" | "sun" | "su" => Some(Weekday::Sunday),
        "monday" | "mon" | "mo" => Some(Weekday::Monday),
        "tuesday" | "tue" | "tu" => Some(Weekday::Tuesday),
        "wednesday" | "wed" | "we" => Some(Weekday::Wednesday),
        "thursday" | "thu" | "th" => Some(Weekday::Thursday),
        "friday" | "fri" | "fr" => Some(Weekday::Friday),
        "saturday" | "sat" | "sa" => Some(Weekday::Saturday),
        _ => None,
    }
}

pub(crate) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

pub(crate) fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}

/// Renders a calendar date as the ISO-8601 timestamp exchanged with hosts
pub fn to_iso(date: Date) -> String {
    format!("{date}T00:00:00Z")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Weekday::*;

    #[test]
    fn test_days_since() {
        assert_eq!(Thursday.days_since(Sunday), 4);
        assert_eq!(Sunday.days_since(Sunday), 0);
        assert_eq!(Sunday.days_since(Monday), 6);
        assert_eq!(Monday.days_since(Monday), 0);
        assert_eq!(Saturday.days_since(Monday), 5);
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(
            weekday_labels(Sunday),
            ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        );
        assert_eq!(
            weekday_labels(Monday),
            ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
        );
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Saturday"), Some(Saturday));
        assert_eq!(parse_weekday("mon"), Some(Monday));
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn test_iter_days_across_year() {
        let mut after = iter_days_after(date!(2023 - 12 - 30));
        assert_eq!(after.next(), Some(date!(2023 - 12 - 31)));
        assert_eq!(after.next(), Some(date!(2024 - 01 - 01)));
        let mut before = iter_days_before(date!(2024 - 03 - 01));
        assert_eq!(before.next(), Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn test_to_iso() {
        assert_eq!(to_iso(date!(2024 - 03 - 15)), "2024-03-15T00:00:00Z");
    }
}
