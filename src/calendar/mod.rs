mod grid;
mod month;
mod util;
pub use self::grid::{cells_for_weeks, generate};
pub use self::month::{MonthContext, MAX_WEEKS};
pub use self::util::to_iso;
pub(crate) use self::util::{parse_weekday, weekday_labels, DAYS_IN_WEEK};
use crate::error::PolicyError;
use time::{Date, Weekday};

/// Decides whether a date is shown as disabled.
///
/// Implementations must be pure: the same date must always give the same
/// answer.  The picker calls the policy exactly once per grid cell on every
/// rebuild.
pub trait DisabledDates {
    fn is_disabled(&self, date: Date) -> Result<bool, PolicyError>;
}

impl<F: Fn(Date) -> bool> DisabledDates for F {
    fn is_disabled(&self, date: Date) -> Result<bool, PolicyError> {
        Ok(self(date))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NeverDisabled;

impl DisabledDates for NeverDisabled {
    fn is_disabled(&self, _date: Date) -> Result<bool, PolicyError> {
        Ok(false)
    }
}

/// Declarative disabled-date policy, as read from a configuration file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DisabledRules {
    pub weekdays: Vec<Weekday>,
    /// Dates strictly before this one are disabled
    pub before: Option<Date>,
    /// Dates strictly after this one are disabled
    pub after: Option<Date>,
}

impl DisabledDates for DisabledRules {
    fn is_disabled(&self, date: Date) -> Result<bool, PolicyError> {
        Ok(self.weekdays.contains(&date.weekday())
            || self.before.is_some_and(|b| date < b)
            || self.after.is_some_and(|a| date > a))
    }
}
