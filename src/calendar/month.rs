use super::util::{iter_days_after, iter_days_before};
use crate::error::OutOfTimeError;
use std::fmt;
use time::{
    macros::date,
    Date,
    Month::{self, December, January},
};

/// Largest number of weeks a grid may display
pub const MAX_WEEKS: usize = 12;

/// Earliest supported month: a full week of leading days must exist before
/// its first day.
const FIRST_MONTH: Date = date!(-9999 - 02 - 01);

/// Latest supported month: `MAX_WEEKS` weeks of days must exist after its
/// first day.
const LAST_MONTH: Date = date!(9999 - 10 - 01);

/// The month shown by the picker, stored as the first day of that month.
///
/// Invariant: the wrapped date is always day 1 of a month between
/// `FIRST_MONTH` and `LAST_MONTH`, so every grid derived from it is
/// representable.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MonthContext(Date);

impl MonthContext {
    /// Returns the month containing `date`, clamped to the range of months
    /// whose grids can be represented.  Dates in November or December 9999
    /// give October 9999, and dates before February -9999 give February
    /// -9999, so a picker opened on such a date shows a month that does not
    /// contain it.
    pub fn containing(date: Date) -> MonthContext {
        MonthContext(first_of_month(date).clamp(FIRST_MONTH, LAST_MONTH))
    }

    pub fn start(self) -> Date {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> Month {
        self.0.month()
    }

    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Last day of the month
    pub fn end(self) -> Date {
        iter_days_after(self.0)
            .take_while(|&d| self.contains(d))
            .last()
            .unwrap_or(self.0)
    }

    /// The month before this one
    pub fn previous(self) -> Result<MonthContext, OutOfTimeError> {
        if self.0 <= FIRST_MONTH {
            return Err(OutOfTimeError);
        }
        iter_days_before(self.0)
            .next()
            .map(MonthContext::containing)
            .ok_or(OutOfTimeError)
    }

    /// The month after this one
    pub fn next(self) -> Result<MonthContext, OutOfTimeError> {
        if self.0 >= LAST_MONTH {
            return Err(OutOfTimeError);
        }
        let (year, month) = match self.month() {
            December => (self.year() + 1, January),
            m => (self.year(), m.next()),
        };
        Date::from_calendar_date(year, month, 1)
            .map(MonthContext)
            .map_err(|_| OutOfTimeError)
    }
}

impl From<MonthContext> for Date {
    fn from(ctx: MonthContext) -> Date {
        ctx.0
    }
}

impl fmt::Display for MonthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), u8::from(self.month()))
    }
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1)
        .expect("every month should have a first day")
}
