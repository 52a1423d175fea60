use crate::calendar::{
    cells_for_weeks, generate, to_iso, weekday_labels, DisabledDates, MonthContext, DAYS_IN_WEEK,
};
use crate::config::{Config, DateFormat};
use crate::error::PolicyError;
use crate::state::Snapshot;
use time::{Date, Weekday};

/// One day of the grid, derived from scratch on every rebuild
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DayCell {
    pub date: Date,
    pub day_of_month: u8,
    pub is_selected: bool,
    pub is_outside_current_month: bool,
    pub is_disabled: bool,
}

impl DayCell {
    pub fn iso_date(&self) -> String {
        to_iso(self.date)
    }
}

/// A date for which the disabled-date policy failed; its cell was shown as
/// enabled
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyFailure {
    pub date: Date,
    pub error: PolicyError,
}

/// Everything a host needs to draw the picker
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewModel {
    pub opened: bool,
    /// The displayed month; empty while closed
    pub header_text: String,
    /// The committed value, or the placeholder if nothing is committed
    pub launcher_text: String,
    pub weekday_labels: [&'static str; DAYS_IN_WEEK],
    /// Row-major, `weeks_displayed * 7` cells while open; empty while closed
    pub grid: Vec<DayCell>,
    pub policy_failures: Vec<PolicyFailure>,
}

impl ViewModel {
    pub fn selected_index(&self) -> Option<usize> {
        self.grid.iter().position(|c| c.is_selected)
    }

    /// The grid split into weeks
    pub fn weeks(&self) -> std::slice::Chunks<'_, DayCell> {
        self.grid.chunks(DAYS_IN_WEEK)
    }
}

/// Receives a fresh view model after every state change
pub trait RenderSink {
    fn render(&mut self, view: &ViewModel);
}

impl RenderSink for Vec<ViewModel> {
    fn render(&mut self, view: &ViewModel) {
        self.push(view.clone());
    }
}

#[derive(Clone, Debug)]
pub struct ViewModelBuilder<D> {
    cell_count: usize,
    first_day: Weekday,
    header_format: DateFormat,
    launcher_format: DateFormat,
    placeholder: String,
    policy: D,
}

impl<D: DisabledDates> ViewModelBuilder<D> {
    pub fn new(config: &Config, policy: D) -> ViewModelBuilder<D> {
        ViewModelBuilder {
            cell_count: cells_for_weeks(config.weeks_displayed),
            first_day: config.first_day_of_week,
            header_format: config.header_format.clone(),
            launcher_format: config.launcher_format.clone(),
            placeholder: config.placeholder.clone(),
            policy,
        }
    }

    pub fn policy(&self) -> &D {
        &self.policy
    }

    /// Builds the view for `state`.  While closed only the launcher text is
    /// computed.
    pub fn build(&self, state: &Snapshot) -> ViewModel {
        let launcher_text = match state.committed_value {
            Some(date) => self.launcher_format.apply(date),
            None => self.placeholder.clone(),
        };
        let mut view = ViewModel {
            opened: state.opened,
            header_text: String::new(),
            launcher_text,
            weekday_labels: weekday_labels(self.first_day),
            grid: Vec::new(),
            policy_failures: Vec::new(),
        };
        if let Some(month) = state.month_context.filter(|_| state.opened) {
            view.header_text = self.header_format.apply(month.start());
            self.fill_grid(&mut view, month, state.selected());
        }
        view
    }

    fn fill_grid(&self, view: &mut ViewModel, month: MonthContext, selected: Option<Date>) {
        view.grid.reserve_exact(self.cell_count);
        for date in generate(month, self.first_day, self.cell_count) {
            let is_disabled = match self.policy.is_disabled(date) {
                Ok(b) => b,
                Err(error) => {
                    tracing::warn!(%date, %error, "disabled-date policy failed; showing date as enabled");
                    view.policy_failures.push(PolicyFailure { date, error });
                    false
                }
            };
            view.grid.push(DayCell {
                date,
                day_of_month: date.day(),
                is_selected: selected == Some(date),
                is_outside_current_month: !month.contains(date),
                is_disabled,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NeverDisabled;
    use crate::config::Settings;
    use std::cell::Cell;
    use time::macros::date;

    fn open_at(month: Date, committed: Option<Date>, staged: Option<Date>) -> Snapshot {
        Snapshot {
            opened: true,
            committed_value: committed,
            staged_value: staged,
            month_context: Some(MonthContext::containing(month)),
        }
    }

    #[test]
    fn test_closed_view() {
        let builder = ViewModelBuilder::new(&Config::default(), NeverDisabled);
        let view = builder.build(&Snapshot {
            committed_value: Some(date!(2024 - 03 - 15)),
            ..Snapshot::default()
        });
        assert!(!view.opened);
        assert_eq!(view.launcher_text, "15.03.2024");
        assert_eq!(view.header_text, "");
        assert!(view.grid.is_empty());
    }

    #[test]
    fn test_placeholder() {
        let config = Settings {
            placeholder: String::from("Pick a date"),
            ..Settings::default()
        }
        .validate()
        .unwrap();
        let builder = ViewModelBuilder::new(&config, NeverDisabled);
        let view = builder.build(&Snapshot::default());
        assert_eq!(view.launcher_text, "Pick a date");
    }

    #[test]
    fn test_open_view() {
        let builder = ViewModelBuilder::new(&Config::default(), NeverDisabled);
        let view = builder.build(&open_at(
            date!(2024 - 02 - 01),
            Some(date!(2024 - 02 - 14)),
            None,
        ));
        assert!(view.opened);
        assert_eq!(view.header_text, "February 2024");
        assert_eq!(view.weekday_labels[0], "Su");
        assert_eq!(view.grid.len(), 42);
        assert_eq!(view.weeks().count(), 6);
        for cell in &view.grid[..4] {
            assert!(cell.is_outside_current_month, "{cell:?}");
        }
        assert_eq!(view.grid[4].date, date!(2024 - 02 - 01));
        assert_eq!(view.grid[4].day_of_month, 1);
        assert!(!view.grid[4].is_outside_current_month);
        assert_eq!(view.grid[4].iso_date(), "2024-02-01T00:00:00Z");
        assert_eq!(view.selected_index(), Some(17));
        assert_eq!(view.grid[17].date, date!(2024 - 02 - 14));
    }

    #[test]
    fn test_staged_value_wins_selection() {
        let builder = ViewModelBuilder::new(&Config::default(), NeverDisabled);
        let view = builder.build(&open_at(
            date!(2024 - 03 - 01),
            Some(date!(2024 - 03 - 15)),
            Some(date!(2024 - 03 - 20)),
        ));
        let selected = view
            .grid
            .iter()
            .filter(|c| c.is_selected)
            .map(|c| c.date)
            .collect::<Vec<_>>();
        assert_eq!(selected, [date!(2024 - 03 - 20)]);
    }

    #[test]
    fn test_selection_outside_grid() {
        let builder = ViewModelBuilder::new(&Config::default(), NeverDisabled);
        let view = builder.build(&open_at(
            date!(2024 - 07 - 01),
            Some(date!(2024 - 03 - 15)),
            None,
        ));
        assert_eq!(view.selected_index(), None);
    }

    #[test]
    fn test_monday_first() {
        let config = Settings {
            first_day_of_week: String::from("monday"),
            weeks_displayed: 7,
            ..Settings::default()
        }
        .validate()
        .unwrap();
        let builder = ViewModelBuilder::new(&config, NeverDisabled);
        let view = builder.build(&open_at(date!(2024 - 02 - 01), None, None));
        assert_eq!(view.weekday_labels[0], "Mo");
        assert_eq!(view.grid.len(), 49);
        assert_eq!(view.grid[0].date, date!(2024 - 01 - 29));
        assert_eq!(view.grid[3].date, date!(2024 - 02 - 01));
    }

    #[test]
    fn test_policy_called_once_per_cell() {
        let calls = Cell::new(0);
        let policy = |d: Date| {
            calls.set(calls.get() + 1);
            d.weekday() == Weekday::Saturday
        };
        let builder = ViewModelBuilder::new(&Config::default(), policy);
        let view = builder.build(&open_at(date!(2024 - 02 - 01), None, None));
        assert_eq!(calls.get(), 42);
        assert!(view.grid[6].is_disabled);
        assert!(!view.grid[5].is_disabled);
        builder.build(&Snapshot::default());
        assert_eq!(calls.get(), 42, "closed rebuilds should not consult the policy");
    }

    struct Flaky;

    impl DisabledDates for Flaky {
        fn is_disabled(&self, date: Date) -> Result<bool, PolicyError> {
            if date.day() == 13 {
                Err(PolicyError::new("unlucky"))
            } else {
                Ok(true)
            }
        }
    }

    #[test]
    fn test_policy_failure_falls_back_to_enabled() {
        let builder = ViewModelBuilder::new(&Config::default(), Flaky);
        let view = builder.build(&open_at(date!(2024 - 09 - 01), None, None));
        assert_eq!(view.grid.len(), 42);
        // September 2024 starts on a Sunday, so the 13th is at index 12
        assert_eq!(view.grid[12].date, date!(2024 - 09 - 13));
        assert!(!view.grid[12].is_disabled);
        assert!(view.grid[11].is_disabled);
        assert_eq!(
            view.policy_failures,
            [PolicyFailure {
                date: date!(2024 - 09 - 13),
                error: PolicyError::new("unlucky"),
            }]
        );
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let builder = ViewModelBuilder::new(&Config::default(), |d: Date| d.day() % 5 == 0);
        let state = open_at(
            date!(2024 - 12 - 01),
            Some(date!(2024 - 12 - 24)),
            Some(date!(2025 - 01 - 02)),
        );
        assert_eq!(builder.build(&state), builder.build(&state));
    }
}
