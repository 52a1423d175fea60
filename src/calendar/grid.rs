use super::month::{MonthContext, MAX_WEEKS};
use super::util::{iter_days_after, iter_days_before, WeekdayExt, DAYS_IN_WEEK};
use std::iter::once;
use time::{Date, Weekday};

/// Returns `cell_count` consecutive dates, beginning with the last `first_day`
/// on or before the first day of `month`.
///
/// `cell_count` is capped at [`MAX_WEEKS`] weeks' worth of cells; up to that
/// cap the result always has exactly `cell_count` entries.
pub fn generate(month: MonthContext, first_day: Weekday, cell_count: usize) -> Vec<Date> {
    let limit = cells_for_weeks(MAX_WEEKS);
    if cell_count > limit {
        tracing::warn!(cell_count, limit, "grid size capped");
    }
    let start = grid_start(month, first_day);
    once(start)
        .chain(iter_days_after(start))
        .take(cell_count.min(limit))
        .collect()
}

/// Number of cells for a grid of `weeks` rows
pub fn cells_for_weeks(weeks: usize) -> usize {
    weeks * DAYS_IN_WEEK
}

// `MonthContext` guarantees at least six representable days before the start
// of its month, so this never falls off the front of time.
fn grid_start(month: MonthContext, first_day: Weekday) -> Date {
    let month_start = month.start();
    let leading = usize::from(month_start.weekday().days_since(first_day));
    if leading == 0 {
        month_start
    } else {
        iter_days_before(month_start)
            .nth(leading - 1)
            .expect("MonthContext should leave a week of days before its start")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Month;
    use time::Weekday::*;

    fn month(year: i32, m: Month) -> MonthContext {
        MonthContext::containing(Date::from_calendar_date(year, m, 1).unwrap())
    }

    fn all_months() -> impl Iterator<Item = MonthContext> {
        // 2023 is not a leap year, 2024 is
        [2023, 2024].into_iter().flat_map(|year| {
            let mut m = Month::January;
            (0..12).map(move |_| {
                let ctx = month(year, m);
                m = m.next();
                ctx
            })
        })
    }

    #[test]
    fn test_length_is_constant() {
        for ctx in all_months() {
            for weeks in [6, 7, MAX_WEEKS] {
                for first_day in [Sunday, Monday, Saturday] {
                    let grid = generate(ctx, first_day, cells_for_weeks(weeks));
                    assert_eq!(grid.len(), weeks * 7, "{ctx} with {weeks} weeks");
                }
            }
        }
    }

    #[test]
    fn test_dates_are_consecutive() {
        for ctx in all_months() {
            let grid = generate(ctx, Sunday, 42);
            for pair in grid.windows(2) {
                assert_eq!(pair[0].next_day(), Some(pair[1]), "{ctx}");
            }
        }
    }

    #[test]
    fn test_starts_on_week_boundary() {
        for ctx in all_months() {
            for first_day in [Sunday, Monday, Wednesday] {
                let grid = generate(ctx, first_day, 42);
                assert_eq!(grid[0].weekday(), first_day, "{ctx}");
                assert!(grid[0] <= ctx.start(), "{ctx}");
                assert!(grid[6] >= ctx.start(), "{ctx}");
            }
        }
    }

    #[test]
    fn test_month_is_contiguous_and_complete() {
        for ctx in all_months() {
            let grid = generate(ctx, Sunday, 42);
            let inside = grid
                .iter()
                .enumerate()
                .filter(|(_, d)| ctx.contains(**d))
                .map(|(i, _)| i)
                .collect::<Vec<_>>();
            assert!(!inside.is_empty(), "{ctx}");
            let first = inside[0];
            let last = inside[inside.len() - 1];
            assert_eq!(last - first + 1, inside.len(), "{ctx} is not contiguous");
            assert_eq!(grid[first], ctx.start(), "{ctx}");
            assert_eq!(grid[last], ctx.end(), "{ctx}");
        }
    }

    #[test]
    fn test_february_2024_alignment() {
        // February 2024 starts on a Thursday
        let grid = generate(month(2024, Month::February), Sunday, 42);
        assert_eq!(
            grid[..5],
            [
                date!(2024 - 01 - 28),
                date!(2024 - 01 - 29),
                date!(2024 - 01 - 30),
                date!(2024 - 01 - 31),
                date!(2024 - 02 - 01),
            ]
        );
        assert_eq!(grid[41], date!(2024 - 03 - 09));
    }

    #[test]
    fn test_month_starting_on_first_day_has_no_leading_days() {
        // September 2024 starts on a Sunday
        let grid = generate(month(2024, Month::September), Sunday, 42);
        assert_eq!(grid[0], date!(2024 - 09 - 01));
        // ... and on a Monday when weeks start on Monday
        let grid = generate(month(2024, Month::January), Monday, 42);
        assert_eq!(grid[0], date!(2024 - 01 - 01));
    }

    #[test]
    fn test_spills_into_third_month() {
        // November 2024 starts on a Friday: the grid runs from late October
        // into December
        let grid = generate(month(2024, Month::November), Sunday, 42);
        assert_eq!(grid[0], date!(2024 - 10 - 27));
        assert_eq!(grid[41], date!(2024 - 12 - 07));
    }

    #[test]
    fn test_short_month_gets_two_trailing_weeks() {
        // February 2026 starts on a Sunday and has only 28 days
        let grid = generate(month(2026, Month::February), Sunday, 42);
        assert_eq!(grid[0], date!(2026 - 02 - 01));
        assert_eq!(grid[28], date!(2026 - 03 - 01));
        assert_eq!(grid[41], date!(2026 - 03 - 14));
    }

    #[test]
    fn test_across_year_end() {
        let grid = generate(month(2024, Month::December), Sunday, 42);
        assert_eq!(grid[0], date!(2024 - 12 - 01));
        assert!(grid.contains(&date!(2025 - 01 - 01)));
        assert_eq!(grid[41], date!(2025 - 01 - 11));
    }

    #[test]
    fn test_edges_of_time() {
        let cells = cells_for_weeks(MAX_WEEKS);
        assert_eq!(
            generate(MonthContext::containing(Date::MIN), Saturday, cells).len(),
            cells
        );
        assert_eq!(
            generate(MonthContext::containing(Date::MAX), Sunday, cells).len(),
            cells
        );
    }

    #[test]
    fn test_oversized_request_is_capped() {
        let cells = cells_for_weeks(MAX_WEEKS);
        assert_eq!(
            generate(MonthContext::containing(Date::MAX), Sunday, 200).len(),
            cells
        );
        assert_eq!(generate(month(2024, Month::March), Sunday, 200).len(), cells);
    }
}
