use crate::calendar::{to_iso, DisabledDates, MonthContext, NeverDisabled};
use crate::config::Config;
use crate::error::{EventError, StateError};
use crate::event::Event;
use crate::state::{Changes, Field, Snapshot, StateStore};
use crate::view::{RenderSink, ViewModel, ViewModelBuilder};
use time::{Date, OffsetDateTime};

/// Source of "today", consulted when the picker opens with nothing committed
pub trait Clock {
    fn today(&self) -> Date;
}

/// The local date, or the UTC date if the local offset cannot be determined
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date()
    }
}

/// A fixed date is a clock that never moves
impl Clock for Date {
    fn today(&self) -> Date {
        *self
    }
}

/// Result of feeding an [`Event`] to a [`DatePicker`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The event does not apply in the current state
    Ignored,
    /// The event was applied; the listed fields were written and the view was
    /// rebuilt
    Applied(Changes),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// The picker's state machine.
///
/// A `DatePicker` owns its [`StateStore`] and is either closed or open.  While
/// open, a day can be *staged*; only [`Event::Commit`] copies the staged day
/// into the committed value, and closing by any other route throws it away.
#[derive(Clone, Debug)]
pub struct DatePicker<D = NeverDisabled, C = SystemClock> {
    store: StateStore,
    builder: ViewModelBuilder<D>,
    clock: C,
    default_month: Option<Date>,
    view: ViewModel,
}

impl DatePicker {
    /// A picker with no disabled dates that opens on the current month
    pub fn with_defaults(config: &Config) -> DatePicker {
        DatePicker::new(config, NeverDisabled, SystemClock)
    }
}

impl<D: DisabledDates, C: Clock> DatePicker<D, C> {
    pub fn new(config: &Config, policy: D, clock: C) -> DatePicker<D, C> {
        let store = StateStore::new(config.value);
        let builder = ViewModelBuilder::new(config, policy);
        let view = builder.build(&store.snapshot());
        DatePicker {
            store,
            builder,
            clock,
            default_month: config.default_month,
            view,
        }
    }

    pub fn opened(&self) -> bool {
        self.store.opened()
    }

    /// The committed value
    pub fn value(&self) -> Option<Date> {
        self.store.committed_value()
    }

    /// The committed value as an ISO-8601 timestamp
    pub fn value_iso(&self) -> Option<String> {
        self.value().map(to_iso)
    }

    pub fn state(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// The view model built after the most recent state change
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn policy(&self) -> &D {
        self.builder.policy()
    }

    /// Parses a classified interaction and applies it.  Malformed input is
    /// rejected without touching the state.
    pub fn dispatch(&mut self, event: &str) -> Result<Outcome, EventError> {
        let event = event.parse::<Event>().inspect_err(|e| {
            tracing::warn!(error = %e, "rejected malformed event");
        })?;
        Ok(self.handle(event))
    }

    /// Applies `event` and, if anything changed, hands the new view to `sink`
    pub fn handle_and_render<S: RenderSink>(&mut self, event: Event, sink: &mut S) -> Outcome {
        let outcome = self.handle(event);
        if outcome.is_applied() {
            sink.render(&self.view);
        }
        outcome
    }

    /// Applies `event` to the state machine.  Writes made by the transition
    /// are batched, and the view is rebuilt once from the final state.
    ///
    /// Opening shows the month of the committed value, clamped as by
    /// [`MonthContext::containing`]: a value after October 9999 opens on
    /// October 9999 with no cell selected.
    pub fn handle(&mut self, event: Event) -> Outcome {
        let result = self.transition(event);
        debug_assert!(result.is_ok(), "transition broke the state store: {result:?}");
        let applied = match result {
            Ok(applied) => applied,
            Err(e) => {
                tracing::error!(?event, error = %e, "transition broke the state store");
                true
            }
        };
        self.store.enforce_invariants();
        let changes = self.store.take_changes();
        if !applied && changes.is_empty() {
            tracing::trace!(?event, "event ignored");
            return Outcome::Ignored;
        }
        tracing::debug!(?event, state = ?self.store.snapshot(), "applied event");
        self.view = self.builder.build(&self.store.snapshot());
        Outcome::Applied(changes)
    }

    // Returns `Ok(false)` if the event does not apply in the current state
    fn transition(&mut self, event: Event) -> Result<bool, StateError> {
        let store = &mut self.store;
        match (store.opened(), event) {
            (false, Event::OpenRequested) => {
                let anchor = store
                    .committed_value()
                    .or(self.default_month)
                    .unwrap_or_else(|| self.clock.today());
                store.set_opened(true);
                store.set_month_context(Some(MonthContext::containing(anchor)))?;
                store.set_staged_value(None)?;
            }
            (true, Event::Previous) => {
                let Some(month) = store.month_context() else {
                    return Err(StateError(Field::MonthContext));
                };
                match month.previous() {
                    Ok(prev) => store.set_month_context(Some(prev))?,
                    Err(e) => {
                        tracing::warn!(%month, error = %e, "cannot go back any further");
                        return Ok(false);
                    }
                }
            }
            (true, Event::Next) => {
                let Some(month) = store.month_context() else {
                    return Err(StateError(Field::MonthContext));
                };
                match month.next() {
                    Ok(next) => store.set_month_context(Some(next))?,
                    Err(e) => {
                        tracing::warn!(%month, error = %e, "cannot go forward any further");
                        return Ok(false);
                    }
                }
            }
            (true, Event::DayPicked(date)) => store.set_staged_value(Some(date))?,
            (true, Event::Commit) => {
                if let Some(staged) = store.staged_value() {
                    store.set_committed_value(Some(staged));
                }
                close(store)?;
            }
            (true, Event::Discard) => close(store)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn close(store: &mut StateStore) -> Result<(), StateError> {
    store.set_staged_value(None)?;
    store.set_month_context(None)?;
    store.set_opened(false);
    Ok(())
}
