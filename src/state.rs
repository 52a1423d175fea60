use crate::calendar::MonthContext;
use crate::error::StateError;
use std::fmt;
use time::Date;

/// The fields held by a [`StateStore`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    Opened,
    CommittedValue,
    StagedValue,
    MonthContext,
}

impl Field {
    const ALL: [Field; 4] = [
        Field::Opened,
        Field::CommittedValue,
        Field::StagedValue,
        Field::MonthContext,
    ];

    fn bit(self) -> u8 {
        match self {
            Field::Opened => 1,
            Field::CommittedValue => 1 << 1,
            Field::StagedValue => 1 << 2,
            Field::MonthContext => 1 << 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Opened => "opened",
            Field::CommittedValue => "value",
            Field::StagedValue => "staged value",
            Field::MonthContext => "month context",
        };
        f.write_str(name)
    }
}

/// Set of fields written since the last time changes were drained
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Changes(u8);

impl Changes {
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |&f| self.contains(f))
    }

    fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }
}

/// Read-only copy of the store's fields, taken between transitions
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Snapshot {
    pub opened: bool,
    pub committed_value: Option<Date>,
    pub staged_value: Option<Date>,
    pub month_context: Option<MonthContext>,
}

impl Snapshot {
    /// The date to highlight: the staged value if any, else the committed one
    pub fn selected(&self) -> Option<Date> {
        self.staged_value.or(self.committed_value)
    }
}

/// Owner of the picker's four core fields.
///
/// Writes go through setters that validate, store, and record a change
/// notification.  Notifications accumulate until the owner drains them with
/// [`StateStore::take_changes`], which lets one transition's writes be
/// observed as a single batch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StateStore {
    state: Snapshot,
    pending: Changes,
}

impl StateStore {
    pub fn new(committed_value: Option<Date>) -> StateStore {
        StateStore {
            state: Snapshot {
                committed_value,
                ..Snapshot::default()
            },
            pending: Changes::default(),
        }
    }

    pub fn opened(&self) -> bool {
        self.state.opened
    }

    pub fn committed_value(&self) -> Option<Date> {
        self.state.committed_value
    }

    pub fn staged_value(&self) -> Option<Date> {
        self.state.staged_value
    }

    pub fn month_context(&self) -> Option<MonthContext> {
        self.state.month_context
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state
    }

    pub(crate) fn set_opened(&mut self, opened: bool) {
        self.state.opened = opened;
        self.notify(Field::Opened);
    }

    pub(crate) fn set_committed_value(&mut self, value: Option<Date>) {
        self.state.committed_value = value;
        self.notify(Field::CommittedValue);
    }

    /// `None` deletes the staged value.  A present value can only be staged
    /// while the picker is open.
    pub(crate) fn set_staged_value(&mut self, value: Option<Date>) -> Result<(), StateError> {
        if value.is_some() && !self.state.opened {
            return Err(StateError(Field::StagedValue));
        }
        self.state.staged_value = value;
        self.notify(Field::StagedValue);
        Ok(())
    }

    /// `None` deletes the month context.  A present value can only be set
    /// while the picker is open.
    pub(crate) fn set_month_context(
        &mut self,
        value: Option<MonthContext>,
    ) -> Result<(), StateError> {
        if value.is_some() && !self.state.opened {
            return Err(StateError(Field::MonthContext));
        }
        self.state.month_context = value;
        self.notify(Field::MonthContext);
        Ok(())
    }

    /// Returns and clears the fields written since the previous call
    pub(crate) fn take_changes(&mut self) -> Changes {
        std::mem::take(&mut self.pending)
    }

    /// Checks that no open-session field survives while closed.  A violation
    /// is a bug: it panics in debug builds and is repaired (and logged)
    /// otherwise.  Returns `true` if the store was consistent.
    pub(crate) fn enforce_invariants(&mut self) -> bool {
        let consistent = self.state.opened
            || (self.state.staged_value.is_none() && self.state.month_context.is_none());
        debug_assert!(
            consistent,
            "open-session state survived closing: {:?}",
            self.state
        );
        if !consistent {
            tracing::error!(state = ?self.state, "open-session state survived closing; clearing it");
            self.state.staged_value = None;
            self.state.month_context = None;
            self.notify(Field::StagedValue);
            self.notify(Field::MonthContext);
        }
        consistent
    }

    fn notify(&mut self, field: Field) {
        tracing::trace!(%field, "state field written");
        self.pending.insert(field);
    }
}
