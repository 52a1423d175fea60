//! State and navigation engine for a month-grid date picker.
//!
//! A [`DatePicker`] consumes classified interaction [`Event`]s, keeps the
//! committed value apart from the day staged during an open session, and
//! produces a [`ViewModel`] with a fixed-size grid of [`DayCell`]s for whichever
//! month is being browsed.  Drawing the view and classifying raw input are left
//! to the host.
pub mod calendar;
pub mod config;
mod controller;
pub mod error;
mod event;
pub mod state;
mod view;
pub use crate::calendar::{DisabledDates, DisabledRules, MonthContext, NeverDisabled};
pub use crate::config::{Config, Settings};
pub use crate::controller::{Clock, DatePicker, Outcome, SystemClock};
pub use crate::event::{parse_date, Event};
pub use crate::view::{DayCell, PolicyFailure, RenderSink, ViewModel, ViewModelBuilder};
