//! Clock collaborator.
//!
//! All settlement rules compare local wall-clock values: on-time checks use
//! the local time of day, streaks and recurrence use the local calendar
//! date. The engine therefore takes its notion of "now" through this trait
//! as a `NaiveDateTime` in local time, instead of reaching for the system
//! clock ad hoc.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A settable clock with shared handles.
///
/// Clone a handle before passing one into the engine, then `set`/`advance`
/// from the outside to drive deadline and day-boundary behavior. Used by
/// tests and simulation hosts.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<NaiveDateTime>>);

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub fn set(&self, to: NaiveDateTime) {
        self.0.set(to);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}
