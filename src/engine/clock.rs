//! Wall-clock source.

use chrono::Utc;

use crate::common::Instant;

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Utc::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::{TimeDelta, TimeZone, Utc};

    use super::Clock;
    use crate::common::Instant;

    /// Clock advanced by hand; clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Rc<Cell<Instant>>,
    }

    impl ManualClock {
        pub fn new(start: Instant) -> Self {
            Self {
                now: Rc::new(Cell::new(start)),
            }
        }

        /// A fixed, arbitrary starting point.
        pub fn at_epoch() -> Self {
            Self::new(Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap())
        }

        pub fn advance_millis(&self, millis: i64) {
            self.now.set(self.now.get() + TimeDelta::milliseconds(millis));
        }

        pub fn advance_secs(&self, secs: i64) {
            self.advance_millis(secs * 1000);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.now.get()
        }
    }
}
