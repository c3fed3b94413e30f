//! Validity date computation.

use chrono::{Local, Months, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

/// Certificates stay valid for this many calendar months.
pub const VALIDITY_MONTHS: u32 = 3;

/// Format of the date stamped onto the certificate, e.g. `30.04.2025`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Source of "now" for the dialog.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the server's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// Add [`VALIDITY_MONTHS`] calendar months to `issued_on`.
///
/// The day of month is kept when the target month has it and clamped to the
/// month's last day otherwise (31 Jan -> 30 Apr). `None` only at the upper
/// bound of the representable calendar.
pub fn valid_until(issued_on: NaiveDate) -> Option<NaiveDate> {
    issued_on.checked_add_months(Months::new(VALIDITY_MONTHS))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
