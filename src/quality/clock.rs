use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current date and time for the controller.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Local calendar date, used for certificate validity.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
