//! Calendar months, month ranges and clock sources.

pub mod clock;
pub mod month;

pub use clock::{Clock, ManualClock, SystemClock};
pub use month::{month_range, months_between, Month, MonthRange};
