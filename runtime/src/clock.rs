//! Wall clock.
//!
//! The engine stamps its log and output with the local date and time,
//! queried through four primitives when a run starts. Every call reads the
//! live wall clock; nothing is cached, so a run crossing midnight sees the
//! date change.

use chrono::{Datelike, Local, Timelike};

/// Minutes since local midnight (`60 * hour + minute`).
pub fn current_minutes() -> i32 {
    let now = Local::now();
    (now.hour() * 60 + now.minute()) as i32
}

/// Day of the month, 1-based.
pub fn current_day() -> i32 {
    Local::now().day() as i32
}

/// Month, 1-based.
pub fn current_month() -> i32 {
    Local::now().month() as i32
}

/// Full year.
pub fn current_year() -> i32 {
    Local::now().year()
}
