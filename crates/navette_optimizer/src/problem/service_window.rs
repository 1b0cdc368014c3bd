use serde::{Deserialize, Serialize};

/// The half-open `[start, end)` interval of the service day during which
/// trips may depart, in seconds since midnight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceWindow {
    start: i64,
    end: i64,
}

impl ServiceWindow {
    pub fn new(start: i64, end: i64) -> Self {
        ServiceWindow { start, end }
    }

    /// The original line ran from 06:00 to midnight.
    pub fn full_day() -> Self {
        ServiceWindow {
            start: 6 * 3600,
            end: 24 * 3600,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    pub fn minutes(&self) -> i64 {
        self.duration() / 60
    }

    pub fn contains(&self, instant: i64) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Clamps a departure into the window, leaving the last minute before
    /// close free so the result stays inside the half-open interval.
    pub fn clamp_departure(&self, instant: i64) -> i64 {
        instant.clamp(self.start, self.end - 60)
    }
}
