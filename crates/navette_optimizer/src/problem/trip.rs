use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A single scheduled run of the route: a departure instant (seconds since
/// midnight of the service day), a direction and the fixed tour duration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    departure: i64,
    duration: i64,
    direction: Direction,
}

impl Trip {
    pub fn new(departure: i64, duration: i64, direction: Direction) -> Self {
        Trip {
            departure,
            duration,
            direction,
        }
    }

    pub fn departure(&self) -> i64 {
        self.departure
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn start(&self) -> i64 {
        self.departure
    }

    pub fn end(&self) -> i64 {
        self.departure + self.duration
    }

    pub fn with_departure(&self, departure: i64) -> Trip {
        Trip { departure, ..*self }
    }

    pub fn flipped(&self) -> Trip {
        Trip {
            direction: self.direction.opposite(),
            ..*self
        }
    }
}
