use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// One passenger's boarding request: where they wait (1-based stop index in
/// the riding order of their direction), when they arrive at the stop
/// (seconds since midnight), and how many stops they ride.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRequest {
    boarding_stop: usize,
    arrival: i64,
    stops_to_ride: u32,
    direction: Direction,
}

impl DemandRequest {
    pub fn new(boarding_stop: usize, arrival: i64, stops_to_ride: u32, direction: Direction) -> Self {
        DemandRequest {
            boarding_stop,
            arrival,
            stops_to_ride,
            direction,
        }
    }

    pub fn boarding_stop(&self) -> usize {
        self.boarding_stop
    }

    pub fn arrival(&self) -> i64 {
        self.arrival
    }

    pub fn stops_to_ride(&self) -> u32 {
        self.stops_to_ride
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Canonical demand ordering: direction first, then arrival instant.
    pub fn canonical_key(&self) -> (usize, i64) {
        (self.direction.index(), self.arrival)
    }
}

/// Whether a demand slice is in canonical (direction, arrival) order.
pub fn is_canonically_sorted(demand: &[DemandRequest]) -> bool {
    demand
        .windows(2)
        .all(|pair| pair[0].canonical_key() <= pair[1].canonical_key())
}

/// Sorts a demand set into canonical order, keeping the relative order of
/// ties so admission order stays reproducible.
pub fn sort_canonically(demand: &mut [DemandRequest]) {
    demand.sort_by_key(DemandRequest::canonical_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sorting() {
        let mut demand = vec![
            DemandRequest::new(1, 300, 2, Direction::Inbound),
            DemandRequest::new(2, 100, 1, Direction::Outbound),
            DemandRequest::new(1, 200, 1, Direction::Outbound),
        ];

        assert!(!is_canonically_sorted(&demand));
        sort_canonically(&mut demand);
        assert!(is_canonically_sorted(&demand));

        assert_eq!(demand[0].arrival(), 100);
        assert_eq!(demand[1].arrival(), 200);
        assert_eq!(demand[2].direction(), Direction::Inbound);
    }
}
