use smallvec::SmallVec;

use crate::problem::trip::Trip;

/// One physical unit and the trips it covers, kept sorted by departure.
/// Vehicles are derived from a plan on demand and never outlive it.
#[derive(Clone, Debug, Default)]
pub struct Vehicle {
    trips: SmallVec<[Trip; 4]>,
}

impl Vehicle {
    pub fn with_trip(trip: Trip) -> Self {
        let mut trips = SmallVec::new();
        trips.push(trip);
        Vehicle { trips }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Whether this vehicle can also run `trip`.
    ///
    /// The trip's reservation window starts as `[start, end)` and is widened
    /// by its immediate neighbors in the hypothetical departure-sorted
    /// sequence: a same-direction predecessor pulls the start back by the
    /// predecessor's duration (the unit needs a full return leg first), a
    /// same-direction successor pushes the end forward by the trip's own
    /// duration. The widened window must not overlap any reserved trip;
    /// directions are already folded into the widening and play no part in
    /// the overlap test.
    pub fn accepts(&self, trip: &Trip) -> bool {
        let position = self
            .trips
            .partition_point(|existing| existing.departure() <= trip.departure());

        let mut reservation_start = trip.start();
        let mut reservation_end = trip.end();

        if position > 0 && self.trips[position - 1].direction() == trip.direction() {
            reservation_start -= self.trips[position - 1].duration();
        }
        if position < self.trips.len() && self.trips[position].direction() == trip.direction() {
            reservation_end += trip.duration();
        }

        self.trips
            .iter()
            .all(|existing| existing.end() <= reservation_start || existing.start() >= reservation_end)
    }

    /// Adds a trip at its departure-sorted position. Callers check
    /// `accepts` first; the sort invariant holds either way.
    pub fn push(&mut self, trip: Trip) {
        let position = self
            .trips
            .partition_point(|existing| existing.departure() <= trip.departure());
        self.trips.insert(position, trip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::direction::Direction;

    #[test]
    fn test_accepts_disjoint_opposite_directions() {
        let vehicle = Vehicle::with_trip(Trip::new(0, 600, Direction::Outbound));
        let back = Trip::new(600, 600, Direction::Inbound);

        assert!(vehicle.accepts(&back));
    }

    #[test]
    fn test_same_direction_needs_return_leg() {
        let vehicle = Vehicle::with_trip(Trip::new(0, 600, Direction::Outbound));

        // Departing one full tour after the first run is the earliest
        // same-direction follow-up.
        assert!(vehicle.accepts(&Trip::new(1200, 600, Direction::Outbound)));
        assert!(!vehicle.accepts(&Trip::new(1199, 600, Direction::Outbound)));
    }

    #[test]
    fn test_same_direction_successor_pushes_end() {
        let vehicle = Vehicle::with_trip(Trip::new(1200, 600, Direction::Outbound));

        assert!(!vehicle.accepts(&Trip::new(300, 600, Direction::Outbound)));
        assert!(vehicle.accepts(&Trip::new(0, 600, Direction::Outbound)));
    }

    #[test]
    fn test_rejects_plain_overlap() {
        let vehicle = Vehicle::with_trip(Trip::new(0, 600, Direction::Outbound));

        assert!(!vehicle.accepts(&Trip::new(300, 600, Direction::Inbound)));
    }

    #[test]
    fn test_push_keeps_departure_order() {
        let mut vehicle = Vehicle::with_trip(Trip::new(1200, 600, Direction::Outbound));
        vehicle.push(Trip::new(0, 600, Direction::Outbound));

        assert_eq!(vehicle.trips()[0].departure(), 0);
        assert_eq!(vehicle.trips()[1].departure(), 1200);
    }
}
