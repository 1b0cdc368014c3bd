use serde::{Deserialize, Serialize};

use super::trip::Trip;

/// A candidate schedule: trips kept sorted by departure instant. Every
/// mutation path re-establishes the ordering before the plan is handed
/// back out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    trips: Vec<Trip>,
}

impl Plan {
    pub fn new() -> Self {
        Plan { trips: Vec::new() }
    }

    /// Builds a plan from arbitrary trips, sorting them by departure.
    pub fn from_trips(mut trips: Vec<Trip>) -> Self {
        trips.sort_by_key(Trip::departure);
        Plan { trips }
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

    pub fn get(&self, index: usize) -> Option<&Trip> {
        self.trips.get(index)
    }

    /// Removes and returns the trip at `index`. Order of the remainder is
    /// preserved.
    pub fn remove(&mut self, index: usize) -> Trip {
        self.trips.remove(index)
    }

    /// Inserts a trip at its departure-sorted position (after equal
    /// departures).
    pub fn insert_sorted(&mut self, trip: Trip) {
        let position = self
            .trips
            .partition_point(|existing| existing.departure() <= trip.departure());
        self.trips.insert(position, trip);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }
}

impl FromIterator<Trip> for Plan {
    fn from_iter<I: IntoIterator<Item = Trip>>(iter: I) -> Self {
        Plan::from_trips(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
