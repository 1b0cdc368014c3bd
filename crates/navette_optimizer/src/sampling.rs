use rand::Rng;

use crate::problem::demand::{self, DemandRequest};
use crate::problem::peaks::{DirectionSplit, PeakProfile};
use crate::problem::route_profile::RouteProfile;

/// Draws a synthetic demand instance: directions from the split, boarding
/// stops uniform in the riding order of each direction, ride lengths
/// bounded by the remaining stops, arrivals from the weighted peak periods
/// (to the second). The result is in canonical (direction, arrival) order.
pub fn sample_demand<R: Rng>(
    route: &RouteProfile,
    peaks: &PeakProfile,
    split: &DirectionSplit,
    num_requests: usize,
    rng: &mut R,
) -> Vec<DemandRequest> {
    let num_stops = route.num_stops();

    let mut requests: Vec<DemandRequest> = (0..num_requests)
        .map(|_| {
            let direction = split.sample(rng);
            let boarding_stop = rng.random_range(1..num_stops);
            let stops_to_ride = rng.random_range(1..=(num_stops - boarding_stop)) as u32;
            let arrival = peaks.sample_instant(rng) + rng.random_range(0..60);

            DemandRequest::new(boarding_stop, arrival, stops_to_ride, direction)
        })
        .collect();

    demand::sort_canonically(&mut requests);
    requests
}
