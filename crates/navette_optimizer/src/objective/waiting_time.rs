use fxhash::FxHashMap;
use smallvec::SmallVec;

use crate::problem::demand;
use crate::problem::direction::Direction;
use crate::problem::plan::Plan;
use crate::problem::shuttle_problem::ShuttleProblem;

#[derive(Copy, Clone, Debug)]
struct Rider {
    arrival: i64,
    stops_to_ride: u32,
}

/// Scores a plan by replaying passenger boardings along the route.
///
/// The demand set is grouped once by (direction, boarding stop), each bucket
/// in canonical arrival order. A single evaluation only allocates per-bucket
/// cursors and an onboard list, so `cost` takes `&self` and concurrent
/// evaluations never share mutable state. This is the hot path of every
/// search strategy.
pub struct WaitingTimeObjective {
    buckets: Vec<Vec<Rider>>,
    bucket_for: FxHashMap<(Direction, usize), usize>,
    travel_times: Vec<i64>,
    vehicle_capacity: usize,
    service_end: i64,
    num_requests: usize,
}

impl WaitingTimeObjective {
    pub fn new(problem: &ShuttleProblem) -> Self {
        debug_assert!(demand::is_canonically_sorted(problem.demand()));

        let mut buckets: Vec<Vec<Rider>> = Vec::new();
        let mut bucket_for: FxHashMap<(Direction, usize), usize> = FxHashMap::default();

        for request in problem.demand() {
            let key = (request.direction(), request.boarding_stop());
            let bucket_index = *bucket_for.entry(key).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[bucket_index].push(Rider {
                arrival: request.arrival(),
                stops_to_ride: request.stops_to_ride(),
            });
        }

        WaitingTimeObjective {
            buckets,
            bucket_for,
            travel_times: problem.route().travel_times().to_vec(),
            vehicle_capacity: problem.vehicle_capacity(),
            service_end: problem.service_window().end(),
            num_requests: problem.demand().len(),
        }
    }

    pub fn num_requests(&self) -> usize {
        self.num_requests
    }

    /// Total waiting seconds for `plan`, including the close-of-service
    /// charge for passengers no trip ever picks up.
    ///
    /// Trips are replayed in plan order; callers that care about
    /// chronological semantics keep their plans departure-sorted. At each
    /// stop, riders already onboard tick down one stop and alight at zero
    /// before new riders board; a rider admitted here starts ticking at the
    /// next stop. Boarding admits the bucket prefix that arrived strictly
    /// before the bus, in arrival order, while seats remain.
    pub fn cost(&self, plan: &Plan) -> i64 {
        let mut cursors = vec![0usize; self.buckets.len()];
        let mut onboard: SmallVec<[u32; 16]> = SmallVec::new();
        let mut total: i64 = 0;

        for trip in plan {
            onboard.clear();
            let mut bus_arrival = trip.departure();

            for step in 0..=self.travel_times.len() {
                if step > 0 {
                    bus_arrival += self.travel_times[step - 1];
                }
                let stop = step + 1;

                onboard.retain(|remaining| {
                    *remaining -= 1;
                    *remaining > 0
                });

                let Some(&bucket_index) = self.bucket_for.get(&(trip.direction(), stop)) else {
                    continue;
                };
                let riders = &self.buckets[bucket_index];
                let cursor = &mut cursors[bucket_index];

                while *cursor < riders.len()
                    && onboard.len() < self.vehicle_capacity
                    && riders[*cursor].arrival < bus_arrival
                {
                    let rider = riders[*cursor];
                    *cursor += 1;
                    total += (bus_arrival - rider.arrival).min(self.service_end - rider.arrival);
                    onboard.push(rider.stops_to_ride);
                }
            }
        }

        for (bucket_index, riders) in self.buckets.iter().enumerate() {
            for rider in &riders[cursors[bucket_index]..] {
                total += self.service_end - rider.arrival;
            }
        }

        total
    }

    /// The unit the search strategies compare in: waiting hours per
    /// passenger, rounded to five decimals.
    pub fn fitness(&self, plan: &Plan) -> f64 {
        self.normalized(self.cost(plan))
    }

    /// Normalizes a raw waiting-second total into fitness units.
    pub fn normalized(&self, cost: i64) -> f64 {
        let normalized = cost as f64 / (3600.0 * self.num_requests as f64);
        (normalized * 1e5).round() / 1e5
    }
}
