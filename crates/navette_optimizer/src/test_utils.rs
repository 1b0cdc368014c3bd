use crate::problem::demand::{self, DemandRequest};
use crate::problem::direction::Direction;
use crate::problem::peaks::{DirectionSplit, PeakProfile};
use crate::problem::route_profile::RouteProfile;
use crate::problem::shuttle_problem::{ShuttleProblem, ShuttleProblemBuilder};

/// Two stops, one 600s leg, capacity 1. The demand is sorted for the
/// caller so scenarios can list requests in narrative order.
pub fn two_stop_problem(mut requests: Vec<DemandRequest>) -> ShuttleProblem {
    demand::sort_canonically(&mut requests);

    let mut builder = ShuttleProblemBuilder::default();
    builder
        .set_route(RouteProfile::new(vec![600]))
        .set_demand(requests)
        .set_fleet_cap(5)
        .set_vehicle_capacity(1)
        .set_target_trips(2);

    builder.build().unwrap()
}

/// A small but non-trivial instance for exercising the search strategies:
/// four stops, a handful of riders in both directions, a fleet of three.
pub fn small_search_problem() -> ShuttleProblem {
    let mut requests = vec![
        DemandRequest::new(1, 6 * 3600 + 600, 3, Direction::Outbound),
        DemandRequest::new(2, 7 * 3600, 1, Direction::Outbound),
        DemandRequest::new(1, 8 * 3600 + 300, 2, Direction::Outbound),
        DemandRequest::new(3, 9 * 3600, 1, Direction::Outbound),
        DemandRequest::new(1, 7 * 3600 + 120, 2, Direction::Inbound),
        DemandRequest::new(2, 8 * 3600, 2, Direction::Inbound),
        DemandRequest::new(1, 17 * 3600, 3, Direction::Inbound),
        DemandRequest::new(3, 18 * 3600 + 60, 1, Direction::Inbound),
    ];
    demand::sort_canonically(&mut requests);

    let mut builder = ShuttleProblemBuilder::default();
    builder
        .set_route(RouteProfile::new(vec![180, 240, 120]))
        .set_demand(requests)
        .set_fleet_cap(3)
        .set_vehicle_capacity(30)
        .set_target_trips(6)
        .set_peaks(PeakProfile::commuter_day())
        .set_direction_split(DirectionSplit::even());

    builder.build().unwrap()
}
