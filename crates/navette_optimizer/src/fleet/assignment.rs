use crate::problem::plan::Plan;

use super::vehicle::Vehicle;

/// Packs a plan onto vehicles greedily: trips in plan order, each placed on
/// the first existing vehicle that accepts it, a fresh vehicle otherwise.
/// First-fit in creation order is deliberate: the feasibility guard and
/// every mutation loop depend on this exact packing.
pub fn assign(plan: &Plan) -> Vec<Vehicle> {
    let mut vehicles: Vec<Vehicle> = Vec::new();

    for trip in plan {
        match vehicles.iter_mut().find(|vehicle| vehicle.accepts(trip)) {
            Some(vehicle) => vehicle.push(*trip),
            None => vehicles.push(Vehicle::with_trip(*trip)),
        }
    }

    vehicles
}

pub fn required_vehicles(plan: &Plan) -> usize {
    assign(plan).len()
}

/// A plan is feasible when it is non-empty and the greedy packing fits the
/// fleet. Exact-length requirements are the concern of individual callers.
pub fn is_valid(plan: &Plan, fleet_cap: usize) -> bool {
    !plan.is_empty() && required_vehicles(plan) <= fleet_cap
}
