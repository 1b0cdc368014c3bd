use thiserror::Error;

use super::demand::{self, DemandRequest};
use super::peaks::{DirectionSplit, PeakProfile};
use super::route_profile::RouteProfile;
use super::service_window::ServiceWindow;

#[derive(Debug, Error, PartialEq)]
pub enum ProblemError {
    #[error("route profile is required")]
    MissingRoute,
    #[error("route must have at least one leg")]
    EmptyRoute,
    #[error("leg {index} has non-positive travel time {seconds}s")]
    InvalidLeg { index: usize, seconds: i64 },
    #[error("demand set is required and must not be empty")]
    EmptyDemand,
    #[error("demand must be sorted by (direction, arrival)")]
    UnsortedDemand,
    #[error("demand request {index} references stops outside the route")]
    InvalidRequest { index: usize },
    #[error("demand request {index} arrives after close of service")]
    ArrivalOutsideService { index: usize },
    #[error("service window must span at least one minute")]
    DegenerateWindow,
    #[error("fleet cap, vehicle capacity and target trip count must be positive")]
    InvalidBounds,
    #[error("peak profile must carry weight and lie inside the service window")]
    InvalidPeaks,
    #[error("direction split must carry weight")]
    InvalidDirectionSplit,
}

/// Everything a search strategy needs to know about one optimization run:
/// the route, the sampled demand, the service window and the fleet bounds.
/// Immutable once built; strategies share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ShuttleProblem {
    route: RouteProfile,
    demand: Vec<DemandRequest>,
    service_window: ServiceWindow,
    fleet_cap: usize,
    vehicle_capacity: usize,
    target_trips: usize,
    peaks: PeakProfile,
    direction_split: DirectionSplit,
}

impl ShuttleProblem {
    pub fn route(&self) -> &RouteProfile {
        &self.route
    }

    pub fn demand(&self) -> &[DemandRequest] {
        &self.demand
    }

    pub fn service_window(&self) -> ServiceWindow {
        self.service_window
    }

    pub fn fleet_cap(&self) -> usize {
        self.fleet_cap
    }

    pub fn vehicle_capacity(&self) -> usize {
        self.vehicle_capacity
    }

    pub fn target_trips(&self) -> usize {
        self.target_trips
    }

    pub fn peaks(&self) -> &PeakProfile {
        &self.peaks
    }

    pub fn direction_split(&self) -> DirectionSplit {
        self.direction_split
    }

    pub fn num_stops(&self) -> usize {
        self.route.num_stops()
    }

    pub fn tour_duration(&self) -> i64 {
        self.route.tour_duration()
    }
}

#[derive(Default)]
pub struct ShuttleProblemBuilder {
    route: Option<RouteProfile>,
    demand: Option<Vec<DemandRequest>>,
    service_window: Option<ServiceWindow>,
    fleet_cap: Option<usize>,
    vehicle_capacity: Option<usize>,
    target_trips: Option<usize>,
    peaks: Option<PeakProfile>,
    direction_split: Option<DirectionSplit>,
}

impl ShuttleProblemBuilder {
    pub fn set_route(&mut self, route: RouteProfile) -> &mut Self {
        self.route = Some(route);
        self
    }

    pub fn set_demand(&mut self, demand: Vec<DemandRequest>) -> &mut Self {
        self.demand = Some(demand);
        self
    }

    pub fn set_service_window(&mut self, window: ServiceWindow) -> &mut Self {
        self.service_window = Some(window);
        self
    }

    pub fn set_fleet_cap(&mut self, fleet_cap: usize) -> &mut Self {
        self.fleet_cap = Some(fleet_cap);
        self
    }

    pub fn set_vehicle_capacity(&mut self, vehicle_capacity: usize) -> &mut Self {
        self.vehicle_capacity = Some(vehicle_capacity);
        self
    }

    pub fn set_target_trips(&mut self, target_trips: usize) -> &mut Self {
        self.target_trips = Some(target_trips);
        self
    }

    pub fn set_peaks(&mut self, peaks: PeakProfile) -> &mut Self {
        self.peaks = Some(peaks);
        self
    }

    pub fn set_direction_split(&mut self, split: DirectionSplit) -> &mut Self {
        self.direction_split = Some(split);
        self
    }

    pub fn build(self) -> Result<ShuttleProblem, ProblemError> {
        let route = self.route.ok_or(ProblemError::MissingRoute)?;
        if route.num_legs() == 0 {
            return Err(ProblemError::EmptyRoute);
        }
        for (index, &seconds) in route.travel_times().iter().enumerate() {
            if seconds <= 0 {
                return Err(ProblemError::InvalidLeg { index, seconds });
            }
        }

        let service_window = self.service_window.unwrap_or_else(ServiceWindow::full_day);
        if service_window.duration() < 60 {
            return Err(ProblemError::DegenerateWindow);
        }

        let demand = self.demand.unwrap_or_default();
        if demand.is_empty() {
            return Err(ProblemError::EmptyDemand);
        }
        if !demand::is_canonically_sorted(&demand) {
            return Err(ProblemError::UnsortedDemand);
        }
        let num_stops = route.num_stops();
        for (index, request) in demand.iter().enumerate() {
            let boarding = request.boarding_stop();
            let riding = request.stops_to_ride() as usize;
            if boarding < 1 || riding < 1 || boarding + riding > num_stops {
                return Err(ProblemError::InvalidRequest { index });
            }
            if request.arrival() < 0 || request.arrival() >= service_window.end() {
                return Err(ProblemError::ArrivalOutsideService { index });
            }
        }

        let fleet_cap = self.fleet_cap.unwrap_or(1);
        let vehicle_capacity = self.vehicle_capacity.unwrap_or(1);
        let target_trips = self.target_trips.unwrap_or(1);
        if fleet_cap == 0 || vehicle_capacity == 0 || target_trips == 0 {
            return Err(ProblemError::InvalidBounds);
        }

        let peaks = self.peaks.unwrap_or_else(PeakProfile::commuter_day);
        if !peaks.fits(&service_window) {
            return Err(ProblemError::InvalidPeaks);
        }

        let direction_split = self.direction_split.unwrap_or_else(DirectionSplit::even);
        if direction_split.total() == 0 {
            return Err(ProblemError::InvalidDirectionSplit);
        }

        Ok(ShuttleProblem {
            route,
            demand,
            service_window,
            fleet_cap,
            vehicle_capacity,
            target_trips,
            peaks,
            direction_split,
        })
    }
}
