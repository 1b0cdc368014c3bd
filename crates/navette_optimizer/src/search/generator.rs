use rand::Rng;

use crate::fleet::assignment;
use crate::problem::plan::Plan;
use crate::problem::shuttle_problem::ShuttleProblem;
use crate::problem::trip::Trip;

use super::search_error::SearchError;

/// Attempt budget for randomized plan construction before the search gives
/// up and reports the instance infeasible.
pub const DEFAULT_CONSTRUCTION_ATTEMPTS: usize = 64;

/// Draws `target_trips` departures from the peak profile and directions
/// from the direction split. Unchecked; callers wanting feasibility go
/// through [`feasible_peak_plan`].
pub fn peak_weighted_plan<R: Rng>(problem: &ShuttleProblem, rng: &mut R) -> Plan {
    let duration = problem.tour_duration();
    let split = problem.direction_split();

    (0..problem.target_trips())
        .map(|_| {
            let departure = problem.peaks().sample_instant(rng);
            let direction = split.sample(rng);
            Trip::new(departure, duration, direction)
        })
        .collect()
}

/// Re-draws whole plans until one passes the feasibility guard, up to
/// `max_attempts`.
pub fn feasible_peak_plan<R: Rng>(
    problem: &ShuttleProblem,
    rng: &mut R,
    max_attempts: usize,
) -> Result<Plan, SearchError> {
    for _ in 0..max_attempts {
        let plan = peak_weighted_plan(problem, rng);
        if assignment::is_valid(&plan, problem.fleet_cap()) {
            return Ok(plan);
        }
    }

    Err(SearchError::InfeasibleConstruction {
        attempts: max_attempts,
    })
}
