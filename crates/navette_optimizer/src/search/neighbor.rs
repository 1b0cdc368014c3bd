use crate::fleet::assignment;
use crate::problem::plan::Plan;
use crate::problem::service_window::ServiceWindow;

use super::search_error::SearchError;

/// The one mutation every strategy shares: shift a single trip by whole
/// minutes, optionally flipping its direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlanChange {
    pub index: usize,
    pub minute_delta: i64,
    pub flip_direction: bool,
}

/// Applies `change` to `plan`: remove the targeted trip, clamp its shifted
/// departure into the service window, flip if asked, re-insert and re-sort.
/// The result must keep the plan's length and pass the feasibility guard;
/// otherwise the change is infeasible: the operation is deterministic, so
/// the failure is final rather than retryable.
pub fn derive_plan(
    plan: &Plan,
    change: PlanChange,
    fleet_cap: usize,
    window: ServiceWindow,
) -> Result<Plan, SearchError> {
    if plan.is_empty() {
        return Err(SearchError::InfeasibleChange);
    }

    let mut derived = plan.clone();
    let index = change.index % derived.len();
    let trip = derived.remove(index);

    let departure = window.clamp_departure(trip.departure() + change.minute_delta * 60);
    let mut moved = trip.with_departure(departure);
    if change.flip_direction {
        moved = moved.flipped();
    }
    derived.insert_sorted(moved);

    if derived.len() == plan.len() && assignment::is_valid(&derived, fleet_cap) {
        Ok(derived)
    } else {
        Err(SearchError::InfeasibleChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::direction::Direction;
    use crate::problem::trip::Trip;

    fn window() -> ServiceWindow {
        ServiceWindow::full_day()
    }

    fn plan() -> Plan {
        Plan::from_trips(vec![
            Trip::new(7 * 3600, 600, Direction::Outbound),
            Trip::new(8 * 3600, 600, Direction::Inbound),
            Trip::new(9 * 3600, 600, Direction::Outbound),
        ])
    }

    #[test]
    fn test_derive_preserves_length_and_order() {
        let change = PlanChange {
            index: 2,
            minute_delta: -90,
            flip_direction: false,
        };

        let derived = derive_plan(&plan(), change, 3, window()).unwrap();

        assert_eq!(derived.len(), 3);
        assert!(
            derived
                .trips()
                .windows(2)
                .all(|pair| pair[0].departure() <= pair[1].departure())
        );
        assert_eq!(derived.trips()[0].departure(), 7 * 3600);
        assert_eq!(derived.trips()[1].departure(), 9 * 3600 - 90 * 60);
    }

    #[test]
    fn test_derive_result_is_feasible() {
        let change = PlanChange {
            index: 0,
            minute_delta: 3,
            flip_direction: true,
        };

        let derived = derive_plan(&plan(), change, 3, window()).unwrap();
        assert!(assignment::is_valid(&derived, 3));
    }

    #[test]
    fn test_index_wraps_around() {
        let change = PlanChange {
            index: 4,
            minute_delta: 1,
            flip_direction: false,
        };

        let derived = derive_plan(&plan(), change, 3, window()).unwrap();
        assert_eq!(derived.trips()[1].departure(), 8 * 3600 + 60);
    }

    #[test]
    fn test_clamps_into_service_window() {
        let change = PlanChange {
            index: 0,
            minute_delta: -10_000,
            flip_direction: false,
        };

        let derived = derive_plan(&plan(), change, 3, window()).unwrap();
        assert_eq!(derived.trips()[0].departure(), window().start());
    }

    #[test]
    fn test_infeasible_change_is_an_error() {
        // Two outbound runs on a single vehicle need a full tour between
        // them; pulling the second one onto the first breaks the packing.
        let tight = Plan::from_trips(vec![
            Trip::new(7 * 3600, 600, Direction::Outbound),
            Trip::new(7 * 3600 + 1200, 600, Direction::Outbound),
        ]);
        assert!(assignment::is_valid(&tight, 1));

        let change = PlanChange {
            index: 1,
            minute_delta: -10,
            flip_direction: false,
        };

        assert_eq!(
            derive_plan(&tight, change, 1, window()),
            Err(SearchError::InfeasibleChange)
        );
    }

    #[test]
    fn test_empty_plan_is_an_error() {
        let change = PlanChange {
            index: 0,
            minute_delta: 0,
            flip_direction: false,
        };

        assert_eq!(
            derive_plan(&Plan::new(), change, 1, window()),
            Err(SearchError::InfeasibleChange)
        );
    }
}
