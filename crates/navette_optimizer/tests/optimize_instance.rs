use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use navette_optimizer::fleet::assignment;
use navette_optimizer::parsers::{demand_csv, plan_csv};
use navette_optimizer::problem::peaks::{DirectionSplit, PeakProfile};
use navette_optimizer::problem::route_profile::RouteProfile;
use navette_optimizer::problem::shuttle_problem::{ShuttleProblem, ShuttleProblemBuilder};
use navette_optimizer::sampling;
use navette_optimizer::search::ant_colony::{AntColonyOptimization, AntColonyParams};
use navette_optimizer::search::genetic::{GeneticAlgorithm, GeneticAlgorithmParams};
use navette_optimizer::search::outcome::SearchOutcome;
use navette_optimizer::search::particle_swarm::{ParticleSwarmOptimization, ParticleSwarmParams};
use navette_optimizer::search::simulated_annealing::{SimulatedAnnealing, SimulatedAnnealingParams};
use navette_optimizer::search::tabu::{TabuSearch, TabuSearchParams};

/// Samples an instance, round-trips it through the CSV layer, and builds
/// the problem every strategy below runs on.
fn sampled_problem() -> Arc<ShuttleProblem> {
    let route = RouteProfile::new(vec![180, 240, 120, 300]);
    let peaks = PeakProfile::commuter_day();
    let split = DirectionSplit::even();
    let mut rng = SmallRng::seed_from_u64(99);

    let demand = sampling::sample_demand(&route, &peaks, &split, 120, &mut rng);

    let mut buffer = Vec::new();
    demand_csv::write_demand(&mut buffer, &demand).unwrap();
    let demand = demand_csv::parse_demand(std::str::from_utf8(&buffer).unwrap()).unwrap();

    let mut builder = ShuttleProblemBuilder::default();
    builder
        .set_route(route)
        .set_demand(demand)
        .set_fleet_cap(3)
        .set_vehicle_capacity(40)
        .set_target_trips(8);

    Arc::new(builder.build().unwrap())
}

fn assert_outcome_sane(problem: &ShuttleProblem, outcome: &SearchOutcome) {
    assert!(assignment::is_valid(&outcome.best_plan, problem.fleet_cap()));
    assert!(
        outcome
            .best_plan
            .trips()
            .windows(2)
            .all(|pair| pair[0].departure() <= pair[1].departure())
    );
    for trip in &outcome.best_plan {
        assert!(problem.service_window().contains(trip.departure()));
    }
    assert!(!outcome.cost_trace.is_empty());
    assert!(
        outcome
            .cost_trace
            .windows(2)
            .all(|pair| pair[1] <= pair[0])
    );
    assert_eq!(*outcome.cost_trace.last().unwrap(), outcome.best_cost);

    // The emitted plan must survive the CSV round trip unchanged.
    let mut buffer = Vec::new();
    plan_csv::write_plan(&mut buffer, &outcome.best_plan).unwrap();
    let reparsed = plan_csv::parse_plan(std::str::from_utf8(&buffer).unwrap()).unwrap();
    assert_eq!(reparsed, outcome.best_plan);
}

#[test]
fn simulated_annealing_solves_sampled_instance() {
    let problem = sampled_problem();
    let mut search = SimulatedAnnealing::new(
        Arc::clone(&problem),
        SimulatedAnnealingParams {
            initial_temperature: 20.0,
            cooling_rate: 0.25,
            iterations_per_temperature: 15,
            temperature_threshold: 2.0,
            ..SimulatedAnnealingParams::default()
        },
    );

    let outcome = search.optimize().unwrap();
    assert_outcome_sane(&problem, &outcome);
}

#[test]
fn genetic_algorithm_solves_sampled_instance() {
    let problem = sampled_problem();
    let mut search = GeneticAlgorithm::new(
        Arc::clone(&problem),
        GeneticAlgorithmParams {
            num_generations: 10,
            population_size: 8,
            ..GeneticAlgorithmParams::default()
        },
    );

    let outcome = search.optimize().unwrap();
    assert_outcome_sane(&problem, &outcome);
}

#[test]
fn tabu_search_solves_sampled_instance() {
    let problem = sampled_problem();
    let mut search = TabuSearch::new(
        Arc::clone(&problem),
        TabuSearchParams {
            tabu_size: 6,
            num_iterations: 8,
            ..TabuSearchParams::default()
        },
    );

    let outcome = search.optimize().unwrap();
    assert_outcome_sane(&problem, &outcome);
}

#[test]
fn ant_colony_solves_sampled_instance() {
    let problem = sampled_problem();
    let mut search = AntColonyOptimization::new(
        Arc::clone(&problem),
        AntColonyParams {
            num_ants: 4,
            num_iterations: 8,
            ..AntColonyParams::default()
        },
    );

    let outcome = search.optimize().unwrap();
    assert_outcome_sane(&problem, &outcome);
    assert_eq!(outcome.best_plan.len(), problem.target_trips());
}

#[test]
fn particle_swarm_solves_sampled_instance() {
    let problem = sampled_problem();
    let mut search = ParticleSwarmOptimization::new(
        Arc::clone(&problem),
        ParticleSwarmParams {
            num_particles: 10,
            num_iterations: 8,
            ..ParticleSwarmParams::default()
        },
    );

    let outcome = search.optimize().unwrap();
    assert_outcome_sane(&problem, &outcome);
}

#[test]
fn strategies_improve_or_match_a_naive_plan() {
    // The search should not do worse than the first feasible plan a seeded
    // generator produces.
    use navette_optimizer::objective::waiting_time::WaitingTimeObjective;
    use navette_optimizer::search::generator;

    let problem = sampled_problem();
    let objective = WaitingTimeObjective::new(&problem);
    let mut rng = SmallRng::seed_from_u64(2_427_121);
    let naive = generator::feasible_peak_plan(&problem, &mut rng, 64).unwrap();
    let naive_cost = objective.fitness(&naive);

    let mut search = SimulatedAnnealing::new(
        Arc::clone(&problem),
        SimulatedAnnealingParams {
            initial_temperature: 20.0,
            cooling_rate: 0.25,
            iterations_per_temperature: 15,
            temperature_threshold: 2.0,
            ..SimulatedAnnealingParams::default()
        },
    );
    let outcome = search.optimize().unwrap();

    assert!(outcome.best_cost <= naive_cost);
}
