use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use indicatif::ProgressBar;
use tracing::info;

use navette_optimizer::fleet::assignment;
use navette_optimizer::parsers::{demand_csv, plan_csv};
use navette_optimizer::problem::route_profile::RouteProfile;
use navette_optimizer::problem::shuttle_problem::{ShuttleProblem, ShuttleProblemBuilder};
use navette_optimizer::search::ant_colony::{AntColonyOptimization, AntColonyParams};
use navette_optimizer::search::control::SearchControl;
use navette_optimizer::search::genetic::{GeneticAlgorithm, GeneticAlgorithmParams};
use navette_optimizer::search::outcome::SearchOutcome;
use navette_optimizer::search::particle_swarm::{ParticleSwarmOptimization, ParticleSwarmParams};
use navette_optimizer::search::simulated_annealing::{SimulatedAnnealing, SimulatedAnnealingParams};
use navette_optimizer::search::tabu::{TabuSearch, TabuSearchParams};

use crate::generate;
use crate::parsers;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Strategy {
    /// Simulated annealing
    Sa,
    /// Genetic algorithm
    Ga,
    /// Tabu search
    Tabu,
    /// Ant colony optimization
    Aco,
    /// Particle swarm optimization
    Pso,
}

#[derive(Args)]
pub struct OptimizeArgs {
    /// Demand instance to optimize
    #[arg(short = 'i', long)]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Strategy::Sa)]
    strategy: Strategy,

    /// Route legs in minutes, comma separated (e.g. "2,3,4"). Sampled from
    /// --stops and --seed when omitted, like `generate` does.
    #[arg(long, value_parser = parsers::parse_legs)]
    legs: Option<parsers::LegList>,

    #[arg(long, default_value_t = 18)]
    stops: usize,

    #[arg(long, default_value_t = 2_427_121)]
    seed: u64,

    /// Fleet cap: most vehicles a plan may require
    #[arg(long, default_value_t = 15)]
    fleet: usize,

    /// Seats per vehicle
    #[arg(long, default_value_t = 80)]
    capacity: usize,

    /// Trips the schedule should offer
    #[arg(long, default_value_t = 100)]
    trips: usize,

    /// Wall-clock budget for the search (e.g., "30s", "5m")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Where to write the optimized plan
    #[arg(long, default_value = "plan.csv")]
    out_plan: PathBuf,

    /// Where to write the per-iteration fitness trace
    #[arg(long, default_value = "trace.csv")]
    out_trace: PathBuf,
}

fn run_strategy(
    strategy: Strategy,
    problem: Arc<ShuttleProblem>,
    control: SearchControl,
    progress: &ProgressBar,
) -> Result<SearchOutcome, anyhow::Error> {
    let bar = progress.clone();
    let observer = move |update: navette_optimizer::search::observer::SearchProgress| {
        bar.set_message(format!(
            "iteration {}, best {:.5} h/passenger",
            update.iteration, update.best_cost
        ));
        bar.tick();
    };

    let outcome = match strategy {
        Strategy::Sa => {
            let mut search =
                SimulatedAnnealing::new(problem, SimulatedAnnealingParams::default());
            search.set_control(control);
            search.on_progress(observer);
            search.optimize()?
        }
        Strategy::Ga => {
            let mut search = GeneticAlgorithm::new(problem, GeneticAlgorithmParams::default());
            search.set_control(control);
            search.on_progress(observer);
            search.optimize()?
        }
        Strategy::Tabu => {
            let mut search = TabuSearch::new(problem, TabuSearchParams::default());
            search.set_control(control);
            search.on_progress(observer);
            search.optimize()?
        }
        Strategy::Aco => {
            let mut search = AntColonyOptimization::new(problem, AntColonyParams::default());
            search.set_control(control);
            search.on_progress(observer);
            search.optimize()?
        }
        Strategy::Pso => {
            let mut search =
                ParticleSwarmOptimization::new(problem, ParticleSwarmParams::default());
            search.set_control(control);
            search.on_progress(observer);
            search.optimize()?
        }
    };

    Ok(outcome)
}

fn write_trace(path: &PathBuf, trace: &[f64]) -> std::io::Result<()> {
    let mut content = String::from("Iteration,Best fitness\n");
    for (iteration, best) in trace.iter().enumerate() {
        content.push_str(&format!("{iteration},{best}\n"));
    }
    std::fs::write(path, content)
}

pub fn run(args: OptimizeArgs) -> Result<(), anyhow::Error> {
    let demand = demand_csv::read_demand(&args.input)?;
    info!("Loaded {} requests from {}", demand.len(), args.input.display());

    let legs = match args.legs {
        Some(legs) => legs.0,
        None => generate::sample_legs(args.stops, 1, 5, args.seed),
    };

    let mut builder = ShuttleProblemBuilder::default();
    builder
        .set_route(RouteProfile::new(legs))
        .set_demand(demand)
        .set_fleet_cap(args.fleet)
        .set_vehicle_capacity(args.capacity)
        .set_target_trips(args.trips);
    let problem = Arc::new(builder.build()?);

    let control = match args.timeout {
        Some(timeout) => SearchControl::with_deadline(timeout),
        None => SearchControl::new(),
    };

    let progress = ProgressBar::new_spinner();
    let outcome = run_strategy(args.strategy, Arc::clone(&problem), control, &progress)?;
    progress.finish_and_clear();

    plan_csv::save_plan(&args.out_plan, &outcome.best_plan)?;
    write_trace(&args.out_trace, &outcome.cost_trace)?;

    info!(
        "Finished: trips = {}, vehicles = {}, best = {:.5} h/passenger",
        outcome.best_plan.len(),
        assignment::required_vehicles(&outcome.best_plan),
        outcome.best_cost,
    );
    info!(
        "Plan written to {}, trace to {}",
        args.out_plan.display(),
        args.out_trace.display(),
    );

    Ok(())
}
