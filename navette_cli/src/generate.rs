use std::path::PathBuf;

use clap::Args;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use navette_optimizer::problem::peaks::{DirectionSplit, PeakProfile};
use navette_optimizer::problem::route_profile::RouteProfile;
use navette_optimizer::sampling;

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of stops on the route
    #[arg(long, default_value_t = 18)]
    stops: usize,

    /// Number of passenger requests to sample
    #[arg(short = 'n', long, default_value_t = 1000)]
    requests: usize,

    /// Shortest leg between two stops, in minutes
    #[arg(long, default_value_t = 1)]
    min_leg_minutes: i64,

    /// Longest leg between two stops, in minutes
    #[arg(long, default_value_t = 5)]
    max_leg_minutes: i64,

    #[arg(long, default_value_t = 2_427_121)]
    seed: u64,

    /// Output demand instance file
    #[arg(short, long, default_value = "demand.csv")]
    out: PathBuf,
}

/// Samples leg travel times the way the instance generator always has:
/// uniform whole minutes between the configured bounds.
pub fn sample_legs(stops: usize, min_minutes: i64, max_minutes: i64, seed: u64) -> Vec<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..stops.saturating_sub(1))
        .map(|_| rng.random_range(min_minutes..=max_minutes) * 60)
        .collect()
}

pub fn run(args: GenerateArgs) -> Result<(), anyhow::Error> {
    if args.stops < 2 {
        anyhow::bail!("a route needs at least two stops");
    }
    if args.min_leg_minutes < 1 || args.max_leg_minutes < args.min_leg_minutes {
        anyhow::bail!("leg bounds must satisfy 1 <= min <= max");
    }

    let legs = sample_legs(args.stops, args.min_leg_minutes, args.max_leg_minutes, args.seed);
    let route = RouteProfile::new(legs);
    let peaks = PeakProfile::commuter_day();
    let split = DirectionSplit::even();

    // Demand gets its own stream so leg sampling stays stable across
    // request counts.
    let mut rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1));
    let demand = sampling::sample_demand(&route, &peaks, &split, args.requests, &mut rng);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    navette_optimizer::parsers::demand_csv::save_demand(&args.out, &demand)?;

    let leg_minutes: Vec<String> = route
        .travel_times()
        .iter()
        .map(|seconds| (seconds / 60).to_string())
        .collect();
    info!(
        "Wrote {} requests to {} (route legs: {} minutes, pass them to optimize via --legs)",
        demand.len(),
        args.out.display(),
        leg_minutes.join(","),
    );

    Ok(())
}
