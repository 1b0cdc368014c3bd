use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

use navette_optimizer::objective::waiting_time::WaitingTimeObjective;
use navette_optimizer::problem::peaks::{DirectionSplit, PeakProfile};
use navette_optimizer::problem::route_profile::RouteProfile;
use navette_optimizer::problem::shuttle_problem::ShuttleProblemBuilder;
use navette_optimizer::sampling;
use navette_optimizer::search::generator;

fn waiting_time_cost(c: &mut Criterion) {
    let route = RouteProfile::new(vec![120; 17]);
    let peaks = PeakProfile::commuter_day();
    let split = DirectionSplit::even();
    let mut rng = SmallRng::seed_from_u64(1);

    let demand = sampling::sample_demand(&route, &peaks, &split, 1000, &mut rng);

    let mut builder = ShuttleProblemBuilder::default();
    builder
        .set_route(route)
        .set_demand(demand)
        .set_fleet_cap(15)
        .set_vehicle_capacity(80)
        .set_target_trips(100);
    let problem = builder.build().unwrap();

    let objective = WaitingTimeObjective::new(&problem);
    let plan = generator::feasible_peak_plan(&problem, &mut rng, 64).unwrap();

    c.bench_function("waiting_time_cost", |b| {
        b.iter(|| black_box(objective.cost(black_box(&plan))))
    });
}

criterion_group!(benches, waiting_time_cost);
criterion_main!(benches);
