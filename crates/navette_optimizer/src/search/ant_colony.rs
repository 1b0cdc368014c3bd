use std::sync::Arc;

use jiff::Timestamp;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use tracing::debug;

use crate::objective::waiting_time::WaitingTimeObjective;
use crate::problem::direction::Direction;
use crate::problem::plan::Plan;
use crate::problem::shuttle_problem::ShuttleProblem;
use crate::problem::trip::Trip;

use super::DEFAULT_SEED;
use super::control::SearchControl;
use super::generator::DEFAULT_CONSTRUCTION_ATTEMPTS;
use super::observer::{ProgressObserver, SearchProgress};
use super::outcome::SearchOutcome;
use super::search_error::SearchError;
use crate::fleet::assignment;

#[derive(Clone, Debug)]
pub struct AntColonyParams {
    pub num_ants: usize,
    pub num_iterations: usize,
    /// Alpha: how much learned pheromone steers the minute choice.
    pub pheromone_factor: f64,
    /// Beta: how much the precomputed visibility steers it.
    pub visibility_factor: f64,
    pub evaporation_rate: f64,
    pub seed: u64,
}

impl Default for AntColonyParams {
    fn default() -> Self {
        Self {
            num_ants: 5,
            num_iterations: 100,
            pheromone_factor: 2.0,
            visibility_factor: 1.0,
            evaporation_rate: 0.1,
            seed: DEFAULT_SEED,
        }
    }
}

/// Ant colony optimization over (direction, service minute) cells. Ants
/// construct whole plans from pheromone and visibility weights; scoring
/// fans out on rayon, deposits happen after the whole wave is scored.
pub struct AntColonyOptimization {
    problem: Arc<ShuttleProblem>,
    params: AntColonyParams,
    control: SearchControl,
    observer: Option<ProgressObserver>,
}

impl AntColonyOptimization {
    pub fn new(problem: Arc<ShuttleProblem>, params: AntColonyParams) -> Self {
        if params.num_ants == 0 || params.num_iterations == 0 {
            panic!("ant colony needs at least one ant and one iteration");
        }

        AntColonyOptimization {
            problem,
            params,
            control: SearchControl::new(),
            observer: None,
        }
    }

    pub fn set_control(&mut self, control: SearchControl) {
        self.control = control;
    }

    pub fn on_progress<F>(&mut self, callback: F)
    where
        F: FnMut(SearchProgress) + Send + 'static,
    {
        self.observer = Some(Box::new(callback));
    }

    fn notify(&mut self, iteration: usize, best_cost: f64) {
        if let Some(observer) = &mut self.observer {
            observer(SearchProgress {
                iteration,
                best_cost,
            });
        }
    }

    fn service_minutes(&self) -> usize {
        self.problem.service_window().minutes() as usize
    }

    /// Visibility of a cell is the inverse waiting cost of running a single
    /// trip in that minute and direction; cheaper slots shine brighter.
    /// Computed once per run.
    fn visibility(&self, objective: &WaitingTimeObjective) -> [Vec<f64>; 2] {
        let window = self.problem.service_window();
        let tour = self.problem.tour_duration();
        let minutes = self.service_minutes();

        Direction::ALL.map(|direction| {
            (0..minutes)
                .map(|minute| {
                    let departure = window.start() + minute as i64 * 60;
                    let plan = Plan::from_trips(vec![Trip::new(departure, tour, direction)]);
                    1.0 / objective.cost(&plan) as f64
                })
                .collect()
        })
    }

    fn construct_ant_plan(
        &self,
        pheromone: &[Vec<f64>; 2],
        visibility: &[Vec<f64>; 2],
        rng: &mut SmallRng,
    ) -> Result<Plan, SearchError> {
        let window = self.problem.service_window();
        let tour = self.problem.tour_duration();
        let target = self.problem.target_trips();
        let split = self.problem.direction_split();
        let minutes = self.service_minutes();

        for _ in 0..DEFAULT_CONSTRUCTION_ATTEMPTS {
            let mut counts = [0usize; 2];
            for _ in 0..target {
                counts[split.sample(rng).index()] += 1;
            }

            let mut trips = Vec::with_capacity(target);
            for direction in Direction::ALL {
                let count = counts[direction.index()];
                if count == 0 {
                    continue;
                }

                let row = direction.index();
                let weights: Vec<f64> = (0..minutes)
                    .map(|minute| {
                        pheromone[row][minute].powf(self.params.pheromone_factor)
                            * visibility[row][minute].powf(self.params.visibility_factor)
                    })
                    .collect();
                let distribution = WeightedIndex::new(&weights)
                    .expect("pheromone and visibility keep every weight positive");

                for _ in 0..count {
                    let minute = distribution.sample(rng) as i64;
                    trips.push(Trip::new(window.start() + minute * 60, tour, direction));
                }
            }

            let plan = Plan::from_trips(trips);
            if plan.len() == target && assignment::is_valid(&plan, self.problem.fleet_cap()) {
                return Ok(plan);
            }
        }

        Err(SearchError::InfeasibleConstruction {
            attempts: DEFAULT_CONSTRUCTION_ATTEMPTS,
        })
    }

    pub fn optimize(&mut self) -> Result<SearchOutcome, SearchError> {
        let objective = WaitingTimeObjective::new(&self.problem);
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let started = Timestamp::now();

        let window = self.problem.service_window();
        let minutes = self.service_minutes();
        let mut pheromone: [Vec<f64>; 2] = [vec![1.0; minutes], vec![1.0; minutes]];
        let visibility = self.visibility(&objective);

        let mut best_plan: Option<Plan> = None;
        let mut best_cost = f64::INFINITY;
        let mut cost_trace = Vec::with_capacity(self.params.num_iterations);

        for iteration in 0..self.params.num_iterations {
            let mut plans = Vec::with_capacity(self.params.num_ants);
            for _ in 0..self.params.num_ants {
                plans.push(self.construct_ant_plan(&pheromone, &visibility, &mut rng)?);
            }

            let costs: Vec<i64> = plans.par_iter().map(|plan| objective.cost(plan)).collect();

            for (plan, &cost) in plans.iter().zip(&costs) {
                let fitness = objective.normalized(cost);
                if fitness < best_cost {
                    best_cost = fitness;
                    best_plan = Some(plan.clone());
                }
            }

            for row in &mut pheromone {
                for cell in row.iter_mut() {
                    *cell *= 1.0 - self.params.evaporation_rate;
                }
            }

            // Each ant reinforces exactly the cells its own trips occupy.
            for (plan, &cost) in plans.iter().zip(&costs) {
                let deposit = 1.0 / cost as f64;
                for trip in plan {
                    let minute = ((trip.departure() - window.start()) / 60) as usize;
                    pheromone[trip.direction().index()][minute] += deposit;
                }
            }

            cost_trace.push(best_cost);
            debug!(iteration, best_cost, "ant wave scored");
            self.notify(iteration, best_cost);

            if self.control.should_stop(started) {
                break;
            }
        }

        let best_plan = best_plan.expect("at least one iteration scored");
        Ok(SearchOutcome {
            best_plan,
            best_cost,
            cost_trace,
        })
    }
}
