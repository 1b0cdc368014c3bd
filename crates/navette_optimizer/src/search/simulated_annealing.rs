use std::sync::Arc;

use jiff::Timestamp;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::objective::waiting_time::WaitingTimeObjective;
use crate::problem::shuttle_problem::ShuttleProblem;

use super::DEFAULT_SEED;
use super::control::SearchControl;
use super::generator::{self, DEFAULT_CONSTRUCTION_ATTEMPTS};
use super::neighbor::{self, PlanChange};
use super::observer::{ProgressObserver, SearchProgress};
use super::outcome::SearchOutcome;
use super::search_error::SearchError;

#[derive(Clone, Debug)]
pub struct SimulatedAnnealingParams {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub iterations_per_temperature: usize,
    pub temperature_threshold: f64,
    pub max_shift_minutes: i64,
    pub seed: u64,
}

impl Default for SimulatedAnnealingParams {
    fn default() -> Self {
        Self {
            initial_temperature: 10_000.0,
            cooling_rate: 0.05,
            iterations_per_temperature: 50,
            temperature_threshold: 1_000.0,
            max_shift_minutes: 5,
            seed: DEFAULT_SEED,
        }
    }
}

/// Classic simulated annealing over plans: random single-trip changes,
/// Metropolis acceptance, multiplicative cooling.
pub struct SimulatedAnnealing {
    problem: Arc<ShuttleProblem>,
    params: SimulatedAnnealingParams,
    control: SearchControl,
    observer: Option<ProgressObserver>,
}

impl SimulatedAnnealing {
    pub fn new(problem: Arc<ShuttleProblem>, params: SimulatedAnnealingParams) -> Self {
        SimulatedAnnealing {
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

    pub fn optimize(&mut self) -> Result<SearchOutcome, SearchError> {
        let objective = WaitingTimeObjective::new(&self.problem);
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let started = Timestamp::now();

        let mut current =
            generator::feasible_peak_plan(&self.problem, &mut rng, DEFAULT_CONSTRUCTION_ATTEMPTS)?;
        let mut current_cost = objective.fitness(&current);

        let mut best = current.clone();
        let mut best_cost = current_cost;

        let fleet_cap = self.problem.fleet_cap();
        let window = self.problem.service_window();
        let max_shift = self.params.max_shift_minutes;

        let mut temperature = self.params.initial_temperature;
        let mut cost_trace = Vec::new();
        let mut step = 0;

        while temperature > self.params.temperature_threshold {
            for _ in 0..self.params.iterations_per_temperature {
                let change = PlanChange {
                    index: rng.random_range(0..current.len()),
                    minute_delta: rng.random_range(-max_shift..=max_shift),
                    flip_direction: rng.random_bool(0.5),
                };
                let Ok(candidate) = neighbor::derive_plan(&current, change, fleet_cap, window)
                else {
                    continue;
                };

                let candidate_cost = objective.fitness(&candidate);
                let accept = candidate_cost < current_cost
                    || rng.random::<f64>() < ((current_cost - candidate_cost) / temperature).exp();

                if accept {
                    current = candidate;
                    current_cost = candidate_cost;
                }
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            temperature *= 1.0 - self.params.cooling_rate;
            cost_trace.push(best_cost);
            debug!(step, temperature, best_cost, "annealing step");
            self.notify(step, best_cost);
            step += 1;

            if self.control.should_stop(started) {
                break;
            }
        }

        Ok(SearchOutcome {
            best_plan: best,
            best_cost,
            cost_trace,
        })
    }
}
