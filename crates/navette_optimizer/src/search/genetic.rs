use std::sync::Arc;

use jiff::Timestamp;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::fleet::assignment;
use crate::objective::waiting_time::WaitingTimeObjective;
use crate::problem::plan::Plan;
use crate::problem::shuttle_problem::ShuttleProblem;

use super::DEFAULT_SEED;
use super::control::SearchControl;
use super::generator::{self, DEFAULT_CONSTRUCTION_ATTEMPTS};
use super::neighbor::{self, PlanChange};
use super::observer::{ProgressObserver, SearchProgress};
use super::outcome::SearchOutcome;
use super::search_error::SearchError;

const CROSSOVER_ATTEMPTS: usize = 32;

#[derive(Clone, Debug)]
pub struct GeneticAlgorithmParams {
    pub num_generations: usize,
    pub population_size: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub selection_rate: f64,
    pub mutation_shift_minutes: i64,
    pub seed: u64,
}

impl Default for GeneticAlgorithmParams {
    fn default() -> Self {
        Self {
            num_generations: 100,
            population_size: 10,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            selection_rate: 0.8,
            mutation_shift_minutes: 2,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Clone, Debug)]
struct Individual {
    plan: Plan,
    fitness: f64,
}

/// Elitist genetic algorithm: truncation selection, three-cut crossover,
/// single-change mutation. Scoring a generation fans out on rayon.
pub struct GeneticAlgorithm {
    problem: Arc<ShuttleProblem>,
    params: GeneticAlgorithmParams,
    control: SearchControl,
    observer: Option<ProgressObserver>,
}

impl GeneticAlgorithm {
    pub fn new(problem: Arc<ShuttleProblem>, params: GeneticAlgorithmParams) -> Self {
        if params.population_size == 0 {
            panic!("population size must be positive");
        }

        GeneticAlgorithm {
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

    /// A child is usable when the fleet covers it and it does not exceed
    /// the trip target.
    fn is_valid_individual(&self, plan: &Plan) -> bool {
        assignment::is_valid(plan, self.problem.fleet_cap())
            && plan.len() <= self.problem.target_trips()
    }

    fn interleave(first: &Plan, second: &Plan, cuts: [usize; 3]) -> Plan {
        let a = first.trips();
        let b = second.trips();

        let mut trips = Vec::with_capacity(a.len());
        trips.extend_from_slice(&a[..cuts[0]]);
        trips.extend_from_slice(&b[cuts[0]..cuts[1]]);
        trips.extend_from_slice(&a[cuts[1]..cuts[2]]);
        trips.extend_from_slice(&b[cuts[2]..]);

        Plan::from_trips(trips)
    }

    /// Crosses two parents at three ordered cut points, redrawing the cuts
    /// until both children pass the guard.
    fn crossover(
        &self,
        first: &Plan,
        second: &Plan,
        rng: &mut SmallRng,
    ) -> Result<(Plan, Plan), SearchError> {
        if !rng.random_bool(self.params.crossover_rate) {
            return Ok((first.clone(), second.clone()));
        }

        let len = first.len().min(second.len());
        for _ in 0..CROSSOVER_ATTEMPTS {
            let low = rng.random_range(0..len);
            let mid = rng.random_range(low..len);
            let high = rng.random_range(mid..len);

            let child_a = Self::interleave(first, second, [low, mid, high]);
            let child_b = Self::interleave(second, first, [low, mid, high]);

            if self.is_valid_individual(&child_a) && self.is_valid_individual(&child_b) {
                return Ok((child_a, child_b));
            }
        }

        Err(SearchError::InfeasibleConstruction {
            attempts: CROSSOVER_ATTEMPTS,
        })
    }

    fn mutate(&self, plan: &mut Plan, rng: &mut SmallRng) {
        if !rng.random_bool(self.params.mutation_rate) {
            return;
        }

        let shift = self.params.mutation_shift_minutes;
        let change = PlanChange {
            index: rng.random_range(0..plan.len()),
            minute_delta: rng.random_range(-shift..=shift),
            flip_direction: rng.random_bool(0.5),
        };

        // An infeasible mutation leaves the child as it was.
        if let Ok(mutated) = neighbor::derive_plan(
            plan,
            change,
            self.problem.fleet_cap(),
            self.problem.service_window(),
        ) {
            *plan = mutated;
        }
    }

    fn score(&self, objective: &WaitingTimeObjective, plans: Vec<Plan>) -> Vec<Individual> {
        let mut individuals: Vec<Individual> = plans
            .into_par_iter()
            .map(|plan| {
                let fitness = objective.fitness(&plan);
                Individual { plan, fitness }
            })
            .collect();

        individuals.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        individuals
    }

    pub fn optimize(&mut self) -> Result<SearchOutcome, SearchError> {
        let objective = WaitingTimeObjective::new(&self.problem);
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let started = Timestamp::now();

        let population_size = self.params.population_size;
        let initial: Vec<Plan> = (0..population_size)
            .map(|_| {
                generator::feasible_peak_plan(&self.problem, &mut rng, DEFAULT_CONSTRUCTION_ATTEMPTS)
            })
            .collect::<Result<_, _>>()?;

        let mut population = self.score(&objective, initial);
        let mut best = population[0].clone();
        let mut cost_trace = Vec::with_capacity(self.params.num_generations);

        for generation in 0..self.params.num_generations {
            let elite_count = ((population_size as f64) * self.params.selection_rate).ceil()
                as usize;
            let elite_count = elite_count.clamp(1, population.len());

            let mut children: Vec<Plan> = Vec::with_capacity(population_size + 1);
            while children.len() < population_size {
                let first = &population[rng.random_range(0..elite_count)].plan;
                let second = &population[rng.random_range(0..elite_count)].plan;

                let (child_a, child_b) = self.crossover(first, second, &mut rng)?;
                children.push(child_a);
                children.push(child_b);
            }

            for child in &mut children {
                self.mutate(child, &mut rng);
            }

            let mut next = self.score(&objective, children);
            next.extend_from_slice(&population[..elite_count]);
            next.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
            next.truncate(population_size);
            population = next;

            if population[0].fitness < best.fitness {
                best = population[0].clone();
            }

            cost_trace.push(best.fitness);
            debug!(generation, best_cost = best.fitness, "generation evolved");
            self.notify(generation, best.fitness);

            if self.control.should_stop(started) {
                break;
            }
        }

        Ok(SearchOutcome {
            best_plan: best.plan,
            best_cost: best.fitness,
            cost_trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::small_search_problem;

    fn quick_params() -> GeneticAlgorithmParams {
        GeneticAlgorithmParams {
            num_generations: 8,
            population_size: 6,
            ..GeneticAlgorithmParams::default()
        }
    }

    #[test]
    fn test_optimize_returns_feasible_plan() {
        let problem = Arc::new(small_search_problem());
        let mut search = GeneticAlgorithm::new(Arc::clone(&problem), quick_params());

        let outcome = search.optimize().unwrap();

        assert!(assignment::is_valid(&outcome.best_plan, problem.fleet_cap()));
        assert!(outcome.best_plan.len() <= problem.target_trips());
        assert_eq!(outcome.cost_trace.len(), 8);
    }

    #[test]
    fn test_trace_is_non_increasing() {
        let problem = Arc::new(small_search_problem());
        let mut search = GeneticAlgorithm::new(problem, quick_params());

        let outcome = search.optimize().unwrap();

        assert!(
            outcome
                .cost_trace
                .windows(2)
                .all(|pair| pair[1] <= pair[0])
        );
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let problem = Arc::new(small_search_problem());
        let mut first = GeneticAlgorithm::new(Arc::clone(&problem), quick_params());
        let mut second = GeneticAlgorithm::new(problem, quick_params());

        let a = first.optimize().unwrap();
        let b = second.optimize().unwrap();

        assert_eq!(a.best_plan, b.best_plan);
        assert_eq!(a.cost_trace, b.cost_trace);
    }

    #[test]
    fn test_crossover_children_keep_length() {
        let problem = Arc::new(small_search_problem());
        let search = GeneticAlgorithm::new(
            Arc::clone(&problem),
            GeneticAlgorithmParams {
                crossover_rate: 1.0,
                ..quick_params()
            },
        );
        let mut rng = SmallRng::seed_from_u64(9);

        let first = generator::feasible_peak_plan(&problem, &mut rng, 64).unwrap();
        let second = generator::feasible_peak_plan(&problem, &mut rng, 64).unwrap();

        let (child_a, child_b) = search.crossover(&first, &second, &mut rng).unwrap();

        assert_eq!(child_a.len(), first.len());
        assert_eq!(child_b.len(), second.len());
        assert!(search.is_valid_individual(&child_a));
        assert!(search.is_valid_individual(&child_b));
    }
}
