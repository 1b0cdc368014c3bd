use std::sync::Arc;

use jiff::Timestamp;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

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

#[derive(Clone, Debug)]
pub struct ParticleSwarmParams {
    pub num_particles: usize,
    pub num_iterations: usize,
    pub inertia_coefficient: f64,
    pub cognitive_factor: f64,
    pub social_factor: f64,
    /// Bound on the random minute offsets the velocities start from.
    pub max_velocity_minutes: i64,
    pub seed: u64,
}

impl Default for ParticleSwarmParams {
    fn default() -> Self {
        Self {
            num_particles: 100,
            num_iterations: 100,
            inertia_coefficient: 0.6,
            cognitive_factor: 1.5,
            social_factor: 1.0,
            max_velocity_minutes: 5,
            seed: DEFAULT_SEED,
        }
    }
}

/// Particle swarm over departure times: each particle is a plan, its
/// velocity a per-slot minute offset pulled toward the personal and global
/// bests. Directions are left alone; only time moves.
pub struct ParticleSwarmOptimization {
    problem: Arc<ShuttleProblem>,
    params: ParticleSwarmParams,
    control: SearchControl,
    observer: Option<ProgressObserver>,
}

impl ParticleSwarmOptimization {
    pub fn new(problem: Arc<ShuttleProblem>, params: ParticleSwarmParams) -> Self {
        if params.num_particles == 0 {
            panic!("particle swarm needs at least one particle");
        }

        ParticleSwarmOptimization {
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

    fn update_velocity(
        &self,
        velocity: &mut [i64],
        particle: &Plan,
        personal_best: &Plan,
        global_best: &Plan,
        rng: &mut SmallRng,
    ) {
        for slot in 0..velocity.len() {
            let current = particle.trips()[slot].departure();
            let personal = personal_best.trips()[slot].departure();
            let global = global_best.trips()[slot].departure();

            let inertia = self.params.inertia_coefficient * velocity[slot] as f64;
            let cognitive = self.params.cognitive_factor
                * rng.random::<f64>()
                * ((personal - current) as f64 / 60.0);
            let social = self.params.social_factor
                * rng.random::<f64>()
                * ((global - current) as f64 / 60.0);

            velocity[slot] = (inertia + cognitive + social).round() as i64;
        }
    }

    /// Applies the velocity slot by slot, re-deriving the plan each time.
    /// A slot whose shift breaks feasibility simply stays put.
    fn update_position(&self, particle: &mut Plan, velocity: &[i64]) {
        let fleet_cap = self.problem.fleet_cap();
        let window = self.problem.service_window();

        for (slot, &minute_delta) in velocity.iter().enumerate() {
            if minute_delta == 0 {
                continue;
            }
            let change = PlanChange {
                index: slot,
                minute_delta,
                flip_direction: false,
            };
            if let Ok(updated) = neighbor::derive_plan(particle, change, fleet_cap, window) {
                *particle = updated;
            }
        }
    }

    pub fn optimize(&mut self) -> Result<SearchOutcome, SearchError> {
        let objective = WaitingTimeObjective::new(&self.problem);
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let started = Timestamp::now();

        let count = self.params.num_particles;
        let max_velocity = self.params.max_velocity_minutes;

        let mut particles: Vec<Plan> = (0..count)
            .map(|_| {
                generator::feasible_peak_plan(&self.problem, &mut rng, DEFAULT_CONSTRUCTION_ATTEMPTS)
            })
            .collect::<Result<_, _>>()?;
        let mut velocities: Vec<Vec<i64>> = particles
            .iter()
            .map(|particle| {
                (0..particle.len())
                    .map(|_| rng.random_range(-max_velocity..=max_velocity))
                    .collect()
            })
            .collect();

        let scores: Vec<f64> = particles
            .par_iter()
            .map(|particle| objective.fitness(particle))
            .collect();

        let mut personal_best = particles.clone();
        let mut personal_best_scores = scores.clone();

        let mut global_best_index = 0;
        for (index, &score) in scores.iter().enumerate() {
            if score < scores[global_best_index] {
                global_best_index = index;
            }
        }
        let mut global_best = particles[global_best_index].clone();
        let mut global_best_score = scores[global_best_index];

        let mut cost_trace = Vec::with_capacity(self.params.num_iterations);

        for iteration in 0..self.params.num_iterations {
            for index in 0..count {
                // Velocities chase the global best of the previous
                // iteration; the swarm update is a single synchronized step.
                let (velocity, particle) = (&mut velocities[index], &mut particles[index]);
                self.update_velocity(
                    velocity,
                    particle,
                    &personal_best[index],
                    &global_best,
                    &mut rng,
                );
                self.update_position(particle, velocity);
            }

            let scores: Vec<f64> = particles
                .par_iter()
                .map(|particle| objective.fitness(particle))
                .collect();

            for index in 0..count {
                if scores[index] < personal_best_scores[index] {
                    personal_best[index] = particles[index].clone();
                    personal_best_scores[index] = scores[index];
                }
                if scores[index] < global_best_score {
                    global_best = particles[index].clone();
                    global_best_score = scores[index];
                }
            }

            cost_trace.push(global_best_score);
            debug!(iteration, best_cost = global_best_score, "swarm step");
            self.notify(iteration, global_best_score);

            if self.control.should_stop(started) {
                break;
            }
        }

        Ok(SearchOutcome {
            best_plan: global_best,
            best_cost: global_best_score,
            cost_trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::assignment;
    use crate::test_utils::small_search_problem;

    fn quick_params() -> ParticleSwarmParams {
        ParticleSwarmParams {
            num_particles: 8,
            num_iterations: 6,
            ..ParticleSwarmParams::default()
        }
    }

    #[test]
    fn test_optimize_returns_feasible_plan() {
        let problem = Arc::new(small_search_problem());
        let mut search = ParticleSwarmOptimization::new(Arc::clone(&problem), quick_params());

        let outcome = search.optimize().unwrap();

        assert_eq!(outcome.best_plan.len(), problem.target_trips());
        assert!(assignment::is_valid(&outcome.best_plan, problem.fleet_cap()));
        assert_eq!(outcome.cost_trace.len(), 6);
    }

    #[test]
    fn test_trace_is_non_increasing() {
        let problem = Arc::new(small_search_problem());
        let mut search = ParticleSwarmOptimization::new(problem, quick_params());

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
        let mut first = ParticleSwarmOptimization::new(Arc::clone(&problem), quick_params());
        let mut second = ParticleSwarmOptimization::new(problem, quick_params());

        let a = first.optimize().unwrap();
        let b = second.optimize().unwrap();

        assert_eq!(a.best_plan, b.best_plan);
        assert_eq!(a.cost_trace, b.cost_trace);
    }

    #[test]
    fn test_directions_survive_position_updates() {
        let problem = Arc::new(small_search_problem());
        let split_counts = |plan: &Plan| {
            plan.iter()
                .filter(|trip| trip.direction() == crate::problem::direction::Direction::Outbound)
                .count()
        };

        let mut rng = SmallRng::seed_from_u64(13);
        let plan =
            generator::feasible_peak_plan(&problem, &mut rng, DEFAULT_CONSTRUCTION_ATTEMPTS)
                .unwrap();
        let outbound_before = split_counts(&plan);

        let search = ParticleSwarmOptimization::new(Arc::clone(&problem), quick_params());
        let mut moved = plan.clone();
        search.update_position(&mut moved, &vec![3; plan.len()]);

        assert_eq!(split_counts(&moved), outbound_before);
    }
}
