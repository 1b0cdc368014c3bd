pub mod ant_colony;
pub mod control;
pub mod generator;
pub mod genetic;
pub mod neighbor;
pub mod observer;
pub mod outcome;
pub mod particle_swarm;
pub mod search_error;
pub mod simulated_annealing;
pub mod tabu;

/// Default rng seed shared by the strategies' params structs. Runs are
/// reproducible unless a caller picks its own seed.
pub const DEFAULT_SEED: u64 = 2_427_121;
