use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The requested plan change does not yield a feasible plan. Deriving
    /// the same descriptor from the same plan is deterministic, so there is
    /// nothing to retry.
    #[error("plan change produces no feasible plan")]
    InfeasibleChange,

    /// Randomized construction (initial plans, crossover, ant plans) kept
    /// failing the feasibility guard until its attempt budget ran out,
    /// typically a fleet cap too tight for the requested trip count.
    #[error("no feasible plan constructed after {attempts} attempts")]
    InfeasibleConstruction { attempts: usize },
}
