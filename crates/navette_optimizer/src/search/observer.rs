/// Snapshot handed to the progress callback once per outer iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchProgress {
    pub iteration: usize,
    pub best_cost: f64,
}

/// Optional per-iteration callback. Display concerns (progress bars,
/// plotting hooks) live behind this; the search loops themselves only emit
/// tracing events.
pub type ProgressObserver = Box<dyn FnMut(SearchProgress) + Send>;
