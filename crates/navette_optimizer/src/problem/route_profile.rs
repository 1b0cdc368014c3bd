use serde::{Deserialize, Serialize};

/// The fixed route, described by the travel time in seconds between each
/// pair of consecutive stops. A route with `n` legs has `n + 1` stops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteProfile {
    travel_times: Vec<i64>,
}

impl RouteProfile {
    pub fn new(travel_times: Vec<i64>) -> Self {
        RouteProfile { travel_times }
    }

    pub fn travel_times(&self) -> &[i64] {
        &self.travel_times
    }

    pub fn num_legs(&self) -> usize {
        self.travel_times.len()
    }

    pub fn num_stops(&self) -> usize {
        self.travel_times.len() + 1
    }

    /// Duration of one full run over the route.
    pub fn tour_duration(&self) -> i64 {
        self.travel_times.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let route = RouteProfile::new(vec![120, 180, 60]);

        assert_eq!(route.num_legs(), 3);
        assert_eq!(route.num_stops(), 4);
        assert_eq!(route.tour_duration(), 360);
    }
}
