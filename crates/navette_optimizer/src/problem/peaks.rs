use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::service_window::ServiceWindow;

/// One weighted slice of the service day. Weights are relative shares, not
/// percentages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakPeriod {
    start: i64,
    end: i64,
    weight: u32,
}

impl PeakPeriod {
    pub fn new(start: i64, end: i64, weight: u32) -> Self {
        PeakPeriod { start, end, weight }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// Weighted peak periods steering where departures and passenger arrivals
/// land within the service window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakProfile {
    periods: Vec<PeakPeriod>,
}

impl PeakProfile {
    pub fn new(periods: Vec<PeakPeriod>) -> Self {
        PeakProfile { periods }
    }

    /// The historical repartition of the line: morning and evening peaks at
    /// 35 shares each, midday at 20, late evening at 10.
    pub fn commuter_day() -> Self {
        PeakProfile {
            periods: vec![
                PeakPeriod::new(6 * 3600, 10 * 3600, 35),
                PeakPeriod::new(10 * 3600, 16 * 3600, 20),
                PeakPeriod::new(16 * 3600, 20 * 3600, 35),
                PeakPeriod::new(20 * 3600, 24 * 3600, 10),
            ],
        }
    }

    pub fn periods(&self) -> &[PeakPeriod] {
        &self.periods
    }

    pub fn total_weight(&self) -> u64 {
        self.periods.iter().map(|period| period.weight as u64).sum()
    }

    /// Whether every period lies inside the window and at least one carries
    /// weight.
    pub fn fits(&self, window: &ServiceWindow) -> bool {
        self.total_weight() > 0
            && self.periods.iter().all(|period| {
                period.start < period.end
                    && period.start >= window.start()
                    && period.end <= window.end()
            })
    }

    /// Draws a departure instant: weighted period, then a uniform whole
    /// minute within it.
    pub fn sample_instant<R: Rng>(&self, rng: &mut R) -> i64 {
        let period = self
            .periods
            .choose_weighted(rng, |period| period.weight)
            .expect("peak profile validated at problem construction");

        let minute = rng.random_range(period.start / 60..period.end / 60);
        minute * 60
    }
}

/// Relative weights of the two directions, used when constructing plans and
/// sampling demand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSplit {
    outbound: u32,
    inbound: u32,
}

impl DirectionSplit {
    pub fn new(outbound: u32, inbound: u32) -> Self {
        DirectionSplit { outbound, inbound }
    }

    pub fn even() -> Self {
        DirectionSplit {
            outbound: 50,
            inbound: 50,
        }
    }

    pub fn total(&self) -> u32 {
        self.outbound + self.inbound
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Direction {
        if rng.random_ratio(self.outbound, self.total()) {
            Direction::Outbound
        } else {
            Direction::Inbound
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_commuter_day_fits_full_day() {
        let profile = PeakProfile::commuter_day();
        assert!(profile.fits(&ServiceWindow::full_day()));
        assert_eq!(profile.total_weight(), 100);
    }

    #[test]
    fn test_sample_instant_lands_in_a_period() {
        let profile = PeakProfile::commuter_day();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..200 {
            let instant = profile.sample_instant(&mut rng);
            assert_eq!(instant % 60, 0);
            assert!(
                profile
                    .periods()
                    .iter()
                    .any(|period| instant >= period.start() && instant < period.end())
            );
        }
    }

    #[test]
    fn test_degenerate_profile_fails_fit() {
        let window = ServiceWindow::full_day();
        let empty = PeakProfile::new(vec![]);
        let zero_weight = PeakProfile::new(vec![PeakPeriod::new(21_600, 36_000, 0)]);

        assert!(!empty.fits(&window));
        assert!(!zero_weight.fits(&window));
    }

    #[test]
    fn test_split_samples_both_directions() {
        let split = DirectionSplit::even();
        let mut rng = SmallRng::seed_from_u64(11);

        let outbound = (0..100)
            .filter(|_| split.sample(&mut rng) == Direction::Outbound)
            .count();

        assert!(outbound > 20 && outbound < 80);
    }
}
