use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Probability that a node is promoted one level higher.
pub(crate) const PROMOTE_PROBABILITY: f64 = 0.5;

/// Draws the level for nodes as they are inserted.
///
/// The list only requires that every drawn level falls in
/// `1..=max_level()`; the distribution is the generator's business.
/// Keeping this behind a trait lets tests pin node levels exactly.
pub trait LevelGenerator {
    /// Highest level this generator will ever return.
    fn max_level(&self) -> usize;

    /// Draws the level for a new node.
    fn random_level(&mut self) -> usize;
}

/// Samples levels from a geometric distribution: the level starts at 1
/// and is incremented while a biased coin flip succeeds, capped at
/// `max_level`. With the standard promotion probability of 0.5 this
/// yields the expected O(log n) search behavior.
pub struct GeometricLevelGenerator {
    max_level: usize,
    rng: SmallRng,
}

impl GeometricLevelGenerator {
    pub fn new(max_level: usize) -> GeometricLevelGenerator {
        Self::with_rng(max_level, SmallRng::from_entropy())
    }

    /// Uses the given random source; seed it for reproducible structures.
    pub fn with_rng(max_level: usize, rng: SmallRng) -> GeometricLevelGenerator {
        assert!(max_level >= 1, "a skip list needs at least one level");
        GeometricLevelGenerator { max_level, rng }
    }
}

impl LevelGenerator for GeometricLevelGenerator {
    fn max_level(&self) -> usize {
        self.max_level
    }

    fn random_level(&mut self) -> usize {
        // Number of successes until the first failure. gen::<f64>()
        // samples uniformly from [0, 1).
        let mut level = 1;
        while level < self.max_level && self.rng.gen::<f64>() < PROMOTE_PROBABILITY {
            level += 1;
        }
        level
    }
}

/// Level bound for a list expected to hold at most `max_nodes` distinct
/// keys: `round(log(max_nodes) / log(1 / p))`, never less than 1.
pub fn level_for_max_nodes(max_nodes: usize) -> usize {
    if max_nodes < 2 {
        return 1;
    }

    let levels = (max_nodes as f64).ln() / (1.0 / PROMOTE_PROBABILITY).ln();
    (levels.round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_level_stays_in_range() {
        let mut generator = GeometricLevelGenerator::with_rng(12, SmallRng::seed_from_u64(7));
        for _ in 0..10_000 {
            let level = generator.random_level();
            assert!(level >= 1);
            assert!(level <= 12);
        }
    }

    #[test]
    fn random_level_capped_at_one() {
        let mut generator = GeometricLevelGenerator::with_rng(1, SmallRng::seed_from_u64(7));
        for _ in 0..100 {
            assert_eq!(generator.random_level(), 1);
        }
    }

    #[test]
    fn random_level_reaches_beyond_one() {
        // With p = 0.5, ten thousand draws without a single promotion
        // would mean a broken coin.
        let mut generator = GeometricLevelGenerator::with_rng(8, SmallRng::seed_from_u64(7));
        assert!((0..10_000).any(|_| generator.random_level() > 1));
    }

    #[test]
    fn level_for_max_nodes_follows_log() {
        assert_eq!(level_for_max_nodes(0), 1);
        assert_eq!(level_for_max_nodes(1), 1);
        assert_eq!(level_for_max_nodes(2), 1);
        assert_eq!(level_for_max_nodes(1024), 10);
        assert_eq!(level_for_max_nodes(1_000_000), 20);
    }

    #[test]
    #[should_panic]
    fn zero_max_level_rejected() {
        GeometricLevelGenerator::new(0);
    }
}
