//! Sources of randomness for reply selection.
//!
//! The processor never touches a random generator directly. It asks a
//! [`ChoiceSource`] for coin flips and indices, which lets tests script the
//! exact branch they want to exercise.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Coin flips and uniform picks.
pub trait ChoiceSource {
    /// Fair coin.
    fn flip(&mut self) -> bool;

    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

// =============================================================================
// RandomChoices
// =============================================================================

/// Choices backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomChoices<R> {
    rng: R,
}

impl<R: Rng> RandomChoices<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomChoices<StdRng> {
    /// Seeded from the operating system.
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ChoiceSource for RandomChoices<R> {
    fn flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Generator used outside of tests.
pub type DefaultChoices = RandomChoices<StdRng>;

// =============================================================================
// ScriptedChoices
// =============================================================================

/// Replays queued answers in order.
///
/// Once a queue runs dry, flips answer `false` and picks answer `0`.
/// Queued picks larger than the requested range wrap around.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChoices {
    flips: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedChoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flips(mut self, flips: impl IntoIterator<Item = bool>) -> Self {
        self.flips.extend(flips);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Answers not consumed yet, flips then picks.
    pub fn remaining(&self) -> (usize, usize) {
        (self.flips.len(), self.picks.len())
    }
}

impl ChoiceSource for ScriptedChoices {
    fn flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        match (self.picks.pop_front(), len) {
            (_, 0) => 0,
            (Some(p), len) => p % len,
            (None, _) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_in_order() {
        let mut choices = ScriptedChoices::new()
            .with_flips([true, false, true])
            .with_picks([2, 1]);
        assert!(choices.flip());
        assert!(!choices.flip());
        assert!(choices.flip());
        assert_eq!(choices.pick(3), 2);
        assert_eq!(choices.pick(3), 1);
    }

    #[test]
    fn test_scripted_defaults_when_exhausted() {
        let mut choices = ScriptedChoices::new();
        assert!(!choices.flip());
        assert_eq!(choices.pick(5), 0);
    }

    #[test]
    fn test_scripted_pick_wraps() {
        let mut choices = ScriptedChoices::new().with_picks([7]);
        assert_eq!(choices.pick(3), 1);
    }

    #[test]
    fn test_scripted_remaining() {
        let mut choices = ScriptedChoices::new().with_flips([true]).with_picks([0, 0]);
        assert_eq!(choices.remaining(), (1, 2));
        choices.flip();
        choices.pick(2);
        assert_eq!(choices.remaining(), (0, 1));
    }

    #[test]
    fn test_random_pick_stays_in_range() {
        let mut choices = RandomChoices::seeded(1234);
        for _ in 0..200 {
            assert!(choices.pick(3) < 3);
        }
        assert_eq!(choices.pick(1), 0);
        assert_eq!(choices.pick(0), 0);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomChoices::seeded(99);
        let mut b = RandomChoices::seeded(99);
        let seq_a: Vec<bool> = (0..32).map(|_| a.flip()).collect();
        let seq_b: Vec<bool> = (0..32).map(|_| b.flip()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_random_flip_produces_both_sides() {
        let mut choices = RandomChoices::seeded(7);
        let flips: Vec<bool> = (0..256).map(|_| choices.flip()).collect();
        assert!(flips.iter().any(|f| *f));
        assert!(flips.iter().any(|f| !*f));
    }
}
