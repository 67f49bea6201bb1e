//! Percent rolls
//!
//! Every random decision in the crate is a draw from `[0, 100)`. Components take
//! a `&mut impl RollSource` so hosts can pass any `rand::Rng` and tests can pass
//! a scripted sequence.

use std::collections::VecDeque;

use rand::Rng;

/// A source of uniform percent rolls in `[0, 100)`
pub trait RollSource {
    /// Draw the next roll
    fn roll_percent(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RollSource for R {
    fn roll_percent(&mut self) -> f64 {
        self.gen_range(0.0..100.0)
    }
}

/// Replays a fixed list of rolls, then keeps returning `fallback`
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    queue: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: rolls.into_iter().collect(),
            fallback: 0.0,
            drawn: 0,
        }
    }

    /// Value returned once the scripted rolls run out
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// How many rolls have been consumed so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Rolls not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll_percent(&mut self) -> f64 {
        self.drawn += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rng_rolls_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let roll = rng.roll_percent();
            assert!((0.0..100.0).contains(&roll));
        }
    }

    #[test]
    fn test_scripted_rolls_replay_then_fallback() {
        let mut rolls = ScriptedRolls::new([3.0, 42.5]).with_fallback(99.0);
        assert_eq!(rolls.roll_percent(), 3.0);
        assert_eq!(rolls.roll_percent(), 42.5);
        assert_eq!(rolls.roll_percent(), 99.0);
        assert_eq!(rolls.drawn(), 3);
        assert_eq!(rolls.remaining(), 0);
    }
}
