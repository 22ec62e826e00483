use rand::Rng;

use crate::decay::{self, Decay};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The epsilon threshold at time `t`
    pub fn epsilon(&self, t: u32) -> f32 {
        self.epsilon.evaluate(t as f32)
    }

    /// Invoke epsilon greedy policy for time `t`
    ///
    /// A uniform draw in `[0,1)` at or below epsilon explores.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R, t: u32) -> Choice {
        if rng.gen::<f32>() > self.epsilon(t) {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}

impl EpsilonGreedy<decay::Constant> {
    /// Fixed epsilon for the whole run
    pub fn constant(epsilon: f32) -> Self {
        Self::new(decay::Constant::new(epsilon))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn zero_epsilon_always_exploits() {
        let policy = EpsilonGreedy::constant(0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let explored = (0..1000)
            .filter(|_| policy.choose(&mut rng, 0) == Choice::Explore)
            .count();
        // only an exact 0.0 draw could explore
        assert!(explored <= 1, "explored {explored} times with epsilon 0");
    }

    #[test]
    fn full_epsilon_always_explores() {
        let policy = EpsilonGreedy::constant(1.0);
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..1000).all(|_| policy.choose(&mut rng, 0) == Choice::Explore));
    }

    #[test]
    fn decayed_epsilon_follows_schedule() {
        let policy = EpsilonGreedy::new(decay::Linear::new(0.1, 1.0, 0.0).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(20), 0.0);
    }
}
