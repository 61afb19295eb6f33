use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

/// A seedable random source shared by the value/variable heuristics, the restart tie-break
/// window, and the state computer's "skip propagation" predicate (§4.4, §9 "Randomness").
///
/// Wrapping [`SmallRng`] rather than exposing it directly keeps the random API the solver
/// actually uses small and lets every randomised component in the crate share one seed.
#[derive(Debug, Clone)]
pub(crate) struct Random {
    rng: SmallRng,
}

impl Random {
    /// Create a random source seeded with a fixed value, for reproducible runs.
    pub(crate) fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Pick a uniformly random element from a non-empty slice.
    pub(crate) fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Return `true` with the given probability in `[0.0, 1.0]`.
    pub(crate) fn with_probability(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::with_seed(0)
    }
}
