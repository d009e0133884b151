//! Injected randomness for reviewer selection

use std::sync::{Arc, Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shared pseudorandom source.
///
/// Cloning shares the underlying generator. Production code uses
/// [`RandomSource::from_entropy`]; tests pass [`RandomSource::seeded`] to
/// get reproducible selections.
#[derive(Clone)]
pub struct RandomSource {
    rng: Arc<Mutex<StdRng>>,
}

impl RandomSource {
    /// Seed from operating system entropy
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic source for tests
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Uniform random permutation in place (Fisher-Yates)
    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.lock());
    }

    /// Uniform index in `0..len`, `None` when `len` is zero
    pub fn index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.lock().gen_range(0..len))
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        // The generator has no invariants a panicking holder could break
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_agree() {
        let a = RandomSource::seeded(42);
        let b = RandomSource::seeded(42);

        let mut left: Vec<u32> = (0..10).collect();
        let mut right = left.clone();
        a.shuffle(&mut left);
        b.shuffle(&mut right);
        assert_eq!(left, right);
        assert_eq!(a.index(7), b.index(7));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let source = RandomSource::seeded(7);
        let mut items: Vec<u32> = (0..20).collect();
        source.shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_index_bounds() {
        let source = RandomSource::seeded(1);
        assert_eq!(source.index(0), None);
        assert_eq!(source.index(1), Some(0));
        for _ in 0..100 {
            let idx = source.index(3).unwrap();
            assert!(idx < 3);
        }
    }

    #[test]
    fn test_clones_share_generator() {
        let source = RandomSource::seeded(3);
        let reference = RandomSource::seeded(3);
        let clone = source.clone();

        let first = source.index(1000);
        let second = clone.index(1000);
        assert_eq!(first, reference.index(1000));
        assert_eq!(second, reference.index(1000));
    }
}
