//! Index pickers: the source of randomness for page selection.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index in `0..bound`.
///
/// Callers never pass a zero bound.
pub trait IndexPicker: Send + Sync {
    /// Returns an index in `0..bound`.
    fn pick(&self, bound: usize) -> usize;
}

impl<F> IndexPicker for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn pick(&self, bound: usize) -> usize {
        self(bound)
    }
}

/// Uniform picks from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Uniform picks from a seeded generator, reproducible across runs.
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    /// Creates a picker from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IndexPicker for SeededPicker {
    fn pick(&self, bound: usize) -> usize {
        self.rng.lock().gen_range(0..bound)
    }
}
