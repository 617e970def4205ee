//! Sources of uniformly distributed indices for the draw engine.

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`, each with probability `1 / len`.
    /// `len` must be non-zero.
    fn index_below(&mut self, len: usize) -> usize;
}

/// Adapter over any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + Sync> RandomSource for RngSource<R> {
    fn index_below(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays a scripted sequence of indices, cycling when exhausted.
/// Indices past the end of the pool are clamped to the last position.
#[derive(Debug, Clone)]
pub struct FixedSource {
    indices: Vec<usize>,
    cursor: usize,
}

impl FixedSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, cursor: 0 }
    }

    pub fn constant(index: usize) -> Self {
        Self::new(vec![index])
    }
}

impl RandomSource for FixedSource {
    fn index_below(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let value = self.indices[self.cursor % self.indices.len()];
        self.cursor += 1;
        value.min(len.saturating_sub(1))
    }
}
