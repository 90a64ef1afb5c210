use crate::batch::{Batch, ModelParameters};
use crate::kernel::BatchKernel;
use crate::simd::{SimdKernel, LANES};
use crate::Scalar;

/// Splits the batch into fixed-size chunks and runs the SIMD kernel on each
/// chunk from the rayon pool, halving recursively with `rayon::join`.
/// Elements are independent, so any partitioning produces the same values as
/// a single SIMD pass.
#[derive(Debug, Clone, Copy)]
pub struct ParallelKernel {
    chunk_len: usize,
}

impl ParallelKernel {
    pub const DEFAULT_CHUNK_LEN: usize = 4096;

    /// `chunk_len` is rounded up to a whole number of SIMD registers; zero
    /// falls back to one register per chunk.
    pub const fn new(chunk_len: usize) -> Self {
        let lanes = if chunk_len == 0 { 1 } else { chunk_len.div_ceil(LANES) };
        Self {
            chunk_len: lanes * LANES,
        }
    }

    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }
}

impl Default for ParallelKernel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHUNK_LEN)
    }
}

impl BatchKernel for ParallelKernel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn evaluate(&self, batch: Batch<'_>, params: ModelParameters, out: &mut [Scalar]) {
        debug_assert_eq!(out.len(), batch.len());
        if batch.len() <= self.chunk_len {
            SimdKernel.evaluate(batch, params, out);
            return;
        }

        // Split on a chunk boundary so the leaves match a left-to-right
        // chunking of the batch.
        let chunks = batch.len().div_ceil(self.chunk_len);
        let mid = (chunks / 2) * self.chunk_len;
        let (head, tail) = batch.split_at(mid);
        let (head_out, tail_out) = out.split_at_mut(mid);
        rayon::join(
            || self.evaluate(head, params, head_out),
            || self.evaluate(tail, params, tail_out),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_len_rounds_to_register_width() {
        assert_eq!(ParallelKernel::new(0).chunk_len(), LANES);
        assert_eq!(ParallelKernel::new(1).chunk_len(), LANES);
        assert_eq!(ParallelKernel::new(17).chunk_len(), 3 * LANES);
        assert_eq!(ParallelKernel::default().chunk_len(), 4096);
    }

    #[test]
    fn chunked_matches_single_pass() {
        let count = 1000;
        let x: Vec<_> = (0..count)
            .map(|i| {
                let v = i as f32 * 0.01;
                [v, v + 1.0, v + 2.0]
            })
            .collect();
        let y: Vec<_> = (0..count)
            .map(|i| {
                let v = (count - i) as f32 * 0.01;
                [v, 2.0 * v, 3.0 * v]
            })
            .collect();
        let params = ModelParameters::new(0.75, -1.25);
        let batch = Batch::new(&x, &y).unwrap();

        let mut single = vec![0.0; count];
        let mut chunked = vec![0.0; count];
        SimdKernel.evaluate(batch, params, &mut single);
        ParallelKernel::new(24).evaluate(batch, params, &mut chunked);
        assert_eq!(single, chunked);
    }

    #[test]
    fn every_slot_is_written_for_ragged_lengths() {
        let kernel = ParallelKernel::new(16);
        let params = ModelParameters::new(1.0, 1.0);
        for count in [17, 33, 47, 100, 129] {
            let x = vec![[1.0, 2.0, 3.0]; count];
            let y = vec![[0.0, 0.0, 0.0]; count];
            let batch = Batch::new(&x, &y).unwrap();
            let mut out = vec![-1.0; count];
            kernel.evaluate(batch, params, &mut out);
            // (2^2 + 3^2 + 4^2) for every element
            assert!(out.iter().all(|&v| v == 29.0), "count {count}: {out:?}");
        }
    }
}
