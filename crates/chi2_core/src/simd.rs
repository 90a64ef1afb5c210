//! Data-parallel strategy: eight observation pairs share one instruction stream.
//!
//! Each step transposes eight array-of-structures triples into three lane
//! vectors per side, evaluates the residual formula once per component and
//! stores eight results. The tail that does not fill a full register falls
//! back to [`chi2_triple`]. The per-element math and its component order are
//! the same as the scalar strategy.

use wide::f32x8;

use crate::batch::{Batch, ModelParameters, ObservationTriple, TRIPLE_WIDTH};
use crate::kernel::BatchKernel;
use crate::scalar::chi2_triple;
use crate::Scalar;

/// Lane count of the vector register used per step.
pub const LANES: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimdKernel;

impl BatchKernel for SimdKernel {
    fn name(&self) -> &'static str {
        "simd"
    }

    fn evaluate(&self, batch: Batch<'_>, params: ModelParameters, out: &mut [Scalar]) {
        debug_assert_eq!(out.len(), batch.len());
        let m = f32x8::splat(params.m);
        let q = f32x8::splat(params.q);

        let mut out_chunks = out.chunks_exact_mut(LANES);
        let mut x_chunks = batch.x().chunks_exact(LANES);
        let mut y_chunks = batch.y().chunks_exact(LANES);

        for ((dst, xs), ys) in (&mut out_chunks).zip(&mut x_chunks).zip(&mut y_chunks) {
            let mut acc = f32x8::splat(0.0);
            for j in 0..TRIPLE_WIDTH {
                let xv = gather_component(xs, j);
                let yv = gather_component(ys, j);
                let residual = yv - (xv * m + q);
                acc = acc + residual * residual;
            }
            dst.copy_from_slice(&acc.to_array());
        }

        let tail = out_chunks.into_remainder();
        for ((slot, x), y) in tail
            .iter_mut()
            .zip(x_chunks.remainder())
            .zip(y_chunks.remainder())
        {
            *slot = chi2_triple(x, y, params);
        }
    }
}

#[inline(always)]
fn gather_component(triples: &[ObservationTriple], component: usize) -> f32x8 {
    let mut lanes = [0.0f32; LANES];
    for (lane, triple) in lanes.iter_mut().zip(triples) {
        *lane = triple[component];
    }
    f32x8::from(lanes)
}
