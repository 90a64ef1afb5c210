use glam::Vec3;

use crate::batch::{Batch, ModelParameters, ObservationTriple};
use crate::kernel::BatchKernel;
use crate::Scalar;

/// Straightforward iteration: one observation pair per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernel;

impl BatchKernel for ScalarKernel {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn evaluate(&self, batch: Batch<'_>, params: ModelParameters, out: &mut [Scalar]) {
        debug_assert_eq!(out.len(), batch.len());
        for (slot, (x, y)) in out.iter_mut().zip(batch.iter()) {
            *slot = chi2_triple(x, y, params);
        }
    }
}

/// Sum of squared residuals of one observation pair, components taken in order.
#[inline]
pub fn chi2_triple(x: &ObservationTriple, y: &ObservationTriple, params: ModelParameters) -> Scalar {
    let expected = Vec3::from_array(*x) * params.m + params.q;
    let residual = Vec3::from_array(*y) - expected;
    residual.length_squared()
}
