//! Strategy selection and the validated entry points of the kernel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::batch::{Batch, ModelParameters, ObservationTriple};
use crate::error::{ConfigError, KernelError, Result};
use crate::parallel::ParallelKernel;
use crate::scalar::ScalarKernel;
use crate::simd::SimdKernel;
use crate::Scalar;

/// One way of executing the per-element residual formula over a batch.
///
/// Implementations may assume `out.len() == batch.len()`; the public entry
/// points check it before dispatching.
pub trait BatchKernel: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, batch: Batch<'_>, params: ModelParameters, out: &mut [Scalar]);
}

/// Runtime-selectable execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One element at a time, inner loop over the three components.
    Scalar,
    /// Eight elements per step in SIMD lanes.
    #[default]
    Simd,
    /// SIMD kernel over rayon-distributed chunks.
    Parallel,
}

static SCALAR: ScalarKernel = ScalarKernel;
static SIMD: SimdKernel = SimdKernel;
static PARALLEL: ParallelKernel = ParallelKernel::new(ParallelKernel::DEFAULT_CHUNK_LEN);

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Scalar, Strategy::Simd, Strategy::Parallel];

    pub fn kernel(self) -> &'static dyn BatchKernel {
        match self {
            Strategy::Scalar => &SCALAR,
            Strategy::Simd => &SIMD,
            Strategy::Parallel => &PARALLEL,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.kernel().name()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Strategy::Scalar),
            "simd" => Ok(Strategy::Simd),
            "parallel" => Ok(Strategy::Parallel),
            _ => Err(ConfigError::UnknownStrategy(value.to_string())),
        }
    }
}

/// Computes one chi-squared value per `(x[i], y[i])` pair.
pub fn compute(
    x: &[ObservationTriple],
    y: &[ObservationTriple],
    params: ModelParameters,
    strategy: Strategy,
) -> Result<Vec<Scalar>> {
    compute_with(strategy.kernel(), x, y, params)
}

/// Same as [`compute`] but writes into a caller-owned buffer.
pub fn compute_into(
    x: &[ObservationTriple],
    y: &[ObservationTriple],
    params: ModelParameters,
    strategy: Strategy,
    out: &mut [Scalar],
) -> Result<()> {
    let batch = Batch::new(x, y)?;
    if out.len() != batch.len() {
        return Err(KernelError::ResultLength {
            expected: batch.len(),
            actual: out.len(),
        });
    }
    strategy.kernel().evaluate(batch, params, out);
    Ok(())
}

/// Compile-time strategy selection.
pub fn compute_with<K: BatchKernel + ?Sized>(
    kernel: &K,
    x: &[ObservationTriple],
    y: &[ObservationTriple],
    params: ModelParameters,
) -> Result<Vec<Scalar>> {
    let batch = Batch::new(x, y)?;
    let mut out = vec![0.0; batch.len()];
    kernel.evaluate(batch, params, &mut out);
    Ok(out)
}
