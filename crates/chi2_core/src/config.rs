//! Benchmark settings shared by the lab harness and its binary.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::batch::ModelParameters;
use crate::error::ConfigError;
use crate::generate::check_range;
use crate::kernel::Strategy;
use crate::metrics::Tolerance;
use crate::parallel::ParallelKernel;
use crate::Scalar;

/// Settings for one benchmark run. Defaults reproduce the reference run:
/// 100k observation pairs drawn from `[0, 10)` with seed 123, scored
/// against `y = 1.5x + 0.8`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    pub m: Scalar,
    pub q: Scalar,
    pub size: usize,
    pub seed: u64,
    pub value_min: Scalar,
    pub value_max: Scalar,
    pub print_max: usize,
    pub tolerance: Scalar,
    pub chunk_len: usize,
    /// Strategy timed against the scalar baseline.
    pub contender: Strategy,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            m: 1.5,
            q: 0.8,
            size: 100_000,
            seed: 123,
            value_min: 0.0,
            value_max: 10.0,
            print_max: 20,
            tolerance: 1e-5,
            chunk_len: ParallelKernel::DEFAULT_CHUNK_LEN,
            contender: Strategy::Simd,
        }
    }
}

impl BenchSettings {
    pub fn params(&self) -> ModelParameters {
        ModelParameters::new(self.m, self.q)
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance)
    }

    pub fn value_range(&self) -> Range<Scalar> {
        self.value_min..self.value_max
    }

    /// Checks the settings a run cannot proceed without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.params().is_finite() {
            return Err(ConfigError::NonFiniteParameters {
                m: self.m,
                q: self.q,
            });
        }
        check_range(&self.value_range())?;
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if self.chunk_len == 0 {
            return Err(ConfigError::ZeroChunkLength);
        }
        Ok(())
    }
}
