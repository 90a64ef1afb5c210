//! Batch chi-squared kernel: per-element sum of squared residuals of 3-wide
//! observations against the line `y = m*x + q`.
//!
//! The crate is independent of any clock, RNG state or console. It hosts:
//! - the validated batch data model and the kernel error type
//! - interchangeable execution strategies (scalar, SIMD lanes, rayon chunks)
//! - parity helpers for comparing strategy outputs under a tolerance
//! - seeded batch generation and the benchmark settings shared with the lab

pub mod batch;
pub mod config;
pub mod error;
pub mod generate;
pub mod kernel;
pub mod metrics;
pub mod parallel;
pub mod scalar;
pub mod simd;

/// Scalar type used across the kernel and its harness.
pub type Scalar = f32;

pub use batch::{Batch, ModelParameters, ObservationTriple, TRIPLE_WIDTH};
pub use error::{ConfigError, KernelError};
pub use kernel::{compute, compute_into, compute_with, BatchKernel, Strategy};
pub use metrics::{compare, ParityReport, Tolerance};
