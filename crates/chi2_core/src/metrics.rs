//! Numeric helpers for comparing the outputs of two execution strategies.

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::Scalar;

/// Relative tolerance, floored at an absolute scale of one:
/// `|a - b| <= relative * max(1, |a|)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub relative: Scalar,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { relative: 1e-5 }
    }
}

impl Tolerance {
    pub const fn new(relative: Scalar) -> Self {
        Self { relative }
    }

    /// Two NaNs agree: both strategies propagated the same non-finite input.
    pub fn approx_eq(&self, reference: Scalar, candidate: Scalar) -> bool {
        if reference.is_nan() || candidate.is_nan() {
            return reference.is_nan() && candidate.is_nan();
        }
        if reference == candidate {
            return true;
        }
        (reference - candidate).abs() <= self.relative * reference.abs().max(1.0)
    }
}

/// Outcome of comparing a candidate result batch against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParityReport {
    pub len: usize,
    pub max_abs_error: Scalar,
    pub max_rel_error: Scalar,
    pub mismatches: usize,
    pub worst_index: Option<usize>,
    /// Every element identical bit-for-bit. Reported only; pass/fail uses the
    /// tolerance.
    pub bit_exact: bool,
    pub tolerance: Tolerance,
}

impl ParityReport {
    pub fn is_match(&self) -> bool {
        self.mismatches == 0
    }
}

pub fn compare(
    reference: &[Scalar],
    candidate: &[Scalar],
    tolerance: Tolerance,
) -> Result<ParityReport> {
    if reference.len() != candidate.len() {
        return Err(KernelError::ResultLength {
            expected: reference.len(),
            actual: candidate.len(),
        });
    }

    let mut report = ParityReport {
        len: reference.len(),
        max_abs_error: 0.0,
        max_rel_error: 0.0,
        mismatches: 0,
        worst_index: None,
        bit_exact: true,
        tolerance,
    };

    for (idx, (&a, &b)) in reference.iter().zip(candidate).enumerate() {
        if a.to_bits() != b.to_bits() {
            report.bit_exact = false;
        }
        if !tolerance.approx_eq(a, b) {
            report.mismatches += 1;
        }
        let abs = (a - b).abs();
        if abs.is_nan() {
            continue;
        }
        if abs > report.max_abs_error {
            report.max_abs_error = abs;
            report.worst_index = Some(idx);
        }
        report.max_rel_error = report.max_rel_error.max(abs / a.abs().max(1.0));
    }

    Ok(report)
}

/// Sum over a result batch, printed alongside timings as a quick fingerprint.
pub fn checksum(values: &[Scalar]) -> f64 {
    values.iter().map(|&v| f64::from(v)).sum()
}
