//! Input data model for one kernel invocation.

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::Scalar;

/// Number of components in every observation.
pub const TRIPLE_WIDTH: usize = 3;

/// One x-sample or y-sample: exactly three ordered values.
pub type ObservationTriple = [Scalar; TRIPLE_WIDTH];

/// Parameters of the line `y = m*x + q` the observations are scored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub m: Scalar,
    pub q: Scalar,
}

impl ModelParameters {
    pub const fn new(m: Scalar, q: Scalar) -> Self {
        Self { m, q }
    }

    /// Model prediction for a single component. Kept as a separate multiply and
    /// add so every strategy rounds identically.
    #[inline(always)]
    pub fn predict(&self, x: Scalar) -> Scalar {
        self.m * x + self.q
    }

    pub fn is_finite(&self) -> bool {
        self.m.is_finite() && self.q.is_finite()
    }
}

/// Borrowed x/y observation pairs whose lengths are known to agree.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    x: &'a [ObservationTriple],
    y: &'a [ObservationTriple],
}

impl<'a> Batch<'a> {
    /// Pairs the two collections, rejecting mismatched lengths instead of
    /// truncating to the shorter one.
    pub fn new(x: &'a [ObservationTriple], y: &'a [ObservationTriple]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(KernelError::InvalidInput {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &'a [ObservationTriple] {
        self.x
    }

    pub fn y(&self) -> &'a [ObservationTriple] {
        self.y
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a ObservationTriple, &'a ObservationTriple)> + 'a {
        self.x.iter().zip(self.y.iter())
    }

    /// Splits into two batches at `mid`. Both halves keep the length invariant.
    pub fn split_at(&self, mid: usize) -> (Batch<'a>, Batch<'a>) {
        let (x_head, x_tail) = self.x.split_at(mid);
        let (y_head, y_tail) = self.y.split_at(mid);
        (
            Batch {
                x: x_head,
                y: y_head,
            },
            Batch {
                x: x_tail,
                y: y_tail,
            },
        )
    }
}
