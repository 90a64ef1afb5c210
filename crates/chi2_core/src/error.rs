use thiserror::Error;

use crate::Scalar;

/// Failures surfaced by the kernel entry points.
///
/// Non-finite inputs are not an error: NaN and infinities propagate through
/// the arithmetic into the affected result slot only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("invalid input: x batch holds {x_len} observations but y batch holds {y_len}")]
    InvalidInput { x_len: usize, y_len: usize },

    #[error("invalid input: result buffer holds {actual} slots, batch needs {expected}")]
    ResultLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Rejected benchmark settings, generation ranges and strategy names.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("model parameters must be finite (m={m}, q={q})")]
    NonFiniteParameters { m: Scalar, q: Scalar },

    #[error("value range [{min}, {max}) is empty or not finite")]
    InvalidRange { min: Scalar, max: Scalar },

    #[error("tolerance {0} must be a finite non-negative value")]
    InvalidTolerance(Scalar),

    #[error("chunk length must be at least 1")]
    ZeroChunkLength,

    #[error("unknown strategy '{0}' (expected scalar, simd or parallel)")]
    UnknownStrategy(String),
}
