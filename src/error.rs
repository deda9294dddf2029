//! Construction-time validation errors.

use thiserror::Error;

/// Returned by the fallible constructors when a requested capacity cannot
/// be honoured.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// A capacity of zero has no sensible power-of-two rounding.
    #[error("requested capacity must be non-zero")]
    ZeroCapacity,
}
