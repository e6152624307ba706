//! Boundary errors and panic containment.

use cbcbridge_cbc::{SolverError, panic_message};
use libc::c_int;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, warn};

/// Result code for success.
pub const CBC_OK: c_int = 0;
/// Result code for any failure.
pub const CBC_ERROR: c_int = -1;

/// Reasons an entry point rejects a call before or while touching the handle.
#[derive(Debug, Clone, PartialEq)]
pub enum FfiError {
    /// Handle pointer is null
    NullHandle,
    /// A required array pointer is null
    NullArgument(&'static str),
    /// Element count is zero or negative
    NonPositiveCount(c_int),
    /// Variable index is negative
    NegativeIndex(c_int),
    /// Objective sense is neither `-1` nor `1`
    InvalidSense(c_int),
    /// Log level is negative
    InvalidLogLevel(c_int),
    /// Error raised by the solver handle
    Solver(SolverError),
}

impl FfiError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            FfiError::NullHandle => "HANDLE_NULL",
            FfiError::NullArgument(_) => "ARGUMENT_NULL",
            FfiError::NonPositiveCount(_) => "ARGUMENT_NON_POSITIVE_COUNT",
            FfiError::NegativeIndex(_) => "ARGUMENT_NEGATIVE_INDEX",
            FfiError::InvalidSense(_) => "OBJECTIVE_INVALID_SENSE",
            FfiError::InvalidLogLevel(_) => "CONFIG_INVALID_LOG_LEVEL",
            FfiError::Solver(err) => err.code(),
        }
    }
}

impl std::fmt::Display for FfiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FfiError::NullHandle => write!(f, "[{}] Solver handle is null", self.code()),
            FfiError::NullArgument(name) => {
                write!(f, "[{}] Argument `{}` is null", self.code(), name)
            }
            FfiError::NonPositiveCount(count) => {
                write!(f, "[{}] Count must be positive (got {})", self.code(), count)
            }
            FfiError::NegativeIndex(index) => {
                write!(f, "[{}] Index must be non-negative (got {})", self.code(), index)
            }
            FfiError::InvalidSense(sense) => write!(
                f,
                "[{}] Objective sense must be -1 (maximize) or 1 (minimize), got {}",
                self.code(),
                sense
            ),
            FfiError::InvalidLogLevel(level) => write!(
                f,
                "[{}] Log level must be non-negative (got {})",
                self.code(),
                level
            ),
            FfiError::Solver(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FfiError {}

impl From<SolverError> for FfiError {
    fn from(err: SolverError) -> Self {
        FfiError::Solver(err)
    }
}

/// Run an entry point body, flattening errors and panics to `fallback`.
pub(crate) fn guard<T>(
    operation: &'static str,
    fallback: T,
    body: impl FnOnce() -> Result<T, FfiError>,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            warn!(
                component = "ffi",
                operation,
                status = "error",
                code = err.code(),
                "{}",
                err
            );
            fallback
        }
        Err(payload) => {
            let err = FfiError::Solver(SolverError::NativeException(panic_message(
                payload.as_ref(),
            )));
            error!(
                component = "ffi",
                operation,
                status = "error",
                code = err.code(),
                "Caught panic at the C boundary: {}",
                err
            );
            fallback
        }
    }
}

/// Convert a C element count, rejecting zero and negatives.
pub(crate) fn to_count(count: c_int) -> Result<usize, FfiError> {
    match usize::try_from(count) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(FfiError::NonPositiveCount(count)),
    }
}

/// Convert a C variable index, rejecting negatives.
pub(crate) fn to_index(index: c_int) -> Result<usize, FfiError> {
    usize::try_from(index).map_err(|_| FfiError::NegativeIndex(index))
}

/// Clamp a count into a C int.
pub(crate) fn to_c_int(value: usize) -> c_int {
    c_int::try_from(value).unwrap_or(c_int::MAX)
}
