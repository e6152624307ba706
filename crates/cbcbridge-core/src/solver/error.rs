//! Solver error types.

use crate::model::ModelError;
use crate::solver::SolutionStatus;

/// Error type for solver handle operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Argument rejected while assembling the problem.
    InvalidArgument(ModelError),
    /// No variables declared before solving.
    EmptyModel,
    /// The wrapped library failed while solving.
    NativeException(String),
    /// No optimal solution is cached on the handle.
    NoSolutionAvailable {
        /// Status of the last solve, `None` if never solved.
        status: Option<SolutionStatus>,
    },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::InvalidArgument(err) => err.code(),
            SolverError::EmptyModel => "MODEL_EMPTY",
            SolverError::NativeException(_) => "SOLVER_NATIVE_EXCEPTION",
            SolverError::NoSolutionAvailable { status } => match status {
                None => "SOLUTION_NOT_SOLVED",
                Some(SolutionStatus::Infeasible) => "SOLVER_INFEASIBLE",
                Some(_) => "SOLUTION_UNAVAILABLE",
            },
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::InvalidArgument(err) => write!(f, "{}", err),
            SolverError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            SolverError::NativeException(msg) => {
                write!(f, "[{}] Solver library failed: {}", self.code(), msg)
            }
            SolverError::NoSolutionAvailable { status: None } => {
                write!(f, "[{}] Solve has not been called", self.code())
            }
            SolverError::NoSolutionAvailable {
                status: Some(status),
            } => write!(
                f,
                "[{}] No optimal solution available (status: {})",
                self.code(),
                status
            ),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::InvalidArgument(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        SolverError::InvalidArgument(err)
    }
}
