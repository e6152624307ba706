//! Shared solver abstractions: status classification, configuration and errors.

mod config;
mod error;
mod status;

pub use config::{SOLVER_LOG_LEVEL_ENV, SolverConfig};
pub use error::SolverError;
pub use status::SolutionStatus;
