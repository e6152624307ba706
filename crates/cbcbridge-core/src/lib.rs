//! Problem assembly and shared solver types for the CBC bridge.
//!
//! # Overview
//!
//! - [`Problem`]: accumulates objective, variables and sparse rows
//! - [`SolutionStatus`]: classification of a finished search
//! - [`SolverConfig`]: per-handle solver options
//! - [`SolverError`] / [`ModelError`]: error taxonomy

pub mod model;
pub mod solver;
pub mod types;

pub use model::{ModelError, Problem};
pub use solver::{SolutionStatus, SolverConfig, SolverError};
pub use types::{Bounds, ObjectiveSense, SparseRow, Variable};
