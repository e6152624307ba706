//! Safe solver handle over COIN-OR CBC.
//!
//! [`Solver`] accumulates a [`cbcbridge_core::Problem`] and, on every solve,
//! builds a fresh [`CbcModel`] from it, runs branch-and-bound through
//! `coin_cbc`, and caches the outcome as a [`Solution`].

pub mod ffi;
pub mod solution;
pub mod solver;
mod status;

pub use cbcbridge_core::{
    Bounds, ModelError, ObjectiveSense, Problem, SolutionStatus, SolverConfig, SolverError,
};
pub use ffi::{CbcModel, CbcModelError};
pub use solution::Solution;
pub use solver::{Solver, panic_message};
