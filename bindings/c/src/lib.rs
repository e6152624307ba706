//! # CBC bridge C ABI
//!
//! Flat, C-compatible functions over [`cbcbridge_cbc::Solver`], built as
//! `libcbc_bridge` (shared and static). The declarations live in
//! `include/cbc_bridge.h`.
//!
//! ## Conventions
//!
//! 1.  **Opaque handles**: `CBC_CreateSolver` hands out a `void*` that owns one
//!     solver. The host never looks inside it and releases it with
//!     `CBC_FreeSolver`.
//! 2.  **Sentinel results**: every entry point returns `0` (or a non-negative
//!     count) on success and `-1` on failure. Getters that return values fall
//!     back to `0.0` or `NULL`. No error detail crosses the boundary; failures
//!     are reported through `tracing` instead (see [`logging`]).
//! 3.  **No unwinding**: every entry point runs inside `catch_unwind`, so a
//!     panic in Rust or in the wrapped solver becomes `-1` instead of
//!     unwinding into foreign frames.
//! 4.  **No locking**: a handle must not be used from two threads at once.
//!
//! ## Exported Functions
//!
//! ### Lifecycle
//! * `CBC_CreateSolver`
//! * `CBC_FreeSolver`
//!
//! ### Problem assembly
//! * `CBC_SetObjective`
//! * `CBC_AddConstraint`
//! * `CBC_SetVariableBounds`
//! * `CBC_SetVariableInteger`
//! * `CBC_SetObjectiveSense`
//! * `CBC_SetLogLevel`
//!
//! ### Solve and results
//! * `CBC_Solve`
//! * `CBC_GetSolutionStatus`
//! * `CBC_GetStatusString`
//! * `CBC_GetObjectiveValue`
//! * `CBC_GetSolution`
//! * `CBC_GetNumVariables`
//! * `CBC_GetNumConstraints`
//!
//! ### Diagnostics
//! * `CBC_EnableLogging`

pub mod error;
pub mod logging;
pub mod solver;
