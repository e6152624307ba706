//! Solver handle: problem assembly plus the cached outcome of the last solve.

use crate::ffi::{CbcModel, CbcModelError};
use crate::solution::Solution;
use cbcbridge_core::{
    Bounds, ObjectiveSense, Problem, SolutionStatus, SolverConfig, SolverError,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Tolerance for checking points CBC returns without an optimality proof.
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Convert a CbcModelError into a SolverError.
fn cbc_model_error_to_solver_error(err: CbcModelError) -> SolverError {
    SolverError::NativeException(err.to_string())
}

/// Render a caught panic payload as text.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One independently owned CBC problem and its latest solve outcome.
///
/// Not synchronized: a handle must be used by one thread at a time.
#[derive(Debug)]
pub struct Solver {
    problem: Problem,
    config: SolverConfig,
    solved: Option<Solution>,
}

impl Solver {
    /// Create a maximizing solver with default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::new())
    }

    /// Create a maximizing solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        debug!(
            component = "solver",
            operation = "init",
            status = "success",
            ?config,
            "Creating solver handle"
        );
        Solver {
            problem: Problem::new(ObjectiveSense::Maximize),
            config,
            solved: None,
        }
    }

    /// Get access to the current solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Set the CBC log level for subsequent solves.
    pub fn set_log_level(&mut self, level: u32) {
        self.config = std::mem::take(&mut self.config).with_log_level(level);
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn num_variables(&self) -> usize {
        self.problem.num_variables()
    }

    pub fn num_constraints(&self) -> usize {
        self.problem.num_constraints()
    }

    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) {
        self.problem.set_sense(sense);
    }

    /// Overwrite objective coefficients, declaring variables as needed.
    pub fn set_objective(&mut self, coefficients: &[f64]) -> Result<(), SolverError> {
        Ok(self.problem.set_objective(coefficients)?)
    }

    /// Append the row `lower <= sum(values[k] * x[indices[k]]) <= upper`.
    pub fn add_constraint(
        &mut self,
        indices: &[usize],
        values: &[f64],
        lower: f64,
        upper: f64,
    ) -> Result<usize, SolverError> {
        Ok(self
            .problem
            .add_constraint(indices, values, Bounds::new(lower, upper))?)
    }

    pub fn set_variable_bounds(
        &mut self,
        index: usize,
        lower: f64,
        upper: f64,
    ) -> Result<(), SolverError> {
        Ok(self
            .problem
            .set_variable_bounds(index, Bounds::new(lower, upper))?)
    }

    pub fn set_variable_integer(&mut self, index: usize) -> Result<(), SolverError> {
        Ok(self.problem.set_variable_integer(index)?)
    }

    /// Solve the current problem from scratch.
    ///
    /// The previous outcome is discarded before anything else, so a failed
    /// solve leaves no stale result behind.
    ///
    /// # Errors
    ///
    /// Returns `EmptyModel` if no variables are declared and
    /// `NativeException` if the solver library fails.
    pub fn solve(&mut self) -> Result<SolutionStatus, SolverError> {
        self.solved = None;

        if self.problem.num_variables() == 0 {
            warn!(
                component = "solver",
                operation = "solve",
                status = "error",
                code = SolverError::EmptyModel.code(),
                "Refusing to solve a model without variables"
            );
            return Err(SolverError::EmptyModel);
        }

        let problem = &self.problem;
        let config = &self.config;
        let solution = panic::catch_unwind(AssertUnwindSafe(|| solve_problem(problem, config)))
            .map_err(|payload| SolverError::NativeException(panic_message(payload.as_ref())))
            .and_then(|result| result)
            .inspect_err(|err| {
                warn!(
                    component = "solver",
                    operation = "solve",
                    status = "error",
                    code = err.code(),
                    "Solve failed: {}",
                    err
                );
            })?;

        let status = solution.status();
        self.solved = Some(solution);
        Ok(status)
    }

    /// Status of the last completed solve, `None` before the first one.
    pub fn status(&self) -> Option<SolutionStatus> {
        self.solved.as_ref().map(Solution::status)
    }

    /// Outcome of the last completed solve.
    pub fn last_solution(&self) -> Option<&Solution> {
        self.solved.as_ref()
    }

    /// Objective value of the cached optimal solution, `0.0` otherwise.
    pub fn objective_value(&self) -> f64 {
        self.solved
            .as_ref()
            .map_or(0.0, Solution::objective_value)
    }

    /// Values of the cached optimal solution.
    pub fn solution(&self) -> Result<&[f64], SolverError> {
        self.solved
            .as_ref()
            .ok_or(SolverError::NoSolutionAvailable { status: None })?
            .values()
    }

    /// Copy `min(buffer.len(), num_variables)` solution values into `buffer`.
    pub fn copy_solution(&self, buffer: &mut [f64]) -> Result<usize, SolverError> {
        self.solved
            .as_ref()
            .ok_or(SolverError::NoSolutionAvailable { status: None })?
            .copy_into(buffer)
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

fn build_cbc_model(problem: &Problem, config: &SolverConfig) -> Result<CbcModel, SolverError> {
    let mut model = CbcModel::new();
    model.set_objective_sense(problem.sense());
    if let Some(level) = config.log_level {
        model.set_log_level(level);
    }

    for (var, &coeff) in problem.variables().iter().zip(problem.objective()) {
        if var.is_integer {
            model.add_integer_col(var.bounds.lower, var.bounds.upper, coeff);
        } else {
            model.add_col(var.bounds.lower, var.bounds.upper, coeff);
        }
    }

    for row in problem.rows() {
        model
            .add_row(row.bounds.lower, row.bounds.upper, row.entries())
            .map_err(cbc_model_error_to_solver_error)?;
    }

    debug!(
        component = "solver",
        operation = "build_model",
        status = "success",
        variables = problem.num_variables() as u64,
        constraints = problem.num_constraints() as u64,
        nnz = problem.num_coefficients() as u64,
        "Built CBC model from problem"
    );
    Ok(model)
}

fn solve_problem(problem: &Problem, config: &SolverConfig) -> Result<Solution, SolverError> {
    let mut model = build_cbc_model(problem, config)?;

    let started = Instant::now();
    let status = model.solve();
    let solve_time_seconds = started.elapsed().as_secs_f64();

    if !status.is_optimal() {
        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            result = status.as_str(),
            solve_time_seconds,
            "Search finished without an optimal solution"
        );
        return Ok(Solution::without_values(status, solve_time_seconds));
    }

    let mut values = model
        .col_values()
        .map_err(cbc_model_error_to_solver_error)?
        .to_vec();
    values.resize(problem.num_variables(), 0.0);

    let proven = model
        .is_proven_optimal()
        .map_err(cbc_model_error_to_solver_error)?;
    if !proven && !problem.is_feasible(&values, FEASIBILITY_TOLERANCE) {
        warn!(
            component = "solver",
            operation = "solve",
            status = "success",
            result = SolutionStatus::Unknown.as_str(),
            solve_time_seconds,
            "CBC finished without a proof and returned an infeasible point"
        );
        return Ok(Solution::without_values(
            SolutionStatus::Unknown,
            solve_time_seconds,
        ));
    }

    let native_objective_value = model
        .objective_value()
        .map_err(cbc_model_error_to_solver_error)?;
    let objective_value = problem.evaluate_objective(&values);

    trace!(
        component = "solver",
        operation = "extract_solution",
        status = "success",
        objective_value,
        native_objective_value,
        "Copied optimal solution"
    );
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        result = status.as_str(),
        objective_value,
        solve_time_seconds,
        "Search finished"
    );

    Ok(Solution::optimal(
        values,
        objective_value,
        native_objective_value,
        solve_time_seconds,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_handle_has_no_solution() {
        let solver = Solver::new();
        assert_eq!(solver.status(), None);
        assert_eq!(solver.objective_value(), 0.0);
        assert_eq!(
            solver.solution(),
            Err(SolverError::NoSolutionAvailable { status: None })
        );
        assert_eq!(solver.problem().sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn test_solve_without_variables_is_rejected() {
        let mut solver = Solver::new();
        assert_eq!(solver.solve(), Err(SolverError::EmptyModel));
        assert_eq!(solver.status(), None);
    }

    #[test]
    fn test_set_log_level_keeps_other_config() {
        let mut solver = Solver::with_config(SolverConfig::new());
        solver.set_log_level(0);
        assert_eq!(solver.config().log_level, Some(0));
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| -> u32 { panic!("native failure") }).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "native failure");

        let payload = panic::catch_unwind(|| -> u32 { panic!("code {}", 7) }).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "code 7");
    }

    #[test]
    fn test_invalid_argument_propagates() {
        let mut solver = Solver::new();
        solver.set_objective(&[1.0, 2.0]).expect("objective accepted");
        let err = solver
            .add_constraint(&[0, 2], &[1.0, 1.0], f64::NEG_INFINITY, 1.0)
            .unwrap_err();
        assert_eq!(err.code(), "VARIABLE_INVALID_INDEX");
        assert_eq!(solver.num_constraints(), 0);
    }
}
