//! Solver handle entry points.
//!
//! Every function takes the handle returned by [`CBC_CreateSolver`] as its
//! first argument. The handle is a `Box<Solver>` whose ownership moves to the
//! caller on create and back to Rust on [`CBC_FreeSolver`].

#![allow(non_snake_case)]

use crate::error::{CBC_ERROR, CBC_OK, FfiError, guard, to_c_int, to_count, to_index};
use cbcbridge_cbc::{ObjectiveSense, SolutionStatus, Solver, SolverConfig};
use libc::{c_char, c_double, c_int};
use std::ffi::CStr;
use std::{ptr, slice};
use tracing::debug;

/// Status code returned when the handle is null or has not been solved.
pub const CBC_STATUS_NONE: c_int = -1;

unsafe fn solver_mut<'a>(handle: *mut Solver) -> Result<&'a mut Solver, FfiError> {
    unsafe { handle.as_mut() }.ok_or(FfiError::NullHandle)
}

unsafe fn solver_ref<'a>(handle: *const Solver) -> Result<&'a Solver, FfiError> {
    unsafe { handle.as_ref() }.ok_or(FfiError::NullHandle)
}

unsafe fn array<'a, T>(
    data: *const T,
    len: usize,
    argument: &'static str,
) -> Result<&'a [T], FfiError> {
    if data.is_null() {
        return Err(FfiError::NullArgument(argument));
    }
    Ok(unsafe { slice::from_raw_parts(data, len) })
}

fn status_label(status: Option<SolutionStatus>) -> &'static CStr {
    match status {
        None => c"not_solved",
        Some(SolutionStatus::Optimal) => c"optimal",
        Some(SolutionStatus::Infeasible) => c"infeasible",
        Some(SolutionStatus::Unbounded) => c"unbounded",
        Some(SolutionStatus::Stopped) => c"stopped",
        Some(SolutionStatus::Abandoned) => c"abandoned",
        Some(SolutionStatus::Unknown) => c"unknown",
    }
}

/// Allocates a new solver handle with a maximization objective.
///
/// The CBC console log level starts from `CBC_BRIDGE_SOLVER_LOG_LEVEL` when
/// that variable is set. Returns null if allocation fails.
///
/// The returned handle must be released with [`CBC_FreeSolver`].
#[unsafe(no_mangle)]
pub extern "C" fn CBC_CreateSolver() -> *mut Solver {
    guard("create_solver", ptr::null_mut(), || {
        let handle = Box::into_raw(Box::new(Solver::with_config(SolverConfig::from_env())));
        debug!(component = "ffi", operation = "create_solver", "Created solver handle");
        Ok(handle)
    })
}

/// Releases a solver handle and everything it owns.
///
/// Passing null is a no-op.
///
/// # Safety
///
/// `handle` must be null or a pointer returned by [`CBC_CreateSolver`] that
/// has not been freed yet. It must not be used after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_FreeSolver(handle: *mut Solver) {
    if handle.is_null() {
        return;
    }
    guard("free_solver", (), || {
        drop(unsafe { Box::from_raw(handle) });
        debug!(component = "ffi", operation = "free_solver", "Freed solver handle");
        Ok(())
    })
}

/// Overwrites the objective coefficients of variables `0..num_vars`.
///
/// Declares variables up to `num_vars` if the problem has fewer. Returns `0`
/// on success and `-1` otherwise.
///
/// # Safety
///
/// `handle` must be a live solver handle and `coefficients` must point to at
/// least `num_vars` readable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_SetObjective(
    handle: *mut Solver,
    num_vars: c_int,
    coefficients: *const c_double,
) -> c_int {
    guard("set_objective", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        let len = to_count(num_vars)?;
        let coefficients = unsafe { array(coefficients, len, "coefficients") }?;
        solver.set_objective(coefficients)?;
        Ok(CBC_OK)
    })
}

/// Appends the row `lb <= sum(values[k] * x[indices[k]]) <= ub`.
///
/// Every index must refer to a declared variable and appear at most once.
/// A rejected row leaves the problem unchanged. Returns `0` on success and
/// `-1` otherwise.
///
/// # Safety
///
/// `handle` must be a live solver handle. `indices` and `values` must each
/// point to at least `num_vars` readable elements.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_AddConstraint(
    handle: *mut Solver,
    num_vars: c_int,
    indices: *const c_int,
    values: *const c_double,
    lb: c_double,
    ub: c_double,
) -> c_int {
    guard("add_constraint", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        let len = to_count(num_vars)?;
        let indices = unsafe { array(indices, len, "indices") }?;
        let values = unsafe { array(values, len, "values") }?;
        let indices = indices
            .iter()
            .map(|&index| to_index(index))
            .collect::<Result<Vec<_>, _>>()?;
        solver.add_constraint(&indices, values, lb, ub)?;
        Ok(CBC_OK)
    })
}

/// Sets the lower and upper bound of one variable.
///
/// The integrality flag is left untouched.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_SetVariableBounds(
    handle: *mut Solver,
    index: c_int,
    lb: c_double,
    ub: c_double,
) -> c_int {
    guard("set_variable_bounds", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        solver.set_variable_bounds(to_index(index)?, lb, ub)?;
        Ok(CBC_OK)
    })
}

/// Marks one variable as integral. Bounds are left untouched.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_SetVariableInteger(handle: *mut Solver, index: c_int) -> c_int {
    guard("set_variable_integer", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        solver.set_variable_integer(to_index(index)?)?;
        Ok(CBC_OK)
    })
}

/// Sets the optimization direction: `-1` maximizes, `1` minimizes.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_SetObjectiveSense(handle: *mut Solver, sense: c_int) -> c_int {
    guard("set_objective_sense", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        let sense = ObjectiveSense::from_osi(sense).ok_or(FfiError::InvalidSense(sense))?;
        solver.set_objective_sense(sense);
        Ok(CBC_OK)
    })
}

/// Sets the CBC console log level used by the next solve. `0` is silent.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_SetLogLevel(handle: *mut Solver, level: c_int) -> c_int {
    guard("set_log_level", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        let level = u32::try_from(level).map_err(|_| FfiError::InvalidLogLevel(level))?;
        solver.set_log_level(level);
        Ok(CBC_OK)
    })
}

/// Solves the current problem and caches the outcome on the handle.
///
/// Returns `0` when the search ran to a classified status (query it with
/// [`CBC_GetSolutionStatus`]) and `-1` when the native solve failed. The
/// previous outcome is discarded in every case.
///
/// A handle with no declared variables also returns `-1` and never reaches
/// CBC. Hosts that treat `-1` as a native failure should call
/// [`CBC_SetObjective`] before the first solve.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_Solve(handle: *mut Solver) -> c_int {
    guard("solve", CBC_ERROR, || {
        let solver = unsafe { solver_mut(handle) }?;
        solver.solve()?;
        Ok(CBC_OK)
    })
}

/// Returns `0` (optimal), `1` (infeasible), `2` (any other outcome), or `-1`
/// for a null handle or a handle that has not been solved.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_GetSolutionStatus(handle: *const Solver) -> c_int {
    guard("get_solution_status", CBC_STATUS_NONE, || {
        let solver = unsafe { solver_ref(handle) }?;
        Ok(solver
            .status()
            .map_or(CBC_STATUS_NONE, SolutionStatus::code))
    })
}

/// Returns a static label for the last outcome.
///
/// The string is owned by the library and must not be freed.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_GetStatusString(handle: *const Solver) -> *const c_char {
    guard("get_status_string", c"invalid_handle".as_ptr(), || {
        let solver = unsafe { solver_ref(handle) }?;
        Ok(status_label(solver.status()).as_ptr())
    })
}

/// Returns the objective value of the cached optimal solution, or `0.0`.
///
/// The value is reported in the problem's own direction, so a maximization
/// returns its maximum.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_GetObjectiveValue(handle: *const Solver) -> c_double {
    guard("get_objective_value", 0.0, || {
        let solver = unsafe { solver_ref(handle) }?;
        Ok(solver.objective_value())
    })
}

/// Copies up to `capacity` solution values into `buffer`.
///
/// Returns the number of values written, or `-1` when there is no cached
/// optimal solution or an argument is invalid.
///
/// # Safety
///
/// `handle` must be null or a live solver handle. `buffer` must point to at
/// least `capacity` writable doubles that do not alias the handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_GetSolution(
    handle: *const Solver,
    buffer: *mut c_double,
    capacity: c_int,
) -> c_int {
    guard("get_solution", CBC_ERROR, || {
        let solver = unsafe { solver_ref(handle) }?;
        let capacity = to_count(capacity)?;
        if buffer.is_null() {
            return Err(FfiError::NullArgument("buffer"));
        }
        let buffer = unsafe { slice::from_raw_parts_mut(buffer, capacity) };
        let written = solver.copy_solution(buffer)?;
        Ok(to_c_int(written))
    })
}

/// Returns the number of declared variables, or `-1` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_GetNumVariables(handle: *const Solver) -> c_int {
    guard("get_num_variables", CBC_ERROR, || {
        let solver = unsafe { solver_ref(handle) }?;
        Ok(to_c_int(solver.num_variables()))
    })
}

/// Returns the number of rows added so far, or `-1` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live solver handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CBC_GetNumConstraints(handle: *const Solver) -> c_int {
    guard("get_num_constraints", CBC_ERROR, || {
        let solver = unsafe { solver_ref(handle) }?;
        Ok(to_c_int(solver.num_constraints()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(None), c"not_solved");
        assert_eq!(status_label(Some(SolutionStatus::Optimal)), c"optimal");
        assert_eq!(status_label(Some(SolutionStatus::Stopped)), c"stopped");
        assert_eq!(status_label(Some(SolutionStatus::Unknown)), c"unknown");
    }

    #[test]
    fn test_array_rejects_null() {
        let result = unsafe { array::<f64>(ptr::null(), 3, "values") };
        assert_eq!(result, Err(FfiError::NullArgument("values")));
    }

    #[test]
    fn test_create_and_free() {
        let handle = CBC_CreateSolver();
        assert!(!handle.is_null());
        unsafe {
            assert_eq!(CBC_GetNumVariables(handle), 0);
            CBC_FreeSolver(handle);
        }
    }
}
