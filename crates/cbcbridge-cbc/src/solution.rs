//! Cached outcome of one solve.

use cbcbridge_core::{SolutionStatus, SolverError};

/// Outcome of a branch-and-bound search, owned by the solver handle.
///
/// Column values are only retained for optimal results.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Primal values indexed by variable position (empty unless optimal)
    pub(crate) values: Vec<f64>,
    /// Objective value in the problem's own sense
    pub(crate) objective_value: f64,
    /// Objective value as reported by CBC
    pub(crate) native_objective_value: f64,
    pub(crate) status: SolutionStatus,
    pub(crate) solve_time_seconds: f64,
}

impl Solution {
    pub(crate) fn optimal(
        values: Vec<f64>,
        objective_value: f64,
        native_objective_value: f64,
        solve_time_seconds: f64,
    ) -> Self {
        Solution {
            values,
            objective_value,
            native_objective_value,
            status: SolutionStatus::Optimal,
            solve_time_seconds,
        }
    }

    pub(crate) fn without_values(status: SolutionStatus, solve_time_seconds: f64) -> Self {
        Solution {
            values: Vec::new(),
            objective_value: 0.0,
            native_objective_value: 0.0,
            status,
            solve_time_seconds,
        }
    }

    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Objective value, `0.0` unless optimal.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Objective value exactly as CBC reported it (sign convention is CBC's).
    pub fn native_objective_value(&self) -> f64 {
        self.native_objective_value
    }

    /// Get solve time in seconds
    pub fn solve_time_seconds(&self) -> f64 {
        self.solve_time_seconds
    }

    /// All primal values.
    ///
    /// # Errors
    ///
    /// Returns `NoSolutionAvailable` unless the search proved optimality.
    pub fn values(&self) -> Result<&[f64], SolverError> {
        if self.is_optimal() {
            Ok(&self.values)
        } else {
            Err(SolverError::NoSolutionAvailable {
                status: Some(self.status),
            })
        }
    }

    /// Get the primal value of a variable at the given index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values().ok()?.get(index).copied()
    }

    /// Copy up to `buffer.len()` values and return how many were written.
    pub fn copy_into(&self, buffer: &mut [f64]) -> Result<usize, SolverError> {
        let values = self.values()?;
        let count = buffer.len().min(values.len());
        buffer[..count].copy_from_slice(&values[..count]);
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_solution_accessors() {
        let solution = Solution::optimal(vec![33.0, 67.0, 0.0], 732.0, -732.0, 0.01);
        assert!(solution.is_optimal());
        assert_eq!(solution.objective_value(), 732.0);
        assert_eq!(solution.native_objective_value(), -732.0);
        assert_eq!(solution.get(1), Some(67.0));
        assert_eq!(solution.get(3), None);
        assert_eq!(solution.values().map(<[f64]>::len), Ok(3));
    }

    #[test]
    fn test_copy_into_truncates_to_capacity() {
        let solution = Solution::optimal(vec![1.0, 2.0, 3.0], 6.0, 6.0, 0.0);

        let mut small = [0.0; 2];
        assert_eq!(solution.copy_into(&mut small), Ok(2));
        assert_eq!(small, [1.0, 2.0]);

        let mut large = [-1.0; 5];
        assert_eq!(solution.copy_into(&mut large), Ok(3));
        assert_eq!(large, [1.0, 2.0, 3.0, -1.0, -1.0]);
    }

    #[test]
    fn test_infeasible_solution_hides_values() {
        let solution = Solution::without_values(SolutionStatus::Infeasible, 0.0);
        assert_eq!(solution.objective_value(), 0.0);
        assert_eq!(solution.get(0), None);
        assert_eq!(
            solution.copy_into(&mut [0.0; 3]),
            Err(SolverError::NoSolutionAvailable {
                status: Some(SolutionStatus::Infeasible)
            })
        );
    }
}
