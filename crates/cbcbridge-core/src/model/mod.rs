//! Problem assembly.
//!
//! [`Problem`] is the configured state a solver handle accumulates between
//! solves: dense objective, per-variable bounds and integrality, and sparse
//! rows. Every mutation validates first so a rejected call leaves the problem
//! untouched.

mod error;

use crate::types::{Bounds, ObjectiveSense, SparseRow, Variable};
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

pub use error::ModelError;

/// Objective, variables and constraint rows of one mixed-integer program.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    sense: ObjectiveSense,
    objective: Vec<f64>,
    variables: Vec<Variable>,
    rows: Vec<SparseRow>,
}

impl Problem {
    /// Create an empty problem with the given objective sense.
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            sense,
            ..Self::default()
        }
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        debug!(
            component = "model",
            operation = "set_sense",
            status = "success",
            sense = sense.as_str(),
            "Setting objective sense"
        );
        self.sense = sense;
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rows.len()
    }

    /// Total number of non-zero row coefficients.
    pub fn num_coefficients(&self) -> usize {
        self.rows.iter().map(SparseRow::len).sum()
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    pub fn variable(&self, index: usize) -> Result<&Variable, ModelError> {
        self.variables
            .get(index)
            .ok_or(ModelError::VariableIndexOutOfBounds {
                index,
                num_variables: self.variables.len(),
            })
    }

    /// Overwrite objective coefficients `0..coefficients.len()`.
    ///
    /// Declares any variables not yet present with default bounds
    /// `[0, +inf)` and continuous type. Coefficients past the slice are kept.
    pub fn set_objective(&mut self, coefficients: &[f64]) -> Result<(), ModelError> {
        if coefficients.is_empty() {
            warn!(
                component = "model",
                operation = "set_objective",
                status = "error",
                "Objective coefficients are empty"
            );
            return Err(ModelError::EmptyCoefficients);
        }

        if coefficients.len() > self.variables.len() {
            let declared = coefficients.len() - self.variables.len();
            self.variables.resize(coefficients.len(), Variable::default());
            self.objective.resize(coefficients.len(), 0.0);
            trace!(
                component = "model",
                operation = "declare_variables",
                status = "success",
                declared,
                num_variables = self.variables.len(),
                "Declared variables from objective"
            );
        }
        self.objective[..coefficients.len()].copy_from_slice(coefficients);

        debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            num_coefficients = coefficients.len(),
            "Objective coefficients updated"
        );
        Ok(())
    }

    /// Append one sparse row and return its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrays are empty or differ in length, or if an
    /// index is undeclared or repeated.
    pub fn add_constraint(
        &mut self,
        indices: &[usize],
        values: &[f64],
        bounds: Bounds,
    ) -> Result<usize, ModelError> {
        if let Err(err) = self.validate_row(indices, values) {
            warn!(
                component = "model",
                operation = "add_constraint",
                status = "error",
                code = err.code(),
                "Rejected constraint row: {}",
                err
            );
            return Err(err);
        }

        self.rows.push(SparseRow {
            indices: indices.to_vec(),
            values: values.to_vec(),
            bounds,
        });
        trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            lower = bounds.lower,
            upper = bounds.upper,
            nnz = indices.len(),
            "Added constraint row"
        );
        Ok(self.rows.len() - 1)
    }

    fn validate_row(&self, indices: &[usize], values: &[f64]) -> Result<(), ModelError> {
        if indices.len() != values.len() {
            return Err(ModelError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        if indices.is_empty() {
            return Err(ModelError::EmptyRow);
        }

        let mut seen = BTreeSet::new();
        for &index in indices {
            self.variable(index)?;
            if !seen.insert(index) {
                return Err(ModelError::DuplicateIndex { index });
            }
        }
        Ok(())
    }

    /// Replace the bounds of a variable, keeping its integrality flag.
    pub fn set_variable_bounds(&mut self, index: usize, bounds: Bounds) -> Result<(), ModelError> {
        let num_variables = self.variables.len();
        let Some(var) = self.variables.get_mut(index) else {
            warn!(
                component = "model",
                operation = "set_variable_bounds",
                status = "error",
                index,
                num_variables,
                "Variable index out of bounds"
            );
            return Err(ModelError::VariableIndexOutOfBounds {
                index,
                num_variables,
            });
        };
        var.bounds = bounds;
        trace!(
            component = "model",
            operation = "set_variable_bounds",
            status = "success",
            index,
            lower = bounds.lower,
            upper = bounds.upper,
            "Updated variable bounds"
        );
        Ok(())
    }

    /// Mark a variable integral, keeping its bounds.
    pub fn set_variable_integer(&mut self, index: usize) -> Result<(), ModelError> {
        let num_variables = self.variables.len();
        let Some(var) = self.variables.get_mut(index) else {
            warn!(
                component = "model",
                operation = "set_variable_integer",
                status = "error",
                index,
                num_variables,
                "Variable index out of bounds"
            );
            return Err(ModelError::VariableIndexOutOfBounds {
                index,
                num_variables,
            });
        };
        var.is_integer = true;
        trace!(
            component = "model",
            operation = "set_variable_integer",
            status = "success",
            index,
            "Marked variable integer"
        );
        Ok(())
    }

    /// Check a dense assignment against bounds, integrality and rows.
    ///
    /// `tolerance` is absolute for bounds and integrality and scaled by
    /// `1 + |activity|` for rows.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() < self.variables.len() {
            return false;
        }
        let variables_ok = self.variables.iter().zip(values).all(|(var, &value)| {
            value.is_finite()
                && var.bounds.contains(value, tolerance)
                && (!var.is_integer || (value - value.round()).abs() <= tolerance)
        });
        if !variables_ok {
            return false;
        }
        self.rows.iter().enumerate().all(|(index, row)| {
            let activity = row.activity(values);
            let ok = row
                .bounds
                .contains(activity, tolerance * (1.0 + activity.abs()));
            if !ok {
                trace!(
                    component = "model",
                    operation = "check_feasibility",
                    status = "violated",
                    row = index,
                    activity,
                    lower = row.bounds.lower,
                    upper = row.bounds.upper,
                    "Row violated by assignment"
                );
            }
            ok
        })
    }

    /// Evaluate the objective for a dense assignment.
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(value: f64) -> Bounds {
        Bounds::new(f64::NEG_INFINITY, value)
    }

    fn three_variable_problem() -> Problem {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem
            .set_objective(&[10.0, 6.0, 4.0])
            .expect("objective should be accepted");
        problem
    }

    #[test]
    fn test_set_objective_declares_variables() {
        let problem = three_variable_problem();
        assert_eq!(problem.num_variables(), 3);
        assert_eq!(problem.objective(), &[10.0, 6.0, 4.0]);
        assert!(problem.variables().iter().all(|v| *v == Variable::default()));
    }

    #[test]
    fn test_set_objective_overwrites_prefix_only() {
        let mut problem = three_variable_problem();
        problem.set_objective(&[1.0]).expect("objective accepted");
        assert_eq!(problem.num_variables(), 3);
        assert_eq!(problem.objective(), &[1.0, 6.0, 4.0]);
    }

    #[test]
    fn test_empty_objective_rejected() {
        let mut problem = Problem::default();
        assert_eq!(
            problem.set_objective(&[]),
            Err(ModelError::EmptyCoefficients)
        );
        assert_eq!(problem.num_variables(), 0);
    }

    #[test]
    fn test_add_constraint_returns_row_index() {
        let mut problem = three_variable_problem();
        let first = problem
            .add_constraint(&[0, 1, 2], &[1.0, 1.0, 1.0], upper(100.0))
            .expect("row accepted");
        let second = problem
            .add_constraint(&[2, 0], &[6.0, 2.0], upper(300.0))
            .expect("row accepted");
        assert_eq!((first, second), (0, 1));
        assert_eq!(problem.num_constraints(), 2);
        assert_eq!(problem.num_coefficients(), 5);
        assert_eq!(problem.rows()[1].indices, vec![2, 0]);
    }

    #[test]
    fn test_rejected_rows_do_not_mutate() {
        let mut problem = three_variable_problem();

        assert_eq!(
            problem.add_constraint(&[0, 1], &[1.0], upper(1.0)),
            Err(ModelError::LengthMismatch {
                indices: 2,
                values: 1
            })
        );
        assert_eq!(
            problem.add_constraint(&[], &[], upper(1.0)),
            Err(ModelError::EmptyRow)
        );
        assert_eq!(
            problem.add_constraint(&[0, 3], &[1.0, 1.0], upper(1.0)),
            Err(ModelError::VariableIndexOutOfBounds {
                index: 3,
                num_variables: 3
            })
        );
        assert_eq!(
            problem.add_constraint(&[1, 1], &[1.0, 1.0], upper(1.0)),
            Err(ModelError::DuplicateIndex { index: 1 })
        );
        assert_eq!(problem.num_constraints(), 0);
    }

    #[test]
    fn test_bounds_and_integrality_are_independent() {
        let mut problem = three_variable_problem();
        problem.set_variable_integer(1).expect("index valid");
        problem
            .set_variable_bounds(1, Bounds::new(2.0, 5.0))
            .expect("index valid");
        assert_eq!(
            *problem.variable(1).expect("declared"),
            Variable::integer(Bounds::new(2.0, 5.0))
        );

        problem
            .set_variable_bounds(2, Bounds::new(-1.0, 1.0))
            .expect("index valid");
        problem.set_variable_integer(2).expect("index valid");
        assert_eq!(
            *problem.variable(2).expect("declared"),
            Variable::integer(Bounds::new(-1.0, 1.0))
        );
    }

    #[test]
    fn test_variable_setters_reject_undeclared_index() {
        let mut problem = three_variable_problem();
        assert!(problem.set_variable_integer(3).is_err());
        assert!(
            problem
                .set_variable_bounds(5, Bounds::non_negative())
                .is_err()
        );
        assert!(problem.variables().iter().all(|v| !v.is_integer));
    }

    #[test]
    fn test_feasibility_check() {
        let mut problem = three_variable_problem();
        problem
            .add_constraint(&[0, 1, 2], &[1.0, 1.0, 1.0], upper(100.0))
            .expect("row accepted");
        problem.set_variable_integer(0).expect("index valid");

        assert!(problem.is_feasible(&[33.0, 67.0, 0.0], 1e-6));
        // row violated
        assert!(!problem.is_feasible(&[50.0, 67.0, 0.0], 1e-6));
        // fractional integer
        assert!(!problem.is_feasible(&[33.5, 60.0, 0.0], 1e-6));
        // below the default lower bound
        assert!(!problem.is_feasible(&[33.0, -1.0, 0.0], 1e-6));
        assert!(!problem.is_feasible(&[33.0, 67.0], 1e-6));
        assert!(!problem.is_feasible(&[f64::NAN, 0.0, 0.0], 1e-6));
    }

    #[test]
    fn test_evaluate_objective() {
        let problem = three_variable_problem();
        let value = problem.evaluate_objective(&[33.0, 67.0, 0.0]);
        assert!((value - 732.0).abs() < 1e-9);
    }
}
