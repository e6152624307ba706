//! Bindings to the CBC solver library through `coin_cbc`.

use crate::status::classify;
use cbcbridge_core::{ObjectiveSense, SolutionStatus};
use coin_cbc::{Col, Model, Sense};
use std::fmt;
use tracing::{debug, trace, warn};

/// Errors returned by the CBC model wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum CbcModelError {
    ColumnIndexOutOfBounds {
        column_index: usize,
        num_columns: usize,
    },
    SolveRequired {
        operation: &'static str,
    },
}

impl fmt::Display for CbcModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CbcModelError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "column index {} out of bounds (num_columns = {})",
                column_index, num_columns
            ),
            CbcModelError::SolveRequired { operation } => {
                write!(f, "solve must be called before {}", operation)
            }
        }
    }
}

impl std::error::Error for CbcModelError {}

/// Safe wrapper around one CBC model and its branch-and-bound outcome.
pub struct CbcModel {
    model: Model,
    columns: Vec<Col>,
    num_rows: usize,
    objective_sense: ObjectiveSense,
    solved: Option<coin_cbc::Solution>,
}

impl CbcModel {
    /// Create a new, empty minimization model.
    pub fn new() -> Self {
        debug!(
            component = "solver",
            operation = "init_cbc",
            status = "success",
            "Creating new CBC model"
        );
        let mut model = Model::default();
        model.set_obj_sense(Sense::Minimize);
        CbcModel {
            model,
            columns: Vec::new(),
            num_rows: 0,
            objective_sense: ObjectiveSense::Minimize,
            solved: None,
        }
    }

    /// Add a continuous column and return its index.
    pub fn add_col(&mut self, lower_bound: f64, upper_bound: f64, objective_coefficient: f64) -> usize {
        self.add_col_with_integrality(lower_bound, upper_bound, objective_coefficient, false)
    }

    /// Add an integer column and return its index.
    pub fn add_integer_col(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        objective_coefficient: f64,
    ) -> usize {
        self.add_col_with_integrality(lower_bound, upper_bound, objective_coefficient, true)
    }

    fn add_col_with_integrality(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        objective_coefficient: f64,
        is_integer: bool,
    ) -> usize {
        trace!(
            lower_bound,
            upper_bound,
            objective_coefficient,
            is_integer,
            component = "solver",
            operation = "add_column",
            status = "success",
            "Adding column"
        );
        self.solved = None;
        let col = if is_integer {
            self.model.add_integer()
        } else {
            self.model.add_col()
        };
        self.model.set_col_lower(col, lower_bound);
        self.model.set_col_upper(col, upper_bound);
        self.model.set_obj_coeff(col, objective_coefficient);
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Add a linear row `lower_bound <= sum(coeff * x) <= upper_bound` from
    /// `(column index, coefficient)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any column index is out of bounds. Nothing is
    /// added on error.
    pub fn add_row(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        entries: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<usize, CbcModelError> {
        let num_columns = self.columns.len();
        let mut factors = Vec::new();
        for (col_idx, coeff) in entries {
            let col = *self.columns.get(col_idx).ok_or_else(|| {
                warn!(
                    component = "solver",
                    operation = "add_row",
                    status = "error",
                    col_idx,
                    num_columns,
                    "Column index out of bounds for constraint"
                );
                CbcModelError::ColumnIndexOutOfBounds {
                    column_index: col_idx,
                    num_columns,
                }
            })?;
            factors.push((col, coeff));
        }

        trace!(
            lower_bound,
            upper_bound,
            nnz = factors.len(),
            component = "solver",
            operation = "add_row",
            status = "success",
            "Adding row"
        );
        self.solved = None;
        let row = self.model.add_row();
        self.model.set_row_lower(row, lower_bound);
        self.model.set_row_upper(row, upper_bound);
        for (col, coeff) in factors {
            self.model.set_weight(row, col, coeff);
        }
        self.num_rows += 1;
        Ok(self.num_rows - 1)
    }

    /// Set the objective sense
    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) {
        debug!(
            component = "solver",
            operation = "set_objective_sense",
            status = "success",
            ?sense,
            "Setting objective sense"
        );
        self.objective_sense = sense;
        self.model.set_obj_sense(match sense {
            ObjectiveSense::Minimize => Sense::Minimize,
            ObjectiveSense::Maximize => Sense::Maximize,
        });
    }

    /// Set the CBC console log level for the next solve.
    pub fn set_log_level(&mut self, level: u32) {
        let level = level.to_string();
        self.model.set_parameter("logLevel", &level);
        self.model.set_parameter("slogLevel", &level);
    }

    /// Run branch-and-bound to completion.
    ///
    /// Any previous outcome is dropped before the search starts.
    pub fn solve(&mut self) -> SolutionStatus {
        debug!(
            num_cols = self.columns.len(),
            num_rows = self.num_rows,
            ?self.objective_sense,
            component = "solver",
            operation = "solve",
            status = "success",
            "Solving model"
        );
        self.solved = None;

        let solution = self.model.solve();
        let status = classify(solution.raw());

        trace!(
            component = "solver",
            operation = "solve",
            status = "success",
            ?status,
            native_status = ?solution.raw().status(),
            "Solution status received"
        );
        self.solved = Some(solution);
        status
    }

    /// Get the number of columns (variables)
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (constraints)
    pub fn rows(&self) -> usize {
        self.num_rows
    }

    /// Objective value as reported by CBC for the latest solve.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been solved yet.
    pub fn objective_value(&self) -> Result<f64, CbcModelError> {
        let solved = self.solved.as_ref().ok_or(CbcModelError::SolveRequired {
            operation: "objective_value",
        })?;
        Ok(solved.raw().obj_value())
    }

    /// Whether CBC proved the latest solution optimal.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been solved yet.
    pub fn is_proven_optimal(&self) -> Result<bool, CbcModelError> {
        let solved = self.solved.as_ref().ok_or(CbcModelError::SolveRequired {
            operation: "is_proven_optimal",
        })?;
        Ok(solved.raw().is_proven_optimal())
    }

    /// Column values of the latest solve.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been solved yet.
    pub fn col_values(&self) -> Result<&[f64], CbcModelError> {
        let solved = self.solved.as_ref().ok_or(CbcModelError::SolveRequired {
            operation: "col_values",
        })?;
        Ok(solved.raw().col_solution())
    }
}

impl Default for CbcModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CbcModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CbcModel")
            .field("num_variables", &self.columns.len())
            .field("num_constraints", &self.num_rows)
            .field("objective_sense", &self.objective_sense)
            .field("solved", &self.solved.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::ffi::{CbcModel, CbcModelError};
    use cbcbridge_core::ObjectiveSense;

    #[test]
    fn test_create_model() {
        let model = CbcModel::new();
        assert_eq!(model.columns(), 0);
        assert_eq!(model.rows(), 0);
        assert_eq!(model.objective_sense, ObjectiveSense::Minimize);
    }

    #[test]
    fn test_objective_sense() {
        let mut model = CbcModel::new();
        model.set_objective_sense(ObjectiveSense::Maximize);
        assert_eq!(model.objective_sense, ObjectiveSense::Maximize);
    }

    #[test]
    fn test_add_row_rejects_unknown_column() {
        let mut model = CbcModel::new();
        let x = model.add_col(0.0, 1.0, 1.0);
        assert_eq!(
            model.add_row(f64::NEG_INFINITY, 1.0, [(x, 1.0), (4, 1.0)]),
            Err(CbcModelError::ColumnIndexOutOfBounds {
                column_index: 4,
                num_columns: 1
            })
        );
        assert_eq!(model.rows(), 0);
    }

    #[test]
    fn test_queries_require_solve() {
        let model = CbcModel::new();
        assert!(matches!(
            model.objective_value(),
            Err(CbcModelError::SolveRequired { .. })
        ));
        assert!(model.col_values().is_err());
        assert!(model.is_proven_optimal().is_err());
    }
}
