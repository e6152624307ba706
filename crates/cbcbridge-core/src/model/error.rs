//! Model error types.

/// Errors that can occur while assembling a problem
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Objective coefficient array is empty
    EmptyCoefficients,
    /// Constraint row has no entries
    EmptyRow,
    /// Index and value arrays differ in length
    LengthMismatch { indices: usize, values: usize },
    /// Variable index is not declared
    VariableIndexOutOfBounds { index: usize, num_variables: usize },
    /// Variable index appears twice in one row
    DuplicateIndex { index: usize },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::EmptyCoefficients => "OBJECTIVE_EMPTY",
            ModelError::EmptyRow => "CONSTRAINT_EMPTY",
            ModelError::LengthMismatch { .. } => "CONSTRAINT_LENGTH_MISMATCH",
            ModelError::VariableIndexOutOfBounds { .. } => "VARIABLE_INVALID_INDEX",
            ModelError::DuplicateIndex { .. } => "CONSTRAINT_DUPLICATE_INDEX",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyCoefficients => {
                write!(f, "[{}] Objective needs at least one coefficient", self.code())
            }
            ModelError::EmptyRow => write!(f, "[{}] Constraint row has no entries", self.code()),
            ModelError::LengthMismatch { indices, values } => write!(
                f,
                "[{}] indices length ({}) must match values length ({})",
                self.code(),
                indices,
                values
            ),
            ModelError::VariableIndexOutOfBounds {
                index,
                num_variables,
            } => write!(
                f,
                "[{}] Variable index {} out of bounds (num_variables = {})",
                self.code(),
                index,
                num_variables
            ),
            ModelError::DuplicateIndex { index } => write!(
                f,
                "[{}] Variable index {} appears more than once in the row",
                self.code(),
                index
            ),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_out_of_bounds() {
        let err = ModelError::VariableIndexOutOfBounds {
            index: 7,
            num_variables: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("VARIABLE_INVALID_INDEX"));
        assert!(msg.contains('7'));
        assert!(msg.contains("num_variables = 3"));
    }

    #[test]
    fn test_error_display_length_mismatch() {
        let err = ModelError::LengthMismatch {
            indices: 2,
            values: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("CONSTRAINT_LENGTH_MISMATCH"));
        assert!(msg.contains("(2)"));
        assert!(msg.contains("(3)"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(ModelError::EmptyCoefficients.code(), "OBJECTIVE_EMPTY");
        assert_eq!(ModelError::EmptyRow.code(), "CONSTRAINT_EMPTY");
        assert_eq!(
            ModelError::DuplicateIndex { index: 0 }.code(),
            "CONSTRAINT_DUPLICATE_INDEX"
        );
    }
}
