/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveSense {
    Minimize,
    #[default]
    Maximize,
}

impl ObjectiveSense {
    /// Map an OSI-style sense value (`-1` maximize, `1` minimize).
    pub fn from_osi(value: i32) -> Option<Self> {
        match value {
            -1 => Some(ObjectiveSense::Maximize),
            1 => Some(ObjectiveSense::Minimize),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectiveSense::Minimize => "minimize",
            ObjectiveSense::Maximize => "maximize",
        }
    }
}

/// Bounds for a variable or constraint row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `[0, +inf)`, the default for a freshly declared variable.
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// Whether `value` lies within the bounds, widened by `tolerance`.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }
}

/// A decision variable with bounds and integrality flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub bounds: Bounds,
    pub is_integer: bool,
}

impl Variable {
    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            bounds,
            is_integer: false,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            bounds,
            is_integer: true,
        }
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::continuous(Bounds::non_negative())
    }
}

/// One linear constraint `lower <= sum(coeff * x) <= upper` in sparse form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
    pub bounds: Bounds,
}

impl SparseRow {
    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(variable index, coefficient)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Evaluate the row activity for a dense assignment.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.entries()
            .map(|(index, coeff)| coeff * values.get(index).copied().unwrap_or(0.0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_variable_is_non_negative_continuous() {
        let var = Variable::default();
        assert_eq!(var.bounds, Bounds::new(0.0, f64::INFINITY));
        assert!(!var.is_integer);
    }

    #[test]
    fn test_sense_from_osi() {
        assert_eq!(ObjectiveSense::from_osi(-1), Some(ObjectiveSense::Maximize));
        assert_eq!(ObjectiveSense::from_osi(1), Some(ObjectiveSense::Minimize));
        assert_eq!(ObjectiveSense::from_osi(0), None);
        assert_eq!(ObjectiveSense::default(), ObjectiveSense::Maximize);
    }

    #[test]
    fn test_row_activity() {
        let row = SparseRow {
            indices: vec![0, 2],
            values: vec![2.0, -1.0],
            bounds: Bounds::new(f64::NEG_INFINITY, 10.0),
        };
        assert_eq!(row.len(), 2);
        assert!((row.activity(&[3.0, 100.0, 1.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_contains_with_tolerance() {
        let bounds = Bounds::new(0.0, 1.0);
        assert!(bounds.contains(1.0 + 1e-9, 1e-6));
        assert!(!bounds.contains(1.1, 1e-6));
        assert!(!bounds.contains(-0.5, 1e-6));
        assert!(Bounds::non_negative().contains(1e300, 1e-6));
        assert!(Bounds::new(f64::NEG_INFINITY, 3.0).contains(-1e300, 1e-6));
    }
}
