//! Solver status types.

/// Classification of a completed branch-and-bound search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Problem proven infeasible.
    Infeasible,
    /// Continuous relaxation is unbounded.
    Unbounded,
    /// Search stopped before proving optimality or infeasibility.
    Stopped,
    /// Search abandoned on numerical difficulties.
    Abandoned,
    /// Search reported completion without a proof, and the returned point
    /// does not satisfy the problem.
    Unknown,
}

impl SolutionStatus {
    /// Code for optimal results at the C boundary.
    pub const CODE_OPTIMAL: i32 = 0;
    /// Code for infeasible results at the C boundary.
    pub const CODE_INFEASIBLE: i32 = 1;
    /// Code for every other termination at the C boundary.
    pub const CODE_OTHER: i32 = 2;

    /// Flatten to the three-way integer classification.
    pub fn code(self) -> i32 {
        match self {
            SolutionStatus::Optimal => Self::CODE_OPTIMAL,
            SolutionStatus::Infeasible => Self::CODE_INFEASIBLE,
            SolutionStatus::Unbounded
            | SolutionStatus::Stopped
            | SolutionStatus::Abandoned
            | SolutionStatus::Unknown => Self::CODE_OTHER,
        }
    }

    pub fn is_optimal(self) -> bool {
        matches!(self, SolutionStatus::Optimal)
    }

    pub fn is_infeasible(self) -> bool {
        matches!(self, SolutionStatus::Infeasible)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::Stopped => "stopped",
            SolutionStatus::Abandoned => "abandoned",
            SolutionStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
