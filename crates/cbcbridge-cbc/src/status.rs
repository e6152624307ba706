//! Status classification for CBC results.

use cbcbridge_core::SolutionStatus;
use coin_cbc::raw::{Model as RawModel, Status};

/// Native termination flags read from a solved CBC model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NativeFlags {
    pub proven_optimal: bool,
    pub proven_infeasible: bool,
    pub continuous_unbounded: bool,
    pub termination: Termination,
}

/// CBC's primary status collapsed to what the bridge distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Termination {
    /// Search ran to completion, or the pure-LP path never launched branch-and-bound.
    Completed,
    Stopped,
    Abandoned,
}

pub(crate) fn classify(raw: &RawModel) -> SolutionStatus {
    let termination = match raw.status() {
        Status::Finished | Status::Unlaunched => Termination::Completed,
        Status::Stopped | Status::UserEvent => Termination::Stopped,
        Status::Abandoned => Termination::Abandoned,
    };
    classify_flags(NativeFlags {
        proven_optimal: raw.is_proven_optimal(),
        proven_infeasible: raw.is_proven_infeasible(),
        continuous_unbounded: raw.is_continuous_unbounded(),
        termination,
    })
}

pub(crate) fn classify_flags(flags: NativeFlags) -> SolutionStatus {
    if flags.proven_infeasible {
        return SolutionStatus::Infeasible;
    }
    if flags.continuous_unbounded {
        return SolutionStatus::Unbounded;
    }
    if flags.proven_optimal {
        return SolutionStatus::Optimal;
    }
    match flags.termination {
        Termination::Completed => SolutionStatus::Optimal,
        Termination::Stopped => SolutionStatus::Stopped,
        Termination::Abandoned => SolutionStatus::Abandoned,
    }
}
