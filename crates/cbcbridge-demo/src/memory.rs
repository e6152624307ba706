//! Resident memory sampling for repeated create/solve/free loops.

use std::time::Instant;
use sysinfo::System;

/// Resident set size of this process at one point of the run.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    /// Resident set size in bytes
    pub rss_bytes: u64,
    pub timestamp: Instant,
    /// Label of the point in the run (e.g. "before", "after")
    pub stage: String,
}

#[derive(Debug, Clone)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "failed to locate process {}", pid)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

impl MemorySnapshot {
    /// Capture the current resident set size.
    ///
    /// # Errors
    ///
    /// Returns an error if the current process cannot be located.
    pub fn capture(stage: &str) -> Result<Self, MemoryError> {
        let pid = sysinfo::Pid::from_u32(std::process::id());

        let mut sys = System::new();
        sys.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::Some(&[pid]),
            true,
            sysinfo::ProcessRefreshKind::nothing().with_memory(),
        );

        let process = sys.process(pid).ok_or(MemoryError::ProcessNotFound {
            pid: std::process::id(),
        })?;

        Ok(MemorySnapshot {
            rss_bytes: process.memory(),
            timestamp: Instant::now(),
            stage: stage.to_string(),
        })
    }

    /// Growth in bytes from `other` to `self`.
    pub fn diff(&self, other: &Self) -> i64 {
        self.rss_bytes as i64 - other.rss_bytes as i64
    }
}

#[derive(Debug, Default)]
pub struct MemoryProbe {
    snapshots: Vec<MemorySnapshot>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot for `stage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be captured.
    pub fn record(&mut self, stage: &str) -> Result<(), MemoryError> {
        self.snapshots.push(MemorySnapshot::capture(stage)?);
        Ok(())
    }

    pub fn snapshots(&self) -> &[MemorySnapshot] {
        &self.snapshots
    }

    /// Growth between the first and the last snapshot.
    pub fn total_diff(&self) -> Option<i64> {
        match (self.snapshots.first(), self.snapshots.last()) {
            (Some(first), Some(last)) if self.snapshots.len() >= 2 => Some(last.diff(first)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rss_bytes: u64, stage: &str) -> MemorySnapshot {
        MemorySnapshot {
            rss_bytes,
            timestamp: Instant::now(),
            stage: stage.to_string(),
        }
    }

    #[test]
    fn test_capture_current_process() {
        let snapshot = MemorySnapshot::capture("test").unwrap_or_else(|err| panic!("{}", err));
        assert_eq!(snapshot.stage, "test");
        assert!(snapshot.rss_bytes > 0);
    }

    #[test]
    fn test_snapshot_diff() {
        let before = snapshot(1000, "before");
        let after = snapshot(1500, "after");
        assert_eq!(after.diff(&before), 500);
        assert_eq!(before.diff(&after), -500);
    }

    #[test]
    fn test_probe_total_diff() {
        let mut probe = MemoryProbe::new();
        assert_eq!(probe.total_diff(), None);
        probe.snapshots.push(snapshot(1000, "before"));
        assert_eq!(probe.total_diff(), None);
        probe.snapshots.push(snapshot(1200, "middle"));
        probe.snapshots.push(snapshot(900, "after"));
        assert_eq!(probe.total_diff(), Some(-100));
        assert_eq!(probe.snapshots().len(), 3);
    }
}
