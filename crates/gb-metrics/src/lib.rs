//! Per-worker telemetry capture.
//!
//! [`capture`] wraps a transform call with a wall-clock window and
//! whole-process resident-set snapshots. The memory delta is clamped at
//! zero (a transform may free more than it allocates) and is observational
//! telemetry only: unrelated allocations in the same process show up in
//! the snapshot, so it is never treated as a correctness property.

use std::time::Instant;

use sysinfo::{Pid, System};

/// One worker's telemetry for one run. Built immediately after the
/// transform returns and immutable afterwards. Metrics travel to the
/// coordinator as per-field gather lanes, never as a serialized struct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerMetrics {
    pub elapsed_seconds: f64,
    pub memory_delta_bytes: u64,
    pub cell_count: u64,
}

impl WorkerMetrics {
    /// Neutral metrics for a rank with no rows: it skips the transform but
    /// still contributes zeros to every gather.
    pub fn idle() -> Self {
        Self {
            elapsed_seconds: 0.0,
            memory_delta_bytes: 0,
            cell_count: 0,
        }
    }
}

/// Whole-process resident-set probe.
///
/// Returns `None` from [`MemoryProbe::new`] when the current process
/// cannot be inspected; callers fall back to zero readings rather than
/// failing the run, since memory figures are observational.
pub struct MemoryProbe {
    system: System,
    pid: Pid,
}

impl MemoryProbe {
    pub fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        Some(Self {
            system: System::new(),
            pid,
        })
    }

    /// Current resident set in bytes, or 0 if the process vanished from
    /// the snapshot.
    pub fn resident_bytes(&mut self) -> u64 {
        self.system.refresh_process(self.pid);
        self.system
            .process(self.pid)
            .map(|p| p.memory())
            .unwrap_or(0)
    }
}

/// Clamped resident-set delta. A transform may free more than it
/// allocates, so the reported delta saturates at zero instead of going
/// negative.
pub fn memory_delta(before: u64, after: u64) -> u64 {
    after.saturating_sub(before)
}

/// Runs `work` with the metrics window strictly around it: resident-set
/// baseline, start of the clock, the call, end of the clock, resident-set
/// reading. Transport and setup time never leak into the window.
pub fn capture<T>(cell_count: u64, work: impl FnOnce() -> T) -> (T, WorkerMetrics) {
    let mut probe = MemoryProbe::new();
    let before = probe.as_mut().map_or(0, MemoryProbe::resident_bytes);

    let start = Instant::now();
    let result = work();
    let elapsed_seconds = start.elapsed().as_secs_f64();

    let after = probe.as_mut().map_or(0, MemoryProbe::resident_bytes);

    (
        result,
        WorkerMetrics {
            elapsed_seconds,
            memory_delta_bytes: memory_delta(before, after),
            cell_count,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{WorkerMetrics, capture, memory_delta};

    #[test]
    fn memory_delta_clamps_at_zero() {
        // Freeing more than was allocated must read as zero, not wrap.
        assert_eq!(memory_delta(100, 40), 0);
        assert_eq!(memory_delta(40, 100), 60);
        assert_eq!(memory_delta(0, 0), 0);
        assert_eq!(memory_delta(u64::MAX, 0), 0);
    }

    #[test]
    fn idle_metrics_are_all_zero() {
        let m = WorkerMetrics::idle();
        assert_eq!(m.elapsed_seconds, 0.0);
        assert_eq!(m.memory_delta_bytes, 0);
        assert_eq!(m.cell_count, 0);
    }

    #[test]
    fn capture_times_only_the_closure() {
        let (value, metrics) = capture(40, || {
            std::thread::sleep(std::time::Duration::from_millis(5));
            123u32
        });
        assert_eq!(value, 123);
        assert_eq!(metrics.cell_count, 40);
        assert!(metrics.elapsed_seconds >= 0.005);
    }

    #[test]
    fn capture_passes_cell_count_through() {
        let (_, metrics) = capture(0, || ());
        assert_eq!(metrics.cell_count, 0);
    }
}
