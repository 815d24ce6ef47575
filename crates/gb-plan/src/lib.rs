//! Row-band partition planning.
//!
//! For `rows` rows split across `workers` ranks, each rank gets either
//! `rows / workers` or `rows / workers + 1` rows; the `rows % workers`
//! extra rows go to the lowest-indexed ranks. The result is a contiguous,
//! gap-free, non-overlapping cover of `[0, rows)` whose per-rank counts
//! differ by at most one.
//!
//! Every rank computes its own partition independently from the broadcast
//! `(rows, workers)` pair — planning itself needs no communication.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    NoWorkers,
    WorkerOutOfRange { worker: usize, workers: usize },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker count must be at least 1"),
            Self::WorkerOutOfRange { worker, workers } => {
                write!(f, "worker index {worker} out of range for {workers} workers")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// One rank's share of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub worker: usize,
    pub start_row: usize,
    pub row_count: usize,
}

impl Partition {
    /// Number of grid cells in this partition for a grid `cols` wide.
    pub fn cells(&self, cols: usize) -> u64 {
        self.row_count as u64 * cols as u64
    }

    /// True when `workers > rows` left this rank without any rows. Empty
    /// ranks skip the transform but still join every collective.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Computes the partition of `worker` for `rows` rows split `workers` ways.
pub fn plan(rows: usize, workers: usize, worker: usize) -> Result<Partition, PlanError> {
    if workers == 0 {
        return Err(PlanError::NoWorkers);
    }
    if worker >= workers {
        return Err(PlanError::WorkerOutOfRange { worker, workers });
    }

    let base = rows / workers;
    let rem = rows % workers;
    let row_count = base + usize::from(worker < rem);
    let start_row = base * worker + worker.min(rem);

    Ok(Partition {
        worker,
        start_row,
        row_count,
    })
}

/// All partitions for `(rows, workers)`, ordered by worker index.
pub fn plan_all(rows: usize, workers: usize) -> Result<Vec<Partition>, PlanError> {
    (0..workers.max(1))
        .map(|w| plan(rows, workers, w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Partition, PlanError, plan, plan_all};

    #[test]
    fn remainder_goes_to_lowest_ranks() {
        // 10 rows over 3 workers: remainder 1, so worker 0 gets the extra row.
        let parts = plan_all(10, 3).expect("valid plan");
        assert_eq!(
            parts,
            vec![
                Partition { worker: 0, start_row: 0, row_count: 4 },
                Partition { worker: 1, start_row: 4, row_count: 3 },
                Partition { worker: 2, start_row: 7, row_count: 3 },
            ]
        );
    }

    #[test]
    fn more_workers_than_rows() {
        let parts = plan_all(3, 5).expect("valid plan");
        let counts: Vec<usize> = parts.iter().map(|p| p.row_count).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 0]);
        assert!(parts[3].is_empty());
        assert!(parts[4].is_empty());
        // Empty ranks still carry a well-defined start row.
        assert_eq!(parts[3].start_row, 3);
    }

    #[test]
    fn single_worker_gets_everything() {
        let p = plan(480, 1, 0).expect("valid plan");
        assert_eq!(p.start_row, 0);
        assert_eq!(p.row_count, 480);
    }

    #[test]
    fn zero_rows_is_all_empty() {
        let parts = plan_all(0, 4).expect("valid plan");
        assert!(parts.iter().all(|p| p.is_empty()));
        assert!(parts.iter().all(|p| p.start_row == 0));
    }

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(plan(10, 0, 0), Err(PlanError::NoWorkers));
        assert_eq!(
            plan(10, 2, 2),
            Err(PlanError::WorkerOutOfRange { worker: 2, workers: 2 })
        );
    }

    #[test]
    fn cover_is_contiguous_and_balanced() {
        for rows in [0usize, 1, 2, 3, 7, 10, 37, 100, 1081] {
            for workers in [1usize, 2, 3, 4, 5, 8, 16, 37] {
                let parts = plan_all(rows, workers).expect("valid plan");
                assert_eq!(parts.len(), workers);

                let mut cursor = 0usize;
                for (i, p) in parts.iter().enumerate() {
                    assert_eq!(p.worker, i);
                    assert_eq!(p.start_row, cursor, "gap at rows={rows} workers={workers}");
                    cursor += p.row_count;
                }
                assert_eq!(cursor, rows, "cover must end at rows");

                let max = parts.iter().map(|p| p.row_count).max().unwrap();
                let min = parts.iter().map(|p| p.row_count).min().unwrap();
                assert!(max - min <= 1, "imbalance at rows={rows} workers={workers}");
            }
        }
    }

    #[test]
    fn cell_count_matches_share() {
        let p = plan(10, 3, 0).expect("valid plan");
        assert_eq!(p.cells(4), 16);
    }
}
