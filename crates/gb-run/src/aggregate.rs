//! Coordinator-side reduction of the gathered per-worker metrics.

use gb_core::GridDesc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySummary {
    pub min_bytes: u64,
    pub max_bytes: u64,
    pub avg_bytes: f64,
}

/// The aggregate report for one run. Built exactly once, by the
/// coordinator, after every worker's metrics have been gathered.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub worker_count: usize,
    pub rows: usize,
    pub cols: usize,
    pub per_worker_cells: Vec<u64>,
    pub total_cells: u64,
    pub time: TimeSummary,
    pub memory: MemorySummary,
    pub cpu_cores: usize,
    pub accelerated: bool,
}

impl Report {
    /// Plain min/max/avg reductions over the fixed-size gather arrays.
    /// `total_cells` is exact; the timing and memory figures vary run to
    /// run and are observational only.
    pub fn build(
        desc: &GridDesc,
        times: &[f64],
        memory: &[u64],
        cells: &[u64],
        cpu_cores: usize,
        accelerated: bool,
    ) -> Self {
        let n = times.len().max(1) as f64;

        let time = TimeSummary {
            min: if times.is_empty() {
                0.0
            } else {
                times.iter().copied().fold(f64::INFINITY, f64::min)
            },
            max: times.iter().copied().fold(0.0, f64::max),
            avg: times.iter().sum::<f64>() / n,
        };

        let mem = MemorySummary {
            min_bytes: memory.iter().copied().min().unwrap_or(0),
            max_bytes: memory.iter().copied().max().unwrap_or(0),
            avg_bytes: memory.iter().map(|&m| m as f64).sum::<f64>() / n,
        };

        Report {
            worker_count: times.len(),
            rows: desc.rows,
            cols: desc.cols,
            per_worker_cells: cells.to_vec(),
            total_cells: cells.iter().sum(),
            time,
            memory: mem,
            cpu_cores,
            accelerated,
        }
    }
}

#[cfg(test)]
mod tests {
    use gb_core::{GridDesc, PixelFormat};

    use super::Report;

    #[test]
    fn reductions_over_gathered_arrays() {
        let desc = GridDesc::new(10, 4, PixelFormat::Gray8);
        let report = Report::build(
            &desc,
            &[0.5, 0.2, 0.9],
            &[300, 100, 200],
            &[16, 12, 12],
            8,
            false,
        );

        assert_eq!(report.worker_count, 3);
        assert_eq!(report.total_cells, 40);
        assert_eq!(report.per_worker_cells, vec![16, 12, 12]);
        assert_eq!(report.time.min, 0.2);
        assert_eq!(report.time.max, 0.9);
        assert!((report.time.avg - 1.6 / 3.0).abs() < 1e-12);
        assert_eq!(report.memory.min_bytes, 100);
        assert_eq!(report.memory.max_bytes, 300);
        assert_eq!(report.memory.avg_bytes, 200.0);
    }

    #[test]
    fn idle_workers_contribute_zeros() {
        let desc = GridDesc::new(3, 2, PixelFormat::Gray8);
        let report = Report::build(
            &desc,
            &[0.1, 0.1, 0.1, 0.0, 0.0],
            &[10, 10, 10, 0, 0],
            &[2, 2, 2, 0, 0],
            4,
            false,
        );
        assert_eq!(report.total_cells, 6);
        assert_eq!(report.time.min, 0.0);
        assert_eq!(report.memory.min_bytes, 0);
    }
}
