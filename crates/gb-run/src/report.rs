//! Human-readable rendering of the aggregate report. Printed by the
//! coordinator only.

use std::fmt::Write;

use crate::aggregate::Report;

const MIB: f64 = 1024.0 * 1024.0;

pub fn render(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Parallel band transform results ===");
    let _ = writeln!(out, "Workers used: {}", report.worker_count);
    let _ = writeln!(out, "CPU cores available: {}", report.cpu_cores);
    let _ = writeln!(
        out,
        "Accelerated backend: {}",
        if report.accelerated { "yes" } else { "no" }
    );
    let _ = writeln!(out, "Grid size: {} x {}", report.rows, report.cols);
    let _ = writeln!(out, "Total cells processed: {}", report.total_cells);
    let _ = writeln!(out, "Cells per worker:");
    for (worker, cells) in report.per_worker_cells.iter().enumerate() {
        let _ = writeln!(out, "  worker {worker}: {cells}");
    }
    let _ = writeln!(out, "Max worker time: {:.6} s", report.time.max);
    let _ = writeln!(out, "Min worker time: {:.6} s", report.time.min);
    let _ = writeln!(out, "Avg worker time: {:.6} s", report.time.avg);
    let _ = writeln!(
        out,
        "Max memory delta: {:.2} MiB",
        report.memory.max_bytes as f64 / MIB
    );
    let _ = writeln!(
        out,
        "Min memory delta: {:.2} MiB",
        report.memory.min_bytes as f64 / MIB
    );
    let _ = writeln!(
        out,
        "Avg memory delta: {:.2} MiB",
        report.memory.avg_bytes / MIB
    );
    let _ = writeln!(out, "=======================================");

    out
}

#[cfg(test)]
mod tests {
    use gb_core::{GridDesc, PixelFormat};

    use super::render;
    use crate::aggregate::Report;

    #[test]
    fn renders_every_section() {
        let desc = GridDesc::new(10, 4, PixelFormat::Rgb8);
        let report = Report::build(&desc, &[0.25, 0.75], &[0, 2 * 1024 * 1024], &[20, 20], 8, false);
        let text = render(&report);

        assert!(text.contains("Workers used: 2"));
        assert!(text.contains("Grid size: 10 x 4"));
        assert!(text.contains("Total cells processed: 40"));
        assert!(text.contains("  worker 0: 20"));
        assert!(text.contains("  worker 1: 20"));
        assert!(text.contains("Max worker time: 0.750000 s"));
        assert!(text.contains("Avg worker time: 0.500000 s"));
        assert!(text.contains("Max memory delta: 2.00 MiB"));
        assert!(text.contains("Accelerated backend: no"));
    }
}
