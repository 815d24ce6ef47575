//! The distributed run: broadcast the descriptor, distribute bands,
//! transform under a metrics window, collect, gather telemetry, aggregate.
//!
//! Every rank calls [`run`] with the same transform and parameters; only
//! the coordinator passes the input grid and only the coordinator gets a
//! [`RunOutput`] back. Any fatal error aborts the whole group before it
//! propagates — no rank is left blocked on a transfer that will never
//! come, and no partial result is ever published.

use gb_comm::{Group, Tag, gather_f64, gather_u64};
use gb_core::{Grid, GridDesc, Transform, TransformParams};
use gb_metrics::{WorkerMetrics, capture};
use gb_plan::{Partition, plan, plan_all};

use crate::aggregate::Report;
use crate::error::RunError;
use crate::hw;

/// The rank that owns the full grid and the aggregation.
pub const COORDINATOR: usize = 0;

/// The coordinator's view of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub grid: Grid,
    pub report: Report,
}

/// Executes one full run on this rank. Blocking; returns `Some` only on
/// the coordinator.
pub fn run<G: Group>(
    group: &G,
    input: Option<Grid>,
    transform: &dyn Transform,
    params: &TransformParams,
) -> Result<Option<RunOutput>, RunError> {
    let outcome = if group.rank() == COORDINATOR {
        match input.ok_or(RunError::MissingInput) {
            Ok(grid) => coordinate(group, grid, transform, params).map(Some),
            Err(err) => Err(err),
        }
    } else {
        participate(group, transform, params).map(|()| None)
    };

    if let Err(err) = &outcome {
        // Wake every blocked rank; the run is over.
        tracing::error!(rank = group.rank(), error = %err, "aborting run");
        group.abort();
    }
    outcome
}

fn coordinate<G: Group>(
    group: &G,
    input: Grid,
    transform: &dyn Transform,
    params: &TransformParams,
) -> Result<RunOutput, RunError> {
    let desc = *input.desc();
    let frame =
        bincode::serialize(&desc).map_err(|err| RunError::BadDescriptor(err.to_string()))?;
    group.broadcast(COORDINATOR, Some(&frame))?;

    let partitions = plan_all(desc.rows, group.size())?;
    let mine = partitions[COORDINATOR];
    tracing::debug!(rows = desc.rows, cols = desc.cols, workers = group.size(), "plan ready");

    // Distribute: everyone else first, own band as a local copy.
    for part in &partitions[1..] {
        if !part.is_empty() {
            let band = input.band(part.start_row, part.row_count)?;
            group.send(part.worker, Tag::DistributeBand, band)?;
        }
    }
    let local_input = input.extract_band(mine.start_row, mine.row_count)?;

    let (local_output, metrics) = transform_band(group, &local_input, mine, transform, params)?;

    // Collect into disjoint row ranges of the output grid.
    let mut output = Grid::new_zeroed(desc);
    output.write_band(mine.start_row, mine.row_count, local_output.data())?;
    for part in &partitions[1..] {
        if !part.is_empty() {
            let band = group.recv(part.worker, Tag::CollectBand)?;
            output.write_band(part.start_row, part.row_count, &band)?;
        }
    }

    // Field-wise metric gathers, rank order. The root always receives the
    // gathered lanes; anything else is a broken substrate.
    let missing = || RunError::Internal("metric gather returned no data at the root");
    let times =
        gather_f64(group, COORDINATOR, metrics.elapsed_seconds)?.ok_or_else(missing)?;
    let memory =
        gather_u64(group, COORDINATOR, metrics.memory_delta_bytes)?.ok_or_else(missing)?;
    let cells = gather_u64(group, COORDINATOR, metrics.cell_count)?.ok_or_else(missing)?;

    let report = Report::build(
        &desc,
        &times,
        &memory,
        &cells,
        hw::cpu_core_count(),
        hw::has_accelerated_backend(),
    );

    Ok(RunOutput {
        grid: output,
        report,
    })
}

fn participate<G: Group>(
    group: &G,
    transform: &dyn Transform,
    params: &TransformParams,
) -> Result<(), RunError> {
    let frame = group.broadcast(COORDINATOR, None)?;
    let desc: GridDesc =
        bincode::deserialize(&frame).map_err(|err| RunError::BadDescriptor(err.to_string()))?;

    let mine = plan(desc.rows, group.size(), group.rank())?;

    let local_input = if mine.is_empty() {
        Grid::new_zeroed(desc.band_desc(0))
    } else {
        let mut band = Grid::new_zeroed(desc.band_desc(mine.row_count));
        group.recv_into(COORDINATOR, Tag::DistributeBand, band.data_mut())?;
        band
    };

    let (local_output, metrics) = transform_band(group, &local_input, mine, transform, params)?;

    if !mine.is_empty() {
        group.send(COORDINATOR, Tag::CollectBand, local_output.data())?;
    }

    gather_f64(group, COORDINATOR, metrics.elapsed_seconds)?;
    gather_u64(group, COORDINATOR, metrics.memory_delta_bytes)?;
    gather_u64(group, COORDINATOR, metrics.cell_count)?;
    Ok(())
}

/// Barrier, then the transform under the metrics window. The barrier gives
/// all ranks a common epoch, so elapsed times are comparable and exclude
/// distribute-phase skew. Empty partitions skip the transform entirely but
/// still hit the barrier and report neutral metrics.
fn transform_band<G: Group>(
    group: &G,
    band: &Grid,
    part: Partition,
    transform: &dyn Transform,
    params: &TransformParams,
) -> Result<(Grid, WorkerMetrics), RunError> {
    group.barrier()?;

    if part.is_empty() {
        return Ok((band.clone(), WorkerMetrics::idle()));
    }

    let cells = part.cells(band.desc().cols);
    let (result, metrics) = capture(cells, || transform.apply(band, params));
    let output = result?;

    if output.desc() != band.desc() {
        return Err(RunError::ShapeChanged {
            expected: *band.desc(),
            actual: *output.desc(),
        });
    }
    Ok((output, metrics))
}
