//! The `gridband` run layer: coordinator/worker pipeline over a
//! [`gb_comm::Group`], metric aggregation, report rendering, and the codec
//! and hardware-facts collaborators.
//!
//! The flow mirrors the classic scatter/compute/gather shape: the
//! coordinator broadcasts the grid descriptor, every rank plans its own
//! partition from it, bands move point-to-point under distinct phase tags,
//! the transform runs inside the metrics window behind a barrier, and the
//! coordinator reassembles the output grid and reduces the gathered
//! telemetry to min/max/avg.

pub mod aggregate;
pub mod codec;
mod error;
pub mod hw;
pub mod pipeline;
pub mod report;

pub use aggregate::{MemorySummary, Report, TimeSummary};
pub use codec::{CodecError, load_grid, save_grid};
pub use error::RunError;
pub use pipeline::{COORDINATOR, RunOutput, run};
