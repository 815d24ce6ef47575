//! Umbrella crate for the `gridband` workspace.
//!
//! Re-exports the grid types, the partition planner, the worker-group
//! transport, metrics capture, the bundled transform and the run layer.

pub use gb_comm::*;
pub use gb_core::*;
pub use gb_filter::*;
pub use gb_metrics::*;
pub use gb_plan::*;
pub use gb_run::*;
