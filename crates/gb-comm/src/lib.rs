//! Worker-group transport for the `gridband` workspace.
//!
//! The [`Group`] trait models a fixed-size set of cooperating ranks with
//! blocking tagged point-to-point transfers and the collectives the
//! pipeline needs (barrier, broadcast, gather, abort). [`LocalGroup`] is
//! the bundled substrate: one thread per rank over crossbeam channels,
//! which is enough to run and test the whole pipeline on one machine. Any
//! substrate with blocking collectives over a fixed process group can
//! implement [`Group`] instead.

mod error;
mod group;
mod local;

pub use error::CommError;
pub use group::{Group, Tag, gather_f64, gather_u64};
pub use local::LocalGroup;
