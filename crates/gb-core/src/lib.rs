//! Foundational types for the `gridband` workspace.
//!
//! ## Grids and bands
//! A [`Grid`] is an owned row-major byte buffer described by a [`GridDesc`]
//! (rows, cols, pixel format). A *band* is a contiguous run of whole rows;
//! bands are the unit of distribution, so band accessors hand out
//! contiguous byte slices suitable for raw transfer.
//!
//! ## Transforms
//! The [`Transform`] trait is the plugin seam: a pure, deterministic,
//! shape-preserving function from one band to another, with a small fixed
//! record of tuning values ([`TransformParams`]). The distribution core
//! never looks inside it.

mod error;
mod grid;
mod transform;

pub use error::Error;
pub use grid::{Grid, GridDesc, PixelFormat};
pub use transform::{IdentityTransform, Transform, TransformError, TransformParams};
