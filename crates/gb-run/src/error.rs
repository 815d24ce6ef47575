use core::fmt;

use gb_comm::CommError;
use gb_core::{GridDesc, TransformError};
use gb_plan::PlanError;

/// Any fatal condition in the distributed run. All variants abort the
/// whole group; there is no partial-result mode.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Comm(CommError),
    Plan(PlanError),
    Grid(gb_core::Error),
    Transform(TransformError),
    BadDescriptor(String),
    ShapeChanged { expected: GridDesc, actual: GridDesc },
    MissingInput,
    Internal(&'static str),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comm(err) => write!(f, "transport: {err}"),
            Self::Plan(err) => write!(f, "configuration: {err}"),
            Self::Grid(err) => write!(f, "grid: {err}"),
            Self::Transform(err) => write!(f, "{err}"),
            Self::BadDescriptor(reason) => write!(f, "bad grid descriptor frame: {reason}"),
            Self::ShapeChanged { expected, actual } => write!(
                f,
                "transform changed the band shape: expected {}x{} {:?}, got {}x{} {:?}",
                expected.rows, expected.cols, expected.format, actual.rows, actual.cols, actual.format
            ),
            Self::MissingInput => write!(f, "coordinator rank started without an input grid"),
            Self::Internal(what) => write!(f, "internal invariant violated: {what}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<CommError> for RunError {
    fn from(err: CommError) -> Self {
        Self::Comm(err)
    }
}

impl From<PlanError> for RunError {
    fn from(err: PlanError) -> Self {
        Self::Plan(err)
    }
}

impl From<gb_core::Error> for RunError {
    fn from(err: gb_core::Error) -> Self {
        Self::Grid(err)
    }
}

impl From<TransformError> for RunError {
    fn from(err: TransformError) -> Self {
        Self::Transform(err)
    }
}
