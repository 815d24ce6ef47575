use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    InvalidRank { rank: usize, size: usize },
    PeerGone { rank: usize },
    SizeMismatch { expected: usize, actual: usize },
    MissingRootPayload,
    Aborted,
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { rank, size } => {
                write!(f, "rank {rank} out of range for group of {size}")
            }
            Self::PeerGone { rank } => write!(f, "rank {rank} is gone"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "transfer size mismatch: expected {expected} bytes, got {actual}")
            }
            Self::MissingRootPayload => write!(f, "root rank called a collective without a payload"),
            Self::Aborted => write!(f, "run aborted by the group"),
        }
    }
}

impl std::error::Error for CommError {}
