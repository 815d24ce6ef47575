use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    BandOutOfRange { start_row: usize, row_count: usize, rows: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected} bytes, got {actual}")
            }
            Self::BandOutOfRange {
                start_row,
                row_count,
                rows,
            } => {
                write!(
                    f,
                    "band [{start_row}, {}) out of range for {rows} rows",
                    start_row + row_count
                )
            }
        }
    }
}

impl std::error::Error for Error {}
