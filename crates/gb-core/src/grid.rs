use serde::{Deserialize, Serialize};

use crate::Error;

/// Supported interleaved pixel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    pub fn channels(self) -> usize {
        self.bytes_per_pixel()
    }
}

/// Shape and layout of a grid. Immutable once broadcast to the group;
/// every rank derives its local buffer sizes from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDesc {
    pub rows: usize,
    pub cols: usize,
    pub format: PixelFormat,
}

impl GridDesc {
    pub fn new(rows: usize, cols: usize, format: PixelFormat) -> Self {
        Self { rows, cols, format }
    }

    /// Bytes in one row.
    pub fn row_bytes(&self) -> usize {
        self.cols * self.format.bytes_per_pixel()
    }

    /// Bytes in a band of `row_count` rows.
    pub fn band_bytes(&self, row_count: usize) -> usize {
        row_count * self.row_bytes()
    }

    pub fn total_bytes(&self) -> usize {
        self.band_bytes(self.rows)
    }

    /// Overflow-checked total byte length; `None` when the descriptor
    /// describes more bytes than the address space can hold.
    pub fn checked_total_bytes(&self) -> Option<usize> {
        self.rows
            .checked_mul(self.cols)?
            .checked_mul(self.format.bytes_per_pixel())
    }

    pub fn cells(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }

    /// Descriptor for a band of this grid: same width and format,
    /// `row_count` rows.
    pub fn band_desc(&self, row_count: usize) -> GridDesc {
        GridDesc {
            rows: row_count,
            ..*self
        }
    }
}

/// An owned row-major pixel buffer.
///
/// Band accessors hand out contiguous byte slices so a band can be moved
/// through the transport or copied into an output grid without reshaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    desc: GridDesc,
    data: Vec<u8>,
}

impl Grid {
    pub fn from_vec(desc: GridDesc, data: Vec<u8>) -> Result<Self, Error> {
        let expected = desc.checked_total_bytes().ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { desc, data })
    }

    pub fn new_zeroed(desc: GridDesc) -> Self {
        let len = desc.checked_total_bytes().expect("grid size overflow");
        Self {
            desc,
            data: vec![0u8; len],
        }
    }

    pub fn desc(&self) -> &GridDesc {
        &self.desc
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    fn band_range(&self, start_row: usize, row_count: usize) -> Result<core::ops::Range<usize>, Error> {
        let end_row = start_row
            .checked_add(row_count)
            .ok_or(Error::BandOutOfRange {
                start_row,
                row_count,
                rows: self.desc.rows,
            })?;
        if end_row > self.desc.rows {
            return Err(Error::BandOutOfRange {
                start_row,
                row_count,
                rows: self.desc.rows,
            });
        }
        let start = self.desc.band_bytes(start_row);
        let end = self.desc.band_bytes(end_row);
        Ok(start..end)
    }

    /// Contiguous bytes of rows `[start_row, start_row + row_count)`.
    pub fn band(&self, start_row: usize, row_count: usize) -> Result<&[u8], Error> {
        let range = self.band_range(start_row, row_count)?;
        Ok(&self.data[range])
    }

    pub fn band_mut(&mut self, start_row: usize, row_count: usize) -> Result<&mut [u8], Error> {
        let range = self.band_range(start_row, row_count)?;
        Ok(&mut self.data[range])
    }

    /// Copies a band out into an owned grid of matching shape.
    pub fn extract_band(&self, start_row: usize, row_count: usize) -> Result<Grid, Error> {
        let bytes = self.band(start_row, row_count)?;
        Grid::from_vec(self.desc.band_desc(row_count), bytes.to_vec())
    }

    /// Writes `bytes` into rows `[start_row, start_row + row_count)`.
    pub fn write_band(&mut self, start_row: usize, row_count: usize, bytes: &[u8]) -> Result<(), Error> {
        let dst = self.band_mut(start_row, row_count)?;
        if dst.len() != bytes.len() {
            return Err(Error::SizeMismatch {
                expected: dst.len(),
                actual: bytes.len(),
            });
        }
        dst.copy_from_slice(bytes);
        Ok(())
    }
}
