//! Image codec boundary: load a grid from a file, persist a grid to a
//! file. Everything in here is an opaque collaborator as far as the
//! distribution core is concerned.

use core::fmt;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use gb_core::{Grid, GridDesc, PixelFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Decode { path: PathBuf, reason: String },
    Encode { path: PathBuf, reason: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, reason } => {
                write!(f, "cannot decode {}: {reason}", path.display())
            }
            Self::Encode { path, reason } => {
                write!(f, "cannot encode {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Decodes an image file into a grid. Gray and RGBA sources keep their
/// layout; everything else is converted to RGB8.
pub fn load_grid(path: &Path) -> Result<Grid, CodecError> {
    let decode_err = |reason: String| CodecError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let img = image::open(path).map_err(|err| decode_err(err.to_string()))?;

    let (format, raw, width, height) = match img {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = gray.dimensions();
            (PixelFormat::Gray8, gray.into_raw(), w, h)
        }
        DynamicImage::ImageRgba8(rgba) => {
            let (w, h) = rgba.dimensions();
            (PixelFormat::Rgba8, rgba.into_raw(), w, h)
        }
        other => {
            let rgb = other.to_rgb8();
            let (w, h) = rgb.dimensions();
            (PixelFormat::Rgb8, rgb.into_raw(), w, h)
        }
    };

    let desc = GridDesc::new(height as usize, width as usize, format);
    Grid::from_vec(desc, raw).map_err(|err| decode_err(err.to_string()))
}

/// Encodes a grid to `path`; the container format follows the extension.
pub fn save_grid(path: &Path, grid: &Grid) -> Result<(), CodecError> {
    let encode_err = |reason: String| CodecError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    let desc = grid.desc();
    let width = u32::try_from(desc.cols).map_err(|_| encode_err("grid too wide".into()))?;
    let height = u32::try_from(desc.rows).map_err(|_| encode_err("grid too tall".into()))?;
    let data = grid.data().to_vec();

    let result = match desc.format {
        PixelFormat::Gray8 => GrayImage::from_raw(width, height, data)
            .map(|img| img.save(path)),
        PixelFormat::Rgb8 => RgbImage::from_raw(width, height, data)
            .map(|img| img.save(path)),
        PixelFormat::Rgba8 => RgbaImage::from_raw(width, height, data)
            .map(|img| img.save(path)),
    };

    match result {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(encode_err(err.to_string())),
        None => Err(encode_err("buffer length does not match descriptor".into())),
    }
}
