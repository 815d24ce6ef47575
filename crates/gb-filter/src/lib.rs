//! Bundled default transform: band-local box smoothing followed by
//! per-channel quantization.
//!
//! This is a deterministic stand-in for a heavier segmentation filter. It
//! only ever reads rows inside the band it is given (the smoothing window
//! clamps at the band edges), so it is safe under row-band partitioning
//! with no halo exchange.
//!
//! Parameter mapping:
//! - `sigma` sets the smoothing radius (`radius = sigma / 4`, capped);
//! - `k` sets the quantization step per channel;
//! - `min_size` is the minimum band height for smoothing to be worth
//!   doing; shorter bands are only quantized.

use gb_core::{Grid, Transform, TransformError, TransformParams};

const MAX_RADIUS: usize = 16;

/// Smoothing radius derived from `sigma`, clamped to a sane window.
fn radius_for(sigma: f32) -> usize {
    if sigma <= 0.0 {
        return 0;
    }
    ((sigma / 4.0).round() as usize).min(MAX_RADIUS)
}

/// Mean filter over a `(2*radius + 1)^2` window, clamped at the band
/// borders. Channels are filtered independently.
pub fn box_smooth(band: &Grid, radius: usize) -> Grid {
    if radius == 0 {
        return band.clone();
    }

    let desc = *band.desc();
    let channels = desc.format.bytes_per_pixel();
    let rows = desc.rows;
    let cols = desc.cols;
    let src = band.data();
    let mut out = Grid::new_zeroed(desc);
    let dst = out.data_mut();

    for y in 0..rows {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(rows.saturating_sub(1));
        for x in 0..cols {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(cols - 1);
            let count = ((y1 - y0 + 1) * (x1 - x0 + 1)) as u32;
            for c in 0..channels {
                let mut sum = 0u32;
                for ny in y0..=y1 {
                    let row_base = ny * cols * channels;
                    for nx in x0..=x1 {
                        sum += u32::from(src[row_base + nx * channels + c]);
                    }
                }
                dst[(y * cols + x) * channels + c] = (sum / count) as u8;
            }
        }
    }

    out
}

/// Snaps every channel value to the center of its `step`-wide bin.
pub fn quantize(band: &Grid, step: f32) -> Grid {
    let step = step.max(1.0).min(255.0) as u16;
    let mut out = band.clone();
    for v in out.data_mut() {
        let bin = u16::from(*v) / step;
        *v = (bin * step + step / 2).min(255) as u8;
    }
    out
}

/// The bundled [`Transform`]: smooth (when the band is tall enough), then
/// quantize.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandQuantize;

impl Transform for BandQuantize {
    fn apply(&self, band: &Grid, params: &TransformParams) -> Result<Grid, TransformError> {
        if !params.sigma.is_finite() || !params.k.is_finite() {
            return Err(TransformError::new("sigma and k must be finite"));
        }

        let smoothed = if band.desc().rows >= params.min_size as usize {
            box_smooth(band, radius_for(params.sigma))
        } else {
            band.clone()
        };
        Ok(quantize(&smoothed, params.k))
    }
}

#[cfg(test)]
mod tests {
    use gb_core::{Grid, GridDesc, PixelFormat, Transform, TransformParams};

    use super::{BandQuantize, box_smooth, quantize, radius_for};

    fn gray_band(rows: usize, cols: usize, data: Vec<u8>) -> Grid {
        Grid::from_vec(GridDesc::new(rows, cols, PixelFormat::Gray8), data).expect("valid band")
    }

    #[test]
    fn radius_mapping() {
        assert_eq!(radius_for(0.0), 0);
        assert_eq!(radius_for(4.0), 1);
        assert_eq!(radius_for(10.0), 3);
        assert_eq!(radius_for(1.0e6), 16);
    }

    #[test]
    fn smoothing_with_zero_radius_is_identity() {
        let band = gray_band(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(box_smooth(&band, 0), band);
    }

    #[test]
    fn smoothing_averages_the_clamped_window() {
        let band = gray_band(2, 2, vec![0, 4, 8, 12]);
        let out = box_smooth(&band, 1);
        // Every window covers the whole 2x2 band, so all pixels become the
        // mean (24 / 4 = 6).
        assert_eq!(out.data(), &[6, 6, 6, 6]);
    }

    #[test]
    fn quantize_snaps_to_bin_centers() {
        let band = gray_band(1, 4, vec![0, 15, 16, 255]);
        let out = quantize(&band, 16.0);
        assert_eq!(out.data(), &[8, 8, 24, 248]);
    }

    #[test]
    fn short_bands_skip_smoothing() {
        let params = TransformParams {
            sigma: 8.0,
            k: 1.0,
            min_size: 10,
        };
        let band = gray_band(2, 2, vec![0, 100, 200, 40]);
        let out = BandQuantize.apply(&band, &params).expect("transform");
        // k == 1 makes quantization the identity, and the band is shorter
        // than min_size, so nothing may change.
        assert_eq!(out, band);
    }

    #[test]
    fn transform_is_deterministic_and_shape_preserving() {
        let params = TransformParams::default();
        let band = gray_band(6, 3, (0..18).map(|v| (v * 13) as u8).collect());
        let a = BandQuantize.apply(&band, &params).expect("transform");
        let b = BandQuantize.apply(&band, &params).expect("transform");
        assert_eq!(a, b);
        assert_eq!(a.desc(), band.desc());
    }

    #[test]
    fn rejects_non_finite_params() {
        let band = gray_band(1, 1, vec![0]);
        let params = TransformParams {
            sigma: f32::NAN,
            ..TransformParams::default()
        };
        assert!(BandQuantize.apply(&band, &params).is_err());
    }
}
