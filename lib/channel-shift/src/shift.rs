//! The channel shift effect.
//!
//! Red is sampled from a pixel to the right, blue from a pixel to the left
//! and green from a pixel below, each with its own offset and wrapping
//! around the image edges.

use crate::{
    Result,
    io::{self, ImageHandle, OutputBuffer, PackedColor},
    resolver::resolve,
    threshold::{MIN_THRESHOLD, RandomThresholds, ThresholdSource, Thresholds},
};
use derivative::Derivative;
use derive_setters::Setters;

/// Channel shift effect configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ChannelShift {
    #[derivative(Default(
        value = "Thresholds::new(MIN_THRESHOLD, MIN_THRESHOLD, MIN_THRESHOLD)"
    ))]
    thresholds: Thresholds,
}

impl ChannelShift {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws fresh offsets from `source`.
    pub fn from_source(source: &dyn ThresholdSource) -> Self {
        Self::default().with_thresholds(source.draw())
    }

    /// Draws fresh offsets in `[MIN_THRESHOLD, MAX_THRESHOLD]`.
    pub fn random() -> Self {
        Self::from_source(&RandomThresholds)
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn apply(&self, image: &ImageHandle) -> Result<OutputBuffer> {
        shift(image, self.thresholds)
    }
}

/// Builds a new image whose channels are resampled from shifted positions.
///
/// The input is left untouched. The only errors come from pixel access.
/// Offsets at least as large as an axis are reduced modulo that axis so
/// images smaller than the offset still resolve inside the raster.
pub fn shift(image: &ImageHandle, thresholds: Thresholds) -> Result<OutputBuffer> {
    let (width, height) = (image.width(), image.height());
    let mut output = io::create_buffer(width, height)?;

    let (w, h) = (width as i64, height as i64);
    let (tr, tg, tb) = (
        thresholds.red as i64 % w,
        thresholds.green as i64 % h,
        -(thresholds.blue as i64) % w,
    );

    for x in 0..width {
        let xi = x as i64;
        let (red_x, blue_x) = (resolve(xi, w, tr), resolve(xi, w, tb));

        for y in 0..height {
            let yi = y as i64;

            let red = image.pixel(red_x, yi)?.red();
            let green = image.pixel(xi, resolve(yi, h, tg))?.green();
            let blue = image.pixel(blue_x, yi)?.blue();

            output.set_pixel(x, y, PackedColor::new(red, green, blue))?;
        }
    }

    Ok(output)
}
