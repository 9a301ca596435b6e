//! JPEG decode/encode and the true-color rasters the shift works on.

use crate::{ChannelShiftError, Result};
use image::{ImageFormat, Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use std::path::Path;

/// One pixel packed as `0x00RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl From<Rgb<u8>> for PackedColor {
    fn from(pixel: Rgb<u8>) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }
}

impl From<PackedColor> for Rgb<u8> {
    fn from(color: PackedColor) -> Self {
        Rgb([color.red(), color.green(), color.blue()])
    }
}

/// Decoded source image. Read-only.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    image: RgbImage,
}

impl ImageHandle {
    /// Wraps an already decoded raster. Zero-sized images are rejected.
    pub fn from_rgb(image: RgbImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ChannelShiftError::InvalidParameter(format!(
                "image must not be empty, got {}x{}",
                image.width(),
                image.height()
            )));
        }

        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Reads the packed color at `(x, y)`.
    ///
    /// A coordinate equal to the axis extent wraps to `0`, since the
    /// wrap-around resolver may hand back the extent itself. Anything
    /// further out is an error.
    pub fn pixel(&self, x: i64, y: i64) -> Result<PackedColor> {
        let out_of_bounds = || ChannelShiftError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        };

        let px = wrap_edge(x, self.width()).ok_or_else(out_of_bounds)?;
        let py = wrap_edge(y, self.height()).ok_or_else(out_of_bounds)?;

        Ok((*self.image.get_pixel(px, py)).into())
    }
}

fn wrap_edge(coordinate: i64, extent: u32) -> Option<u32> {
    let extent = extent as i64;
    match coordinate {
        c if (0..extent).contains(&c) => Some(c as u32),
        c if c == extent => Some(0),
        _ => None,
    }
}

/// Freshly allocated output raster, filled pixel by pixel.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    image: RgbImage,
}

impl OutputBuffer {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: PackedColor) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(ChannelShiftError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width(),
                height: self.height(),
            });
        }

        self.image.put_pixel(x, y, color.into());
        Ok(())
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }
}

/// Reads and decodes a JPEG file.
pub async fn open(path: impl AsRef<Path>) -> Result<ImageHandle> {
    let path = path.as_ref();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ChannelShiftError::Decode {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
        .map_err(|e| ChannelShiftError::Decode {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?
        .to_rgb8();

    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    ImageHandle::from_rgb(image).map_err(|e| ChannelShiftError::Decode {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Allocates a black true-color buffer.
pub fn create_buffer(width: u32, height: u32) -> Result<OutputBuffer> {
    let fits = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .is_some();

    if width == 0 || height == 0 || !fits {
        return Err(ChannelShiftError::Allocation { width, height });
    }

    Ok(OutputBuffer {
        image: RgbImage::new(width, height),
    })
}

/// Encodes `buffer` as JPEG at `quality` (0-100) and writes it to `path`.
///
/// The encoder's lowest quality is 1, so 0 is written as 1.
pub async fn save(path: impl AsRef<Path>, quality: u8, buffer: &OutputBuffer) -> Result<()> {
    let path = path.as_ref();

    if quality > 100 {
        return Err(ChannelShiftError::InvalidParameter(format!(
            "jpeg quality must be within 0-100, got {quality}"
        )));
    }

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.max(1))
        .encode_image(&buffer.image)
        .map_err(|e| ChannelShiftError::Encode {
            path: path.to_path_buf(),
            error: e,
        })?;

    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| ChannelShiftError::Write {
            path: path.to_path_buf(),
            error: e,
        })?;

    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
