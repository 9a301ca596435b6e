//! Channel shift effect for JPEG images.
//!
//! Every output pixel takes its red, green and blue components from nearby
//! source pixels picked with a wrap-around offset per channel. The [`batch`]
//! module applies the effect to every JPEG in a directory concurrently.

pub mod batch;
pub mod io;
pub mod naming;
pub mod resolver;
pub mod shift;
pub mod threshold;

pub use batch::{BatchConfig, BatchPipeline, BatchSummary, FileStage};
pub use io::{ImageHandle, OutputBuffer, PackedColor};
pub use shift::{ChannelShift, shift};
pub use threshold::{FixedThresholds, RandomThresholds, ThresholdSource, Thresholds};

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ChannelShiftError>;

#[derive(thiserror::Error, Debug)]
pub enum ChannelShiftError {
    #[error("Failed to decode {path}. Error: {error}")]
    Decode { path: PathBuf, error: String },

    #[error("Failed to allocate a {width}x{height} buffer")]
    Allocation { width: u32, height: u32 },

    #[error("Failed to encode {path}. Error: {error}")]
    Encode {
        path: PathBuf,
        error: image::ImageError,
    },

    #[error("Failed to write {path}. Error: {error}")]
    Write {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to read directory {path}. Error: {error}")]
    DirectoryRead {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Pixel ({x}, {y}) is outside a {width}x{height} image")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
