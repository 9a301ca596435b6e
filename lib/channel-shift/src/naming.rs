//! Source file matching and output file naming.

use crate::{ChannelShiftError, Result};
use std::path::{Path, PathBuf};

/// Suffixes handled by the batch, longest first. Matching is case-sensitive.
pub const JPEG_SUFFIXES: [&str; 2] = [".jpeg", ".jpg"];

fn jpeg_stem(file_name: &str) -> Option<&str> {
    JPEG_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
}

/// Whether the file name ends in `.jpg` or `.jpeg`.
pub fn is_jpeg(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(jpeg_stem)
        .is_some()
}

/// Output path for `source`: the JPEG suffix is replaced with
/// `-<timestamp_millis>.jpg` and the name is placed under `target_dir`.
///
/// ```
/// use channel_shift::naming::target_path;
/// use std::path::Path;
///
/// let target = target_path("/in/photo.jpg", "/out", 1700000000000).unwrap();
/// assert_eq!(target, Path::new("/out/photo-1700000000000.jpg"));
/// ```
pub fn target_path(
    source: impl AsRef<Path>,
    target_dir: impl AsRef<Path>,
    timestamp_millis: i64,
) -> Result<PathBuf> {
    let source = source.as_ref();

    let stem = source
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(jpeg_stem)
        .ok_or_else(|| {
            ChannelShiftError::InvalidParameter(format!(
                "{} is not a jpeg file name",
                source.display()
            ))
        })?;

    Ok(target_dir
        .as_ref()
        .join(format!("{stem}-{timestamp_millis}.jpg")))
}
