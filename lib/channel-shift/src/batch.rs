//! Directory-wide batch processing.
//!
//! Every JPEG in the source directory becomes one task on a [`JoinSet`].
//! Tasks are all spawned before any of them is awaited, each one owns its
//! image and output buffer, and a failing file never stops its siblings.

use crate::{
    ChannelShiftError, Result,
    io,
    naming,
    shift::ChannelShift,
    threshold::{RandomThresholds, ThresholdSource},
};
use derivative::Derivative;
use derive_setters::Setters;
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{sync::Semaphore, task::JoinSet};

pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 80;
pub const MAX_QUALITY: u8 = 100;

/// Batch configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BatchConfig {
    /// Directory scanned for `.jpg` / `.jpeg` files
    #[derivative(Default(value = "PathBuf::from(\"src\")"))]
    pub source_dir: PathBuf,
    /// Existing directory the results are written to
    #[derivative(Default(value = "PathBuf::from(\"tmp\")"))]
    pub target_dir: PathBuf,
    /// JPEG quality of the results (80-100)
    #[derivative(Default(value = "DEFAULT_QUALITY"))]
    pub quality: u8,
    /// Files processed at the same time, `None` means no limit
    pub max_concurrency: Option<usize>,
}

impl BatchConfig {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self::default()
            .with_source_dir(source_dir.into())
            .with_target_dir(target_dir.into())
    }

    fn validate(&self) -> Result<()> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ChannelShiftError::InvalidParameter(format!(
                "jpeg quality must be within {MIN_QUALITY}-{MAX_QUALITY}, got {}",
                self.quality
            )));
        }

        if self.max_concurrency == Some(0) {
            return Err(ChannelShiftError::InvalidParameter(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Last step a file reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Discovered,
    Opened,
    Transformed,
    Saved,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStage::Discovered => "discovered",
            FileStage::Opened => "opened",
            FileStage::Transformed => "transformed",
            FileStage::Saved => "saved",
        };
        f.write_str(name)
    }
}

/// A file that could not be processed.
#[derive(thiserror::Error, Debug)]
#[error("{} failed after being {stage}: {error}", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    pub stage: FileStage,
    #[source]
    pub error: ChannelShiftError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub discovered: usize,
    pub created: usize,
    pub failed: usize,
}

pub struct BatchPipeline {
    config: BatchConfig,
    thresholds: Arc<dyn ThresholdSource>,
}

impl BatchPipeline {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            thresholds: Arc::new(RandomThresholds),
        }
    }

    pub fn with_threshold_source(mut self, source: impl ThresholdSource + 'static) -> Self {
        self.thresholds = Arc::new(source);
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Processes every JPEG in the source directory.
    ///
    /// Only a directory listing failure or an invalid configuration is
    /// returned as an error. Per-file failures are logged where they happen
    /// and only counted in the summary.
    pub async fn run(&self) -> Result<BatchSummary> {
        self.config.validate()?;

        let files = discover(&self.config.source_dir).await?;
        log::info!(
            "Found {} jpeg files in {}",
            files.len(),
            self.config.source_dir.display()
        );

        let limiter = self
            .config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits.min(Semaphore::MAX_PERMITS))));

        let mut tasks = JoinSet::new();
        for source in files.iter().cloned() {
            let target_dir = self.config.target_dir.clone();
            let quality = self.config.quality;
            let thresholds = self.thresholds.clone();
            let limiter = limiter.clone();

            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                process_file(&source, &target_dir, quality, &*thresholds).await
            });
        }

        let mut summary = BatchSummary {
            discovered: files.len(),
            ..Default::default()
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(target)) => {
                    log::info!("Created: {}", target.display());
                    summary.created += 1;
                }
                Ok(Err(e)) => {
                    log::warn!("Skipped {e}");
                    summary.failed += 1;
                }
                Err(e) => {
                    log::error!("Image task aborted: {e}");
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "Done creating images: {} created, {} failed",
            summary.created,
            summary.failed
        );

        Ok(summary)
    }
}

/// Lists the JPEG files of `dir` as absolute paths, sorted by name.
pub async fn discover(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let read_error = |error: std::io::Error| ChannelShiftError::DirectoryRead {
        path: dir.to_path_buf(),
        error,
    };

    let root = std::path::absolute(dir).map_err(read_error)?;
    let mut entries = tokio::fs::read_dir(&root).await.map_err(read_error)?;

    let mut files = vec![];
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let path = root.join(entry.file_name());
        if naming::is_jpeg(&path) {
            files.push(path);
        } else {
            log::debug!("ignore {}", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Opens, shifts and saves one file.
///
/// Returns the written path. The target name embeds the wall-clock time in
/// milliseconds taken right before saving.
pub async fn process_file(
    source: &Path,
    target_dir: &Path,
    quality: u8,
    thresholds: &dyn ThresholdSource,
) -> std::result::Result<PathBuf, FileError> {
    let mut stage = FileStage::Discovered;
    let fail = |stage: FileStage, error: ChannelShiftError| FileError {
        path: source.to_path_buf(),
        stage,
        error,
    };

    let image = io::open(source).await.map_err(|e| fail(stage, e))?;
    stage = FileStage::Opened;

    let effect = ChannelShift::from_source(thresholds);
    log::debug!("{} thresholds {:?}", source.display(), effect.thresholds());

    let output = effect.apply(&image).map_err(|e| fail(stage, e))?;
    drop(image);
    stage = FileStage::Transformed;

    let target = naming::target_path(source, target_dir, cutil::time::timestamp_millis())
        .map_err(|e| fail(stage, e))?;
    io::save(&target, quality, &output)
        .await
        .map_err(|e| fail(stage, e))?;

    log::debug!("{} {}", source.display(), FileStage::Saved);
    Ok(target)
}
