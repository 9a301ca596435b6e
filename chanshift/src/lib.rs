//! Chanshift
//!
//! Shifts the color channels of every JPEG in a source directory and writes
//! the results, with timestamped names, to a target directory.
//!
//! # Architecture
//! - `config`: source/target directories and encoding options, read from
//!   `chanshift.toml` (or the file named by `CHANSHIFT_CONFIG`)
//! - `channel_shift::BatchPipeline`: discovery, per-file tasks, summary
//! - Logging through `env_logger`, `RUST_LOG` overrides the default level

#[macro_use]
extern crate derivative;

pub mod config;

use anyhow::{Context, Result};
use channel_shift::BatchPipeline;

/// Installs `env_logger` for the binary.
///
/// Logs at `info` unless `RUST_LOG` says otherwise; `RUST_LOG=debug` adds the
/// per-file offsets. Lines read `[HH:MM:SS LEVEL file line] message`.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = cutil::time::local_now("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// Loads the configuration and processes the source directory once.
pub async fn run() -> Result<()> {
    let config = config::init()?;
    let pipeline = BatchPipeline::new(config.batch_config());
    let batch = pipeline.config();

    log::info!(
        "{} -> {} (quality {}, max concurrency {})",
        batch.source_dir.display(),
        batch.target_dir.display(),
        batch.quality,
        batch
            .max_concurrency
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );

    let summary = pipeline
        .run()
        .await
        .with_context(|| "process source directory failed")?;

    log::debug!("{summary:?}");
    Ok(())
}
