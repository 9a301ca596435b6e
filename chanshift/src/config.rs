//! Application configuration.
//!
//! Read once at start-up from `chanshift.toml` in the working directory, or
//! from the file named by the `CHANSHIFT_CONFIG` environment variable. A
//! missing file means the defaults are used. The file is never written.

use anyhow::{Context, Result, bail};
use channel_shift::{
    BatchConfig,
    batch::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV: &str = "CHANSHIFT_CONFIG";
pub const CONFIG_FILE: &str = "chanshift.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[derivative(Default(value = "PathBuf::from(\"src\")"))]
    pub source_dir: PathBuf,

    #[derivative(Default(value = "PathBuf::from(\"tmp\")"))]
    pub target_dir: PathBuf,

    #[derivative(Default(value = "DEFAULT_QUALITY"))]
    pub quality: u8,

    pub max_concurrency: Option<usize>,
}

impl Config {
    /// Loads the configuration file at `path`, falling back to defaults when
    /// it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = match fs::read_to_string(path) {
            Ok(text) => toml::from_str::<Config>(&text)
                .with_context(|| format!("parse config file {} failed", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not found, use default config", path.display());
                Config::default()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read config file {} failed", path.display()));
            }
        };

        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            bail!(
                "quality must be within {MIN_QUALITY}-{MAX_QUALITY}, got {}",
                self.quality
            );
        }

        if self.max_concurrency == Some(0) {
            bail!("max_concurrency must be greater than 0");
        }

        Ok(())
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(&self.source_dir, &self.target_dir)
            .with_quality(self.quality)
            .with_max_concurrency(self.max_concurrency)
    }
}

/// Path of the configuration file to read.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

pub fn init() -> Result<Config> {
    let path = config_path();
    let config = Config::load(&path).with_context(|| "load config file failed")?;
    debug!("{:?}", config);
    Ok(config)
}
