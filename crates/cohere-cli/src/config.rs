use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cohere_core::AuditorConfig;
use serde::Deserialize;

/// Contents of an optional TOML config file.
///
/// ```toml
/// mass = 80.0
/// vacuum_index = -1.0
/// history_capacity = 256
/// seed = 42
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub auditor: AuditorConfig,
    pub seed: Option<u64>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        let cfg: FileConfig = toml::from_str(content).context("failed to parse config")?;
        cfg.auditor
            .validate()
            .context("invalid session parameters")?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// `--config` wins over `COHERE_CONFIG`; neither means defaults.
pub fn resolve(flag: Option<&Path>) -> Result<FileConfig> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("COHERE_CONFIG").ok().map(PathBuf::from));
    match path {
        Some(p) => {
            tracing::debug!("loading config from {}", p.display());
            FileConfig::load(&p)
        }
        None => Ok(FileConfig::default()),
    }
}
