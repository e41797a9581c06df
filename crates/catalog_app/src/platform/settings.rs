//! Engine configuration stored as RON.

use std::fs;
use std::path::{Path, PathBuf};

use catalog_engine::EngineConfig;
use engine_logging::{engine_info, engine_warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

pub fn read_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Config from `path`, or the defaults when none is given or it is unusable.
pub fn load_config(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    match read_config(path) {
        Ok(config) => {
            engine_info!("Loaded engine config from {:?}", path);
            config
        }
        Err(err) => {
            engine_warn!("{}; using defaults", err);
            EngineConfig::default()
        }
    }
}

pub fn render_config(config: &EngineConfig) -> Result<String, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    Ok(ron::ser::to_string_pretty(config, pretty)?)
}
