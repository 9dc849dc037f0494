use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::editor::SyncPolicy;
use crate::models::Role;

pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub role: Role,
    pub sync: SyncPolicy,
    /// Overrides `<data dir>/budgetline.db`.
    pub database: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::Operator,
            sync: SyncPolicy::Draft,
            database: None,
            log_level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

/// On-disk shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    role: Option<String>,
    sync: Option<String>,
    database: Option<PathBuf>,
    log_level: Option<String>,
}

impl Config {
    /// Read a config file. Unlike env overrides, a bad value here is an error.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(role) = file.role {
            config.role = Role::parse(&role).with_context(|| {
                let known: Vec<String> = Role::all()
                    .iter()
                    .map(|r| r.as_str().to_lowercase())
                    .collect();
                format!("unknown role '{role}' ({})", known.join(", "))
            })?;
        }
        if let Some(sync) = file.sync {
            config.sync = SyncPolicy::parse(&sync)
                .with_context(|| format!("unknown sync policy '{sync}' (draft, live)"))?;
        }
        config.database = file.database;
        if let Some(level) = file.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

/// `<config dir>/config.toml`, or defaults when the file does not exist.
/// Environment overrides are applied either way.
pub(crate) fn load_or_default(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    let config = if path.exists() {
        Config::load(&path)?
    } else {
        Config::default()
    };
    Ok(with_env_overrides(config))
}

/// Apply `BUDGETLINE_*` environment overrides.
pub(crate) fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(role) = var("BUDGETLINE_ROLE") {
        match Role::parse(&role) {
            Some(r) => config.role = r,
            None => warn!(value = %role, "ignoring unknown BUDGETLINE_ROLE"),
        }
    }

    if let Some(sync) = var("BUDGETLINE_SYNC") {
        match SyncPolicy::parse(&sync) {
            Some(s) => config.sync = s,
            None => warn!(value = %sync, "ignoring unknown BUDGETLINE_SYNC"),
        }
    }

    if let Some(db) = var("BUDGETLINE_DB").filter(|v| !v.trim().is_empty()) {
        config.database = Some(PathBuf::from(db));
    }

    if let Some(level) = var("BUDGETLINE_LOG").filter(|v| !v.trim().is_empty()) {
        config.log_level = level;
    }

    config
}
