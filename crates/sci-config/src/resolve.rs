//! Config resolution: CLI flag → `SCI_CONFIG` → user config dir → built-in.
//!
//! The first candidate that names a path wins. An explicitly named file
//! (flag or environment variable) must exist; the user config dir file is
//! optional and silently skipped when absent.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::solver_config::SolverConfig;
use crate::validate::{validate_config, ValidationError, ValidationResult};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SCI_CONFIG";

/// Directory under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "scientific";

pub const CONFIG_FILE_NAME: &str = "solvers.json";

/// Where the active settings came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Flag(PathBuf),
    Environment(PathBuf),
    UserConfigDir(PathBuf),
    BuiltIn,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(p) | ConfigSource::Environment(p) | ConfigSource::UserConfigDir(p) => {
                Some(p.as_path())
            }
            ConfigSource::BuiltIn => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Flag(p) => write!(f, "--config {}", p.display()),
            ConfigSource::Environment(p) => write!(f, "{CONFIG_ENV_VAR}={}", p.display()),
            ConfigSource::UserConfigDir(p) => write!(f, "{}", p.display()),
            ConfigSource::BuiltIn => write!(f, "built-in defaults"),
        }
    }
}

/// Candidate locations, gathered before any file is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    pub flag: Option<PathBuf>,
    pub env: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Collect candidates from the flag, the process environment, and the
    /// platform config directory.
    pub fn discover(flag: Option<&Path>) -> Self {
        let env = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            flag: flag.map(Path::to_path_buf),
            env,
            user_dir: user_config_path(),
        }
    }
}

/// `<config dir>/scientific/solvers.json`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// A validated config plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: SolverConfig,
    pub source: ConfigSource,
}

/// Resolve settings for this process.
pub fn resolve_config(flag: Option<&Path>) -> ValidationResult<ResolvedConfig> {
    resolve_from(&ConfigPaths::discover(flag))
}

/// Resolve settings from explicit candidates.
pub fn resolve_from(paths: &ConfigPaths) -> ValidationResult<ResolvedConfig> {
    let source = if let Some(p) = &paths.flag {
        ConfigSource::Flag(p.clone())
    } else if let Some(p) = &paths.env {
        ConfigSource::Environment(p.clone())
    } else {
        match &paths.user_dir {
            Some(p) if p.is_file() => ConfigSource::UserConfigDir(p.clone()),
            Some(p) => {
                debug!(path = %p.display(), "no user config file, using built-in defaults");
                ConfigSource::BuiltIn
            }
            None => ConfigSource::BuiltIn,
        }
    };

    let config = match source.path() {
        Some(path) => {
            if !path.exists() {
                return Err(ValidationError::IoError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            SolverConfig::from_file(path)?
        }
        None => SolverConfig::default(),
    };

    validate_config(&config)?;
    debug!(source = %source, "resolved solver config");
    Ok(ResolvedConfig { config, source })
}
