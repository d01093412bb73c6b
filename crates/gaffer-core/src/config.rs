// Configuration loading and validation (gaffer.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "gaffer.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub squad: SquadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Manager entry whose squad is re-arranged. Without one the optimizer
    /// builds a wildcard squad from scratch.
    #[serde(default)]
    pub entry_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Read JSON snapshots from this directory instead of the network.
    #[serde(default)]
    pub offline_dir: Option<String>,
    /// Prior-season player table (`.csv` or bootstrap `.json`).
    #[serde(default)]
    pub history_path: Option<String>,
}

/// Tunables for the expected-points estimator.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Weight of expected goals/assists against actual goals/assists.
    pub xg_weight: f64,
    /// Share of the prior-season estimate in the final blend.
    pub history_weight: f64,
    /// Number of recent finished gameweeks in the form sample.
    pub form_window: usize,
    /// Gameweeks summed into the optimizer objective.
    pub horizon: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            xg_weight: 0.5,
            history_weight: 0.15,
            form_window: 5,
            horizon: 1,
        }
    }
}

/// Squad rules for the optimizer.
#[derive(Debug, Clone, Deserialize)]
pub struct SquadConfig {
    /// Budget ceiling in tenths of a million (1000 = 100.0m).
    pub budget: u32,
    pub max_per_team: u32,
}

impl Default for SquadConfig {
    fn default() -> Self {
        SquadConfig {
            budget: 1000,
            max_per_team: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/gaffer.toml` relative to `base_dir`.
///
/// This does not copy defaults. Prefer `load_config()`, which does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Parse a config document without touching the filesystem.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Seed `config/gaffer.toml` from `defaults/` when it is missing. Returns the
/// path written, or `None` when a config file was already in place.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    let copy_error = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_error)?;
    }
    std::fs::copy(&source, &target).map_err(copy_error)?;
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(invalid("api.base_url", "must not be empty".into()));
    }
    if config.api.timeout_secs == 0 {
        return Err(invalid("api.timeout_secs", "must be greater than 0".into()));
    }

    let model = &config.model;
    let unit_fields: &[(&str, f64)] = &[
        ("model.xg_weight", model.xg_weight),
        ("model.history_weight", model.history_weight),
    ];
    for (name, val) in unit_fields {
        if !(0.0..=1.0).contains(val) {
            return Err(invalid(
                name,
                format!("must be between 0.0 and 1.0 inclusive, got {val}"),
            ));
        }
    }
    if !(1..=5).contains(&model.form_window) {
        return Err(invalid(
            "model.form_window",
            format!("must be between 1 and 5, got {}", model.form_window),
        ));
    }
    if model.horizon == 0 {
        return Err(invalid("model.horizon", "must be > 0".into()));
    }

    if config.squad.budget == 0 {
        return Err(invalid("squad.budget", "must be > 0".into()));
    }
    if config.squad.max_per_team == 0 {
        return Err(invalid("squad.max_per_team", "must be > 0".into()));
    }

    Ok(())
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
