//! Config file discovery and layering.
//!
//! Layers, lowest precedence first:
//! 1. `<config dir>/config.toml`, where the directory is `DIFY_KB_CONFIG_DIR`
//!    or the platform config dir joined with `dify-kb`
//! 2. `./dify-kb.toml` in the project directory
//!
//! Command-line flags sit above both and are applied by the caller.

use std::path::{Path, PathBuf};

use crate::{ConfigError, KbConfig, Result};

const USER_CONFIG_FILE: &str = "config.toml";
const PROJECT_CONFIG_FILE: &str = "dify-kb.toml";
const APP_NAME: &str = "dify-kb";

/// Overrides the user config directory.
pub const CONFIG_DIR_ENV: &str = "DIFY_KB_CONFIG_DIR";

/// One file that was considered during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub loaded: bool,
}

/// Merged configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: KbConfig,
    /// Checked files, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Non-fatal problems: unreadable layers, keys stored in plaintext.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the layers that were actually read.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Discover and merge config layers using the default user directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Discover and merge config layers.
///
/// `config_dir` replaces both `DIFY_KB_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut config = KbConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    let user_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => config_path(),
    };
    if let Some(path) = user_path {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path, &mut warnings));

    for profile in config.profiles.iter().filter(|p| p.has_plaintext_api_key()) {
        warnings.push(format!(
            "profile '{}' stores its API key in plaintext; prefer api-key-env",
            profile.name
        ));
    }

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Read a single config file.
pub fn load_config_file(path: &Path) -> Result<KbConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    KbConfig::from_toml(&contents)
}

/// Write a config file, creating parent directories.
pub fn save_config(config: &KbConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })
}

/// User config file path.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// User config directory: `DIFY_KB_CONFIG_DIR`, else `<platform config>/dify-kb`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn load_layer(config: &mut KbConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    let mut source = ConfigSource {
        path: path.to_path_buf(),
        loaded: false,
    };
    if !path.is_file() {
        return source;
    }

    match load_config_file(path) {
        Ok(layer) => {
            tracing::debug!(path = %path.display(), "loaded config layer");
            config.merge(layer);
            source.loaded = true;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping config layer");
            warnings.push(format!("failed to load {}: {}", path.display(), e));
        }
    }
    source
}
