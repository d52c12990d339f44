//! Configuration for the `dify-kb` tool.
//!
//! Provides TOML-based connection profiles with:
//! - Named profiles (`[[profiles]]`) and a `current-profile` selection
//! - Shared timeout defaults (`[defaults]`)
//! - File layering (user config dir + project-local `dify-kb.toml`)
//! - API key resolution (`DIFY_KB_API_KEY` → `api-key-env` → `api-key`)

pub mod discovery;
pub mod error;
pub mod profile;

pub use discovery::{
    config_dir, config_path, load_config, load_config_file, load_config_with_options,
    save_config, ConfigSource, LoadedConfig, CONFIG_DIR_ENV,
};
pub use error::{ConfigError, Result};
pub use profile::{KbConfig, Profile, Timeouts, API_KEY_ENV};
