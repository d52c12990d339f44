//! Connection profiles.
//!
//! A config file holds named profiles (base URL + key bundle) and a selected
//! `current-profile`:
//!
//! ```toml
//! current-profile = "cloud"
//!
//! [defaults]
//! read-timeout-ms = 60000
//!
//! [[profiles]]
//! name = "cloud"
//! base-url = "https://api.dify.ai/v1"
//! api-key-env = "DIFY_CLOUD_KEY"
//! ```

use dify_kb_client::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Environment variable that overrides every profile's API key.
pub const API_KEY_ENV: &str = "DIFY_KB_API_KEY";

// ─────────────────────────────────────────────────────────────────────────────
// Root config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KbConfig {
    /// Name of the selected profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_profile: Option<String>,

    /// Timeouts applied to profiles that don't set their own.
    #[serde(default)]
    pub defaults: Timeouts,

    /// Named profiles.
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl KbConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Layer `other` on top of `self`.
    ///
    /// Same-named profiles are replaced, new ones appended; a set
    /// `current-profile` and set default timeouts win.
    pub fn merge(&mut self, other: KbConfig) {
        if other.current_profile.is_some() {
            self.current_profile = other.current_profile;
        }
        self.defaults.merge(other.defaults);
        for profile in other.profiles {
            self.set_profile(profile);
        }
    }

    /// Get the current profile, if set and valid.
    pub fn current(&self) -> Option<&Profile> {
        self.current_profile
            .as_ref()
            .and_then(|name| self.profile(name))
    }

    /// Get a profile by name.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Add or replace a profile.
    pub fn set_profile(&mut self, profile: Profile) {
        if let Some(existing) = self.profiles.iter_mut().find(|p| p.name == profile.name) {
            *existing = profile;
        } else {
            self.profiles.push(profile);
        }
    }

    /// Remove a profile by name.
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        let pos = self.profiles.iter().position(|p| p.name == name)?;
        if self.current_profile.as_deref() == Some(name) {
            self.current_profile = None;
        }
        Some(self.profiles.remove(pos))
    }

    /// Select the current profile.
    ///
    /// Returns an error if the profile doesn't exist.
    pub fn use_profile(&mut self, name: &str) -> Result<()> {
        if self.profile(name).is_some() {
            self.current_profile = Some(name.to_string());
            Ok(())
        } else {
            Err(ConfigError::ProfileNotFound(name.to_string()))
        }
    }

    /// List all profile names.
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Pick `name`, or the current profile when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<&Profile> {
        let name = match name.or(self.current_profile.as_deref()) {
            Some(name) => name,
            None => return Err(ConfigError::NoProfile),
        };
        self.profile(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Build client settings for a profile, reading keys from the process environment.
    pub fn client_config(&self, name: Option<&str>) -> Result<ClientConfig> {
        self.client_config_with(name, |var| std::env::var(var).ok())
    }

    /// Build client settings for a profile with an explicit environment lookup.
    pub fn client_config_with<F>(&self, name: Option<&str>, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = self.select(name)?;
        let api_key = profile.resolve_api_key_with(&env)?;

        let mut config = ClientConfig::new(&profile.base_url, api_key);
        profile.timeouts.or(&self.defaults).apply(&mut config);
        Ok(config)
    }

    /// Timeouts for a profile, falling back to `[defaults]`.
    ///
    /// When no profile is selected, or the named one does not exist, only
    /// `[defaults]` apply.
    pub fn timeouts_for(&self, name: Option<&str>) -> Timeouts {
        match self.select(name) {
            Ok(profile) => profile.timeouts.or(&self.defaults),
            Err(_) => self.defaults.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

/// A named connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Profile {
    /// Unique name.
    pub name: String,

    /// API root, including the version prefix.
    pub base_url: String,

    /// Inline API key (discouraged).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Timeout overrides.
    #[serde(flatten)]
    pub timeouts: Timeouts,
}

impl Profile {
    /// Create a profile with just a name and base URL.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: None,
            api_key_env: None,
            timeouts: Timeouts::default(),
        }
    }

    /// Set an inline API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Read the API key from an environment variable.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Whether the profile stores its key in the file.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Resolve the API key: `DIFY_KB_API_KEY`, then `api-key-env`, then `api-key`.
    pub fn resolve_api_key_with<F>(&self, env: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(key) = non_empty(env(API_KEY_ENV)) {
            return Ok(key);
        }
        if let Some(var) = &self.api_key_env {
            if let Some(key) = non_empty(env(var)) {
                return Ok(key);
            }
        }
        if let Some(key) = non_empty(self.api_key.clone()) {
            return Ok(key);
        }
        Err(ConfigError::ApiKeyNotFound {
            profile: self.name.clone(),
            env_var: self
                .api_key_env
                .clone()
                .unwrap_or_else(|| API_KEY_ENV.to_string()),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timeouts
// ─────────────────────────────────────────────────────────────────────────────

/// Optional timeout settings in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Timeouts {
    /// Connect timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
    /// Read timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,
    /// Write timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_timeout_ms: Option<u64>,
}

impl Timeouts {
    fn merge(&mut self, other: Timeouts) {
        if other.connect_timeout_ms.is_some() {
            self.connect_timeout_ms = other.connect_timeout_ms;
        }
        if other.read_timeout_ms.is_some() {
            self.read_timeout_ms = other.read_timeout_ms;
        }
        if other.write_timeout_ms.is_some() {
            self.write_timeout_ms = other.write_timeout_ms;
        }
    }

    /// Overwrite the matching fields of `config` with every value set here.
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(ms) = self.connect_timeout_ms {
            config.connect_timeout_ms = ms;
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout_ms = ms;
        }
        if let Some(ms) = self.write_timeout_ms {
            config.write_timeout_ms = ms;
        }
    }

    /// Fill unset fields from `fallback`.
    fn or(&self, fallback: &Timeouts) -> Timeouts {
        Timeouts {
            connect_timeout_ms: self.connect_timeout_ms.or(fallback.connect_timeout_ms),
            read_timeout_ms: self.read_timeout_ms.or(fallback.read_timeout_ms),
            write_timeout_ms: self.write_timeout_ms.or(fallback.write_timeout_ms),
        }
    }
}
