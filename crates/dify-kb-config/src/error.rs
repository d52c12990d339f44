//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Profile not found.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// No profile selected and none given.
    #[error("no profile selected; set current-profile or pass --profile")]
    NoProfile,

    /// API key not found through any resolution method.
    #[error("API key not found for profile '{profile}' (checked {env_var} and api-key)")]
    ApiKeyNotFound { profile: String, env_var: String },
}
