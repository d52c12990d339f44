//! CLI command handlers.

use anyhow::{Context as _, Result, bail};
use clap::ValueEnum;
use console::{Style, style};
use dify_kb_client::{
    ClientConfig, DifyKbClient, IndexingTechnique, MetadataType, Permission, SearchMethod,
};
use dify_kb_config::{API_KEY_ENV, ConfigError};
use serde::Serialize;

pub mod chunks;
pub mod config;
pub mod datasets;
pub mod documents;
pub mod metadata;
pub mod retrieve;
pub mod segments;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Profile named on the command line.
    pub profile: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// API key override.
    pub api_key: Option<String>,
}

impl Context {
    /// Resolve connection settings from flags and config files.
    ///
    /// A base URL and key given as flags need no profile; timeouts still
    /// come from the selected profile or `[defaults]` when a config exists.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let loaded = dify_kb_config::load_config(None)?;
        for warning in &loaded.warnings {
            tracing::warn!("{}", warning);
        }

        if let (Some(url), Some(key)) = (&self.base_url, &self.api_key) {
            let mut config = ClientConfig::new(url, key);
            loaded
                .config
                .timeouts_for(self.profile.as_deref())
                .apply(&mut config);
            return Ok(config);
        }

        let env = |name: &str| {
            if name == API_KEY_ENV {
                self.api_key.clone()
            } else {
                std::env::var(name).ok()
            }
        };
        let mut config = match loaded.config.client_config_with(self.profile.as_deref(), env) {
            Ok(config) => config,
            Err(ConfigError::NoProfile) if self.base_url.is_some() => {
                bail!("no API key; pass --api-key or set {}", API_KEY_ENV)
            }
            Err(ConfigError::NoProfile) => {
                bail!("no profile configured; pass --base-url and --api-key or add a profile")
            }
            Err(e) => return Err(e.into()),
        };
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        tracing::debug!(base_url = %config.base_url, "resolved connection");
        Ok(config)
    }

    /// Build an API client.
    pub fn client(&self) -> Result<DifyKbClient> {
        let config = self.client_config()?;
        DifyKbClient::from_config(&config)
            .with_context(|| format!("cannot connect to {}", config.base_url))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output helpers
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_header(title: &str) {
    println!("{}", style(title).bold());
    println!("{}", Style::new().dim().apply_to("─".repeat(50)));
}

pub(crate) fn print_success(message: impl std::fmt::Display) {
    println!("{} {}", Style::new().green().apply_to("✓"), message);
}

pub(crate) fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<14}{}", format!("{}:", label), style(value).cyan());
}

pub(crate) fn print_empty(what: &str) {
    println!("{}", Style::new().dim().apply_to(format!("No {} found", what)));
}

pub(crate) fn print_page_footer(page: u32, total: u64, has_next: bool) {
    let dim = Style::new().dim();
    let more = if has_next { ", more available" } else { "" };
    println!();
    println!(
        "{}",
        dim.apply_to(format!("page {} · {} total{}", page, total, more))
    );
}

/// Single-line preview of `s`, at most `max_chars` characters.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", keep)
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared argument values
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IndexingArg {
    HighQuality,
    Economy,
}

impl From<IndexingArg> for IndexingTechnique {
    fn from(arg: IndexingArg) -> Self {
        match arg {
            IndexingArg::HighQuality => IndexingTechnique::HighQuality,
            IndexingArg::Economy => IndexingTechnique::Economy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PermissionArg {
    OnlyMe,
    AllTeamMembers,
    PartialMembers,
}

impl From<PermissionArg> for Permission {
    fn from(arg: PermissionArg) -> Self {
        match arg {
            PermissionArg::OnlyMe => Permission::OnlyMe,
            PermissionArg::AllTeamMembers => Permission::AllTeamMembers,
            PermissionArg::PartialMembers => Permission::PartialMembers,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SearchArg {
    Keyword,
    Semantic,
    FullText,
    Hybrid,
}

impl From<SearchArg> for SearchMethod {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Keyword => SearchMethod::KeywordSearch,
            SearchArg::Semantic => SearchMethod::SemanticSearch,
            SearchArg::FullText => SearchMethod::FullTextSearch,
            SearchArg::Hybrid => SearchMethod::HybridSearch,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetadataTypeArg {
    String,
    Number,
    Time,
}

impl From<MetadataTypeArg> for MetadataType {
    fn from(arg: MetadataTypeArg) -> Self {
        match arg {
            MetadataTypeArg::String => MetadataType::String,
            MetadataTypeArg::Number => MetadataType::Number,
            MetadataTypeArg::Time => MetadataType::Time,
        }
    }
}
