//! Config command - profiles and config files.

use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use clap::{Args, Subcommand};
use console::{Style, style};
use dify_kb_config::{API_KEY_ENV, KbConfig, Profile};

use super::{Context, print_empty, print_header, print_json, print_success};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration and where it came from
    Show,

    /// List profiles
    Profiles,

    /// Show the user config file path
    Path,

    /// Switch the current profile
    Use {
        /// Profile name
        name: String,
    },

    /// Create or update a profile in the user config
    SetProfile {
        /// Profile name
        name: String,

        /// API base URL, e.g. https://api.dify.ai/v1
        #[arg(long)]
        url: String,

        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,
    },

    /// Delete a profile from the user config
    DeleteProfile {
        /// Profile name
        name: String,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Profiles => cmd_profiles(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Use { name } => edit_user_config(|config| {
            config.use_profile(&name)?;
            Ok(format!("Switched to profile '{}'", name))
        }),
        ConfigCommand::SetProfile {
            name,
            url,
            api_key_env,
        } => edit_user_config(|config| {
            let mut profile = match config.profile(&name) {
                Some(existing) => existing.clone(),
                None => Profile::new(&name, &url),
            };
            profile.base_url = url;
            if let Some(var) = api_key_env {
                profile.api_key_env = Some(var);
            }
            config.set_profile(profile);
            if config.current_profile.is_none() {
                config.current_profile = Some(name.clone());
            }
            Ok(format!("Profile '{}' saved", name))
        }),
        ConfigCommand::DeleteProfile { name } => edit_user_config(|config| {
            config
                .remove_profile(&name)
                .ok_or_else(|| anyhow!("profile '{}' not found", name))?;
            Ok(format!("Profile '{}' deleted", name))
        }),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = dify_kb_config::load_config(None)?;
    if ctx.json_output {
        return print_json(&loaded.config);
    }

    let dim = Style::new().dim();
    print_header("dify-kb Configuration");

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("{}", dim.apply_to("No config files loaded"));
    } else {
        println!("Config files (lowest precedence first):");
        for source in &sources {
            println!("  {}", source.display());
        }
    }
    for warning in &loaded.warnings {
        println!("{} {}", Style::new().yellow().apply_to("warning:"), warning);
    }
    println!();
    println!("{}", loaded.config.to_toml()?);
    Ok(())
}

fn cmd_profiles(ctx: &Context) -> Result<()> {
    let loaded = dify_kb_config::load_config(None)?;
    let config = &loaded.config;
    let selected = ctx
        .profile
        .as_deref()
        .or(config.current_profile.as_deref());

    if ctx.json_output {
        let profiles: Vec<_> = config
            .profiles
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "base_url": p.base_url,
                    "current": Some(p.name.as_str()) == selected,
                })
            })
            .collect();
        return print_json(&profiles);
    }

    print_header("Profiles");
    if config.profiles.is_empty() {
        print_empty("profiles");
        return Ok(());
    }
    let dim = Style::new().dim();
    for profile in &config.profiles {
        let marker = if Some(profile.name.as_str()) == selected {
            style("*").green()
        } else {
            style(" ")
        };
        println!(
            "{} {:<16} {}  {}",
            marker,
            profile.name,
            profile.base_url,
            dim.apply_to(key_source(profile))
        );
    }
    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = user_config_path()?;
    if ctx.json_output {
        return print_json(&serde_json::json!({
            "path": path,
            "exists": path.is_file(),
        }));
    }
    println!("{}", path.display());
    Ok(())
}

/// Where a profile's key comes from.
fn key_source(profile: &Profile) -> String {
    if std::env::var(API_KEY_ENV).is_ok_and(|v| !v.is_empty()) {
        return format!("key from {}", API_KEY_ENV);
    }
    match (&profile.api_key_env, profile.has_plaintext_api_key()) {
        (Some(var), _) => format!("key from {}", var),
        (None, true) => "inline key".to_string(),
        (None, false) => "no key".to_string(),
    }
}

fn user_config_path() -> Result<PathBuf> {
    dify_kb_config::config_path().ok_or_else(|| anyhow!("cannot determine config directory"))
}

/// Load the user config file alone, apply `edit`, and save it back.
///
/// Project-local layers are never written.
fn edit_user_config<F>(edit: F) -> Result<()>
where
    F: FnOnce(&mut KbConfig) -> Result<String>,
{
    let path = user_config_path()?;
    if path.exists() && !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    let mut config = if path.is_file() {
        dify_kb_config::load_config_file(&path)?
    } else {
        KbConfig::new()
    };

    let message = edit(&mut config)?;
    dify_kb_config::save_config(&config, &path)?;
    tracing::debug!(path = %path.display(), "saved config");
    print_success(message);
    Ok(())
}
