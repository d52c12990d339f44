//! dify-kb - command-line access to Dify knowledge bases.

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::Style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{chunks, config, datasets, documents, metadata, retrieve, segments};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// dify-kb - manage Dify knowledge bases from the terminal
#[derive(Parser)]
#[command(name = "dify-kb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config profile to use (default: current-profile)
    #[arg(long, global = true, env = "DIFY_KB_PROFILE")]
    pub profile: Option<String>,

    /// API base URL, e.g. https://api.dify.ai/v1 (overrides the profile's;
    /// timeouts still come from the config)
    #[arg(long, global = true, env = "DIFY_KB_BASE_URL")]
    pub base_url: Option<String>,

    /// Dataset API key
    #[arg(long, global = true, env = "DIFY_KB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dataset (knowledge base) management
    Datasets(datasets::DatasetsArgs),

    /// Document management
    Documents(documents::DocumentsArgs),

    /// Segment management
    Segments(segments::SegmentsArgs),

    /// Child chunk management
    Chunks(chunks::ChunksArgs),

    /// Metadata fields and values
    Metadata(metadata::MetadataArgs),

    /// Search a dataset
    Retrieve(retrieve::RetrieveArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "dify_kb=debug,dify_kb_client=debug,dify_kb_config=debug,info"
    } else {
        "dify_kb=info,dify_kb_client=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(cli.verbose)
        .init();

    if let Err(e) = run(cli).await {
        let red = Style::new().red();
        eprintln!("{} {:#}", red.apply_to("Error:"), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        profile: cli.profile,
        base_url: cli.base_url,
        api_key: cli.api_key,
    };

    match cli.command {
        Commands::Datasets(args) => datasets::run(args, &ctx).await,
        Commands::Documents(args) => documents::run(args, &ctx).await,
        Commands::Segments(args) => segments::run(args, &ctx).await,
        Commands::Chunks(args) => chunks::run(args, &ctx).await,
        Commands::Metadata(args) => metadata::run(args, &ctx).await,
        Commands::Retrieve(args) => retrieve::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
