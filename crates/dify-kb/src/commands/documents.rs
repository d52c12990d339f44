//! Documents command - add, inspect and remove documents.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use dify_kb_client::{
    DifyKbClient, DocumentContent, DocumentResponse, DocumentSettings, IndexingStatus,
    ListDocumentsQuery, PollPolicy, RetrievalModel,
};

use super::{
    Context, IndexingArg, SearchArg, print_empty, print_header, print_json, print_page_footer,
    print_success, truncate,
};

/// Arguments for the documents command.
#[derive(Args, Debug)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    pub command: DocumentsCommand,
}

#[derive(Subcommand, Debug)]
pub enum DocumentsCommand {
    /// List documents in a dataset
    List {
        /// Dataset ID
        dataset: String,

        /// Filter by name
        #[arg(short, long)]
        keyword: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Documents per page
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Create a document from text
    AddText {
        /// Dataset ID
        dataset: String,

        /// Document name
        name: String,

        /// Document text
        text: String,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Create a document by uploading a file
    AddFile {
        /// Dataset ID
        dataset: String,

        /// File to upload
        path: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Show indexing progress of a batch
    Status {
        /// Dataset ID
        dataset: String,

        /// Batch ID returned on creation
        batch: String,
    },

    /// Delete a document
    Delete {
        /// Dataset ID
        dataset: String,

        /// Document ID
        document: String,
    },
}

/// Indexing options for new documents.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Document language
    #[arg(long, default_value = "English")]
    pub language: String,

    /// Indexing technique
    #[arg(long, value_enum)]
    pub indexing: Option<IndexingArg>,

    /// Search method used for retrieval
    #[arg(long, value_enum, default_value = "semantic")]
    pub search_method: SearchArg,

    /// Results returned per query
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Wait until indexing finishes
    #[arg(long)]
    pub wait: bool,

    /// Seconds to wait before giving up
    #[arg(long, default_value = "60")]
    pub wait_timeout: u64,
}

impl SettingsArgs {
    fn to_settings(&self) -> DocumentSettings {
        let mut model = RetrievalModel::new(self.search_method.into());
        if let Some(top_k) = self.top_k {
            model = model.with_top_k(top_k);
        }
        let mut settings = DocumentSettings::new(&self.language, model);
        if let Some(indexing) = self.indexing {
            settings = settings.with_indexing_technique(indexing.into());
        }
        settings
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            timeout: Duration::from_secs(self.wait_timeout),
            ..PollPolicy::default()
        }
    }
}

/// Run the documents command.
pub async fn run(args: DocumentsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.command {
        DocumentsCommand::List {
            dataset,
            keyword,
            page,
            limit,
        } => cmd_list(&client, &dataset, ListDocumentsQuery { keyword, page, limit }, ctx).await,
        DocumentsCommand::AddText {
            dataset,
            name,
            text,
            settings,
        } => {
            let created = client
                .documents()
                .create_by_text(&dataset, &name, &text, &settings.to_settings())
                .await?;
            finish_create(&client, &dataset, created, &settings, ctx).await
        }
        DocumentsCommand::AddFile {
            dataset,
            path,
            settings,
        } => {
            let content = DocumentContent::from_path(&path).await?;
            let created = client
                .documents()
                .create_by_file(&dataset, content, &settings.to_settings())
                .await?;
            finish_create(&client, &dataset, created, &settings, ctx).await
        }
        DocumentsCommand::Status { dataset, batch } => {
            let statuses = client.documents().indexing_status(&dataset, &batch).await?;
            if ctx.json_output {
                return print_json(&statuses);
            }
            print_header("Indexing Status");
            print_statuses(&statuses);
            Ok(())
        }
        DocumentsCommand::Delete { dataset, document } => {
            client.documents().delete(&dataset, &document).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": document }));
            }
            print_success(format!("Document deleted: {}", document));
            Ok(())
        }
    }
}

async fn cmd_list(
    client: &DifyKbClient,
    dataset: &str,
    query: ListDocumentsQuery,
    ctx: &Context,
) -> Result<()> {
    let result = client.documents().list(dataset, query).await?;
    if ctx.json_output {
        return print_json(&result);
    }

    print_header("Documents");
    if result.data.is_empty() {
        print_empty("documents");
    }
    let dim = Style::new().dim();
    for document in &result.data {
        println!(
            "{}  {}  {}",
            dim.apply_to(&document.id),
            style(truncate(&document.name, 40)).bold(),
            dim.apply_to(document.indexing_status.as_deref().unwrap_or("-"))
        );
    }
    print_page_footer(
        result.pagination.page,
        result.pagination.total,
        result.pagination.has_next(),
    );
    Ok(())
}

async fn finish_create(
    client: &DifyKbClient,
    dataset: &str,
    created: DocumentResponse,
    settings: &SettingsArgs,
    ctx: &Context,
) -> Result<()> {
    let statuses = if settings.wait {
        if ctx.verbose && !ctx.json_output {
            let dim = Style::new().dim();
            println!("{}", dim.apply_to(format!("Waiting for batch {}", created.batch)));
        }
        Some(
            client
                .documents()
                .wait_for_indexing(dataset, &created.batch, settings.poll_policy())
                .await?,
        )
    } else {
        None
    };

    if ctx.json_output {
        return print_json(&serde_json::json!({
            "document": created.document,
            "batch": created.batch,
            "indexing": statuses,
        }));
    }

    let dim = Style::new().dim();
    print_success(format!(
        "Document created: {}",
        dim.apply_to(&created.document.id)
    ));
    println!("  batch {}", dim.apply_to(&created.batch));
    if let Some(statuses) = statuses {
        print_statuses(&statuses);
    }
    Ok(())
}

fn print_statuses(statuses: &[IndexingStatus]) {
    if statuses.is_empty() {
        print_empty("documents in batch");
        return;
    }
    for status in statuses {
        let state = match status.indexing_status.as_str() {
            "completed" => Style::new().green().apply_to(&status.indexing_status),
            "error" => Style::new().red().apply_to(&status.indexing_status),
            _ => Style::new().yellow().apply_to(&status.indexing_status),
        };
        let progress = match (status.completed_segments, status.total_segments) {
            (Some(done), Some(total)) => format!("{}/{} segments", done, total),
            _ => String::new(),
        };
        println!(
            "  {}  {}  {}",
            Style::new().dim().apply_to(&status.id),
            state,
            progress
        );
        if let Some(error) = &status.error {
            println!("    {}", Style::new().red().apply_to(error));
        }
    }
}
