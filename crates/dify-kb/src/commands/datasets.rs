//! Datasets command - knowledge base management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use dify_kb_client::{CreateDatasetRequest, Dataset};

use super::{
    Context, IndexingArg, PermissionArg, print_empty, print_field, print_header, print_json,
    print_page_footer, print_success, truncate,
};

/// Arguments for the datasets command.
#[derive(Args, Debug)]
pub struct DatasetsArgs {
    #[command(subcommand)]
    pub command: DatasetsCommand,
}

#[derive(Subcommand, Debug)]
pub enum DatasetsCommand {
    /// List datasets
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Datasets per page
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Create an empty dataset
    Create {
        /// Dataset name
        name: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Indexing technique
        #[arg(long, value_enum)]
        indexing: Option<IndexingArg>,

        /// Who can see the dataset
        #[arg(long, value_enum)]
        permission: Option<PermissionArg>,
    },

    /// Show dataset details
    Show {
        /// Dataset ID
        id: String,
    },

    /// Delete a dataset
    Delete {
        /// Dataset ID
        id: String,
    },
}

/// Run the datasets command.
pub async fn run(args: DatasetsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let api = client.datasets();

    match args.command {
        DatasetsCommand::List { page, limit } => {
            let result = api.list(page, limit).await?;
            if ctx.json_output {
                return print_json(&result);
            }

            print_header("Datasets");
            if result.data.is_empty() {
                print_empty("datasets");
            }
            let dim = Style::new().dim();
            for dataset in &result.data {
                println!(
                    "{}  {}  {}",
                    dim.apply_to(&dataset.id),
                    style(truncate(&dataset.name, 40)).bold(),
                    dim.apply_to(format!("{} docs", dataset.document_count))
                );
            }
            print_page_footer(
                result.pagination.page,
                result.pagination.total,
                result.pagination.has_next(),
            );
        }
        DatasetsCommand::Create {
            name,
            description,
            indexing,
            permission,
        } => {
            let mut request = CreateDatasetRequest::new(name);
            if let Some(description) = description {
                request = request.with_description(description);
            }
            if let Some(indexing) = indexing {
                request = request.with_indexing_technique(indexing.into());
            }
            if let Some(permission) = permission {
                request = request.with_permission(permission.into());
            }

            let dataset = api.create(request).await?;
            if ctx.json_output {
                return print_json(&dataset);
            }
            print_success(format!(
                "Dataset created: {}",
                Style::new().dim().apply_to(&dataset.id)
            ));
        }
        DatasetsCommand::Show { id } => {
            let dataset = api.get(&id).await?;
            if ctx.json_output {
                return print_json(&dataset);
            }
            show_dataset(&dataset);
        }
        DatasetsCommand::Delete { id } => {
            api.delete(&id).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            print_success(format!("Dataset deleted: {}", id));
        }
    }

    Ok(())
}

fn show_dataset(dataset: &Dataset) {
    let unset = || "-".to_string();
    print_header(&dataset.name);
    print_field("ID", &dataset.id);
    print_field(
        "Description",
        dataset.description.clone().unwrap_or_else(unset),
    );
    print_field(
        "Indexing",
        dataset.indexing_technique.clone().unwrap_or_else(unset),
    );
    print_field("Permission", dataset.permission.clone().unwrap_or_else(unset));
    print_field("Documents", dataset.document_count);
    print_field("Words", dataset.word_count);
    print_field("Apps", dataset.app_count);
}
