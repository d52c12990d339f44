//! Metadata command - field definitions and document values.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand, ValueEnum};
use console::{Style, style};
use dify_kb_client::{DocumentMetadataUpdate, MetadataValue};

use super::{Context, MetadataTypeArg, print_empty, print_header, print_json, print_success};

/// Arguments for the metadata command.
#[derive(Args, Debug)]
pub struct MetadataArgs {
    #[command(subcommand)]
    pub command: MetadataCommand,
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommand {
    /// List metadata fields of a dataset
    List {
        /// Dataset ID
        dataset: String,
    },

    /// Define a metadata field
    Create {
        /// Dataset ID
        dataset: String,

        /// Field name
        name: String,

        /// Value type
        #[arg(short = 't', long = "type", value_enum, default_value = "string")]
        metadata_type: MetadataTypeArg,
    },

    /// Rename a metadata field
    Rename {
        /// Dataset ID
        dataset: String,

        /// Metadata field ID
        id: String,

        /// New name
        name: String,
    },

    /// Remove a metadata field
    Delete {
        /// Dataset ID
        dataset: String,

        /// Metadata field ID
        id: String,
    },

    /// Assign metadata values to a document
    Assign {
        /// Dataset ID
        dataset: String,

        /// Document ID
        document: String,

        /// Values as ID:NAME=VALUE
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Turn built-in fields on or off
    BuiltIn {
        /// Dataset ID
        dataset: String,

        /// Desired state
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    Enable,
    Disable,
}

/// Run the metadata command.
pub async fn run(args: MetadataArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let api = client.metadata();
    let dim = Style::new().dim();

    match args.command {
        MetadataCommand::List { dataset } => {
            let list = api.list(&dataset).await?;
            if ctx.json_output {
                return print_json(&list);
            }

            print_header("Metadata Fields");
            if list.doc_metadata.is_empty() {
                print_empty("metadata fields");
            }
            for field in &list.doc_metadata {
                println!(
                    "{}  {}  {}",
                    dim.apply_to(&field.id),
                    style(&field.name).bold(),
                    dim.apply_to(&field.metadata_type)
                );
            }
            println!();
            let built_in = if list.built_in_field_enabled {
                Style::new().green().apply_to("enabled")
            } else {
                dim.apply_to("disabled")
            };
            println!("Built-in fields: {}", built_in);
        }
        MetadataCommand::Create {
            dataset,
            name,
            metadata_type,
        } => {
            let field = api.create(&dataset, &name, metadata_type.into()).await?;
            if ctx.json_output {
                return print_json(&field);
            }
            print_success(format!(
                "Metadata field created: {} {}",
                field.name,
                dim.apply_to(&field.id)
            ));
        }
        MetadataCommand::Rename { dataset, id, name } => {
            let field = api.update(&dataset, &id, &name).await?;
            if ctx.json_output {
                return print_json(&field);
            }
            print_success(format!("Metadata field renamed: {}", field.name));
        }
        MetadataCommand::Delete { dataset, id } => {
            api.delete(&dataset, &id).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            print_success(format!("Metadata field deleted: {}", id));
        }
        MetadataCommand::Assign {
            dataset,
            document,
            values,
        } => {
            let values = values
                .iter()
                .map(|v| parse_value(v))
                .collect::<Result<Vec<_>>>()?;
            let count = values.len();
            let update = DocumentMetadataUpdate::default().with_document(&document, values);
            api.update_document_values(&dataset, update).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "document": document, "assigned": count }));
            }
            print_success(format!("{} value(s) assigned to {}", count, document));
        }
        MetadataCommand::BuiltIn { dataset, state } => {
            let enabled = matches!(state, Toggle::Enable);
            api.set_built_in_fields(&dataset, enabled).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "built_in_field_enabled": enabled }));
            }
            print_success(if enabled {
                "Built-in fields enabled"
            } else {
                "Built-in fields disabled"
            });
        }
    }

    Ok(())
}

/// Parse `ID:NAME=VALUE`.
fn parse_value(raw: &str) -> Result<MetadataValue> {
    let (id, rest) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid value '{}': expected ID:NAME=VALUE", raw))?;
    let (name, value) = rest
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid value '{}': expected ID:NAME=VALUE", raw))?;
    Ok(MetadataValue {
        id: id.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    })
}
