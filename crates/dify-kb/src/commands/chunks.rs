//! Chunks command - child chunks of a segment.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use dify_kb_client::{ChildChunk, ListChildChunksQuery};

use super::{
    Context, print_empty, print_header, print_json, print_page_footer, print_success, truncate,
};

/// Arguments for the chunks command.
#[derive(Args, Debug)]
pub struct ChunksArgs {
    #[command(subcommand)]
    pub command: ChunksCommand,
}

/// Identifies the segment that owns the chunks.
#[derive(Args, Debug)]
pub struct SegmentRef {
    /// Dataset ID
    pub dataset: String,

    /// Document ID
    pub document: String,

    /// Segment ID
    pub segment: String,
}

#[derive(Subcommand, Debug)]
pub enum ChunksCommand {
    /// List child chunks of a segment
    List {
        #[command(flatten)]
        segment: SegmentRef,

        /// Filter by content
        #[arg(short, long)]
        keyword: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Chunks per page
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Add a child chunk
    Add {
        #[command(flatten)]
        segment: SegmentRef,

        /// Chunk content
        content: String,
    },

    /// Replace a child chunk's content
    Update {
        #[command(flatten)]
        segment: SegmentRef,

        /// Child chunk ID
        chunk: String,

        /// New content
        content: String,
    },

    /// Delete a child chunk
    Delete {
        #[command(flatten)]
        segment: SegmentRef,

        /// Child chunk ID
        chunk: String,
    },
}

/// Run the chunks command.
pub async fn run(args: ChunksArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let api = client.child_chunks();

    match args.command {
        ChunksCommand::List {
            segment: s,
            keyword,
            page,
            limit,
        } => {
            let query = ListChildChunksQuery {
                keyword,
                page,
                limit,
            };
            let result = api.list(&s.dataset, &s.document, &s.segment, query).await?;
            if ctx.json_output {
                return print_json(&result);
            }

            print_header("Child Chunks");
            if result.data.is_empty() {
                print_empty("child chunks");
            }
            for chunk in &result.data {
                print_chunk(chunk);
            }
            print_page_footer(
                result.pagination.page,
                result.pagination.total,
                result.pagination.has_next(),
            );
        }
        ChunksCommand::Add { segment: s, content } => {
            let chunk = api
                .create(&s.dataset, &s.document, &s.segment, &content)
                .await?;
            if ctx.json_output {
                return print_json(&chunk);
            }
            print_success(format!("Child chunk added: {}", chunk.id));
        }
        ChunksCommand::Update {
            segment: s,
            chunk,
            content,
        } => {
            let chunk = api
                .update(&s.dataset, &s.document, &s.segment, &chunk, &content)
                .await?;
            if ctx.json_output {
                return print_json(&chunk);
            }
            print_success(format!("Child chunk updated: {}", chunk.id));
        }
        ChunksCommand::Delete { segment: s, chunk } => {
            api.delete(&s.dataset, &s.document, &s.segment, &chunk)
                .await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": chunk }));
            }
            print_success(format!("Child chunk deleted: {}", chunk));
        }
    }

    Ok(())
}

fn print_chunk(chunk: &ChildChunk) {
    let dim = Style::new().dim();
    println!(
        "{}  {}",
        dim.apply_to(&chunk.id),
        truncate(&chunk.content, 60)
    );
}
