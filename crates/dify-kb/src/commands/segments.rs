//! Segments command - chunk-level editing of a document.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use dify_kb_client::{ListSegmentsQuery, NewSegment, Segment, SegmentUpdate};

use super::{
    Context, print_empty, print_header, print_json, print_page_footer, print_success, truncate,
};

/// Arguments for the segments command.
#[derive(Args, Debug)]
pub struct SegmentsArgs {
    #[command(subcommand)]
    pub command: SegmentsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SegmentsCommand {
    /// List segments of a document
    List {
        /// Dataset ID
        dataset: String,

        /// Document ID
        document: String,

        /// Filter by content
        #[arg(short, long)]
        keyword: Option<String>,

        /// Filter by status (completed, indexing, error)
        #[arg(long)]
        status: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Segments per page
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Add segments, one per content argument
    Add {
        /// Dataset ID
        dataset: String,

        /// Document ID
        document: String,

        /// Segment contents
        #[arg(required = true)]
        contents: Vec<String>,

        /// Keywords attached to every new segment
        #[arg(short, long)]
        keyword: Vec<String>,
    },

    /// Replace a segment's content
    Update {
        /// Dataset ID
        dataset: String,

        /// Document ID
        document: String,

        /// Segment ID
        segment: String,

        /// New content
        content: String,

        /// Answer, for QA documents
        #[arg(long)]
        answer: Option<String>,

        /// Rebuild child chunks from the new content
        #[arg(long)]
        regenerate_child_chunks: bool,
    },

    /// Delete a segment
    Delete {
        /// Dataset ID
        dataset: String,

        /// Document ID
        document: String,

        /// Segment ID
        segment: String,
    },
}

/// Run the segments command.
pub async fn run(args: SegmentsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let api = client.segments();

    match args.command {
        SegmentsCommand::List {
            dataset,
            document,
            keyword,
            status,
            page,
            limit,
        } => {
            let query = ListSegmentsQuery {
                keyword,
                status,
                page,
                limit,
            };
            let result = api.list(&dataset, &document, query).await?;
            if ctx.json_output {
                return print_json(&result);
            }

            print_header("Segments");
            if result.data.is_empty() {
                print_empty("segments");
            }
            for segment in &result.data {
                print_segment(segment);
            }
            print_page_footer(
                result.pagination.page,
                result.pagination.total,
                result.pagination.has_next(),
            );
        }
        SegmentsCommand::Add {
            dataset,
            document,
            contents,
            keyword,
        } => {
            let segments = contents
                .into_iter()
                .map(|content| {
                    let segment = NewSegment::new(content);
                    if keyword.is_empty() {
                        segment
                    } else {
                        segment.with_keywords(keyword.clone())
                    }
                })
                .collect();
            let created = api.create(&dataset, &document, segments).await?;
            if ctx.json_output {
                return print_json(&created);
            }
            print_success(format!("{} segment(s) added", created.data.len()));
            for segment in &created.data {
                print_segment(segment);
            }
        }
        SegmentsCommand::Update {
            dataset,
            document,
            segment,
            content,
            answer,
            regenerate_child_chunks,
        } => {
            let mut update =
                SegmentUpdate::new(content).regenerate_child_chunks(regenerate_child_chunks);
            update.answer = answer;
            let updated = api.update(&dataset, &document, &segment, update).await?;
            if ctx.json_output {
                return print_json(&updated);
            }
            print_success(format!("Segment updated: {}", updated.data.id));
        }
        SegmentsCommand::Delete {
            dataset,
            document,
            segment,
        } => {
            api.delete(&dataset, &document, &segment).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": segment }));
            }
            print_success(format!("Segment deleted: {}", segment));
        }
    }

    Ok(())
}

fn print_segment(segment: &Segment) {
    let dim = Style::new().dim();
    let position = segment
        .position
        .map(|p| format!("#{}", p))
        .unwrap_or_default();
    println!(
        "{} {}  {}",
        dim.apply_to(position),
        dim.apply_to(&segment.id),
        truncate(&segment.content, 60)
    );
}
