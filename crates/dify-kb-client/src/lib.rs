//! HTTP client SDK for the Dify knowledge base API.
//!
//! This crate provides a typed client for the dataset, document, segment,
//! child chunk, metadata and retrieval endpoints.
//!
//! # Example
//!
//! ```no_run
//! use dify_kb_client::{
//!     DifyKbClient, DocumentSettings, NewSegment, Result, RetrievalModel, SearchMethod,
//! };
//!
//! # async fn example() -> Result<()> {
//! let client = DifyKbClient::new("https://api.dify.ai/v1", "dataset-xxxx")?;
//!
//! // Create a dataset
//! let dataset = client.datasets().create_simple("handbook").await?;
//!
//! // Add a text document
//! let settings = DocumentSettings::new("English", RetrievalModel::new(SearchMethod::HybridSearch));
//! let created = client
//!     .documents()
//!     .create_by_text(&dataset.id, "intro", "hello", &settings)
//!     .await?;
//!
//! // Indexing runs on the server; wait for it explicitly
//! client
//!     .documents()
//!     .wait_for_indexing(&dataset.id, &created.batch, Default::default())
//!     .await?;
//!
//! // Add a segment and search
//! client
//!     .segments()
//!     .create(&dataset.id, &created.document.id, vec![NewSegment::new("hello")])
//!     .await?;
//! let hits = client.datasets().retrieve_simple(&dataset.id, "greeting").await?;
//! for record in hits.records {
//!     println!("{:?} {}", record.score, record.segment.segment.content);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Datasets**: create, list, get, update, delete, retrieve
//! - **Documents**: create by text or file, update by text, list, indexing status, delete
//! - **Segments**: create, list, get, update, delete
//! - **Child chunks**: create, list, update, delete
//! - **Metadata**: define, list, rename, delete, built-in toggle, bulk document assignment

pub mod api;
pub mod client;
pub mod error;
pub mod types;
mod validate;

pub use client::{ClientBuilder, ClientConfig, DifyKbClient};
pub use error::{Error, Result};
pub use types::*;

// Re-export API types that are commonly used with query methods
pub use api::{ListChildChunksQuery, ListDocumentsQuery, ListSegmentsQuery, PollPolicy};
