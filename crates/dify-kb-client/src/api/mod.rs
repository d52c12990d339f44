//! API endpoint implementations.

mod child_chunks;
mod datasets;
mod documents;
mod metadata;
mod segments;

pub use child_chunks::{ChildChunksApi, ListChildChunksQuery};
pub use datasets::DatasetsApi;
pub use documents::{DocumentsApi, ListDocumentsQuery, PollPolicy};
pub use metadata::MetadataApi;
pub use segments::{ListSegmentsQuery, SegmentsApi};
