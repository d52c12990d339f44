//! Child chunks API.

use crate::client::DifyKbClient;
use crate::error::Result;
use crate::types::{ChildChunk, ChildChunkBody, ChildChunkResponse, Page};
use crate::validate::{non_blank, path_id};

/// Query parameters for listing child chunks.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ListChildChunksQuery {
    /// Filter by content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Page number (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for ListChildChunksQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            page: 1,
            limit: 20,
        }
    }
}

/// Child chunks API client.
pub struct ChildChunksApi {
    client: DifyKbClient,
}

fn chunks_path<'a>(
    dataset_id: &'a str,
    document_id: &'a str,
    segment_id: &'a str,
) -> Result<Vec<&'a str>> {
    path_id("dataset_id", dataset_id)?;
    path_id("document_id", document_id)?;
    path_id("segment_id", segment_id)?;
    Ok(vec![
        "datasets",
        dataset_id,
        "documents",
        document_id,
        "segments",
        segment_id,
        "child_chunks",
    ])
}

impl ChildChunksApi {
    pub(crate) fn new(client: DifyKbClient) -> Self {
        Self { client }
    }

    /// Add a child chunk to a segment.
    pub async fn create(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
        content: &str,
    ) -> Result<ChildChunk> {
        let path = chunks_path(dataset_id, document_id, segment_id)?;
        non_blank("content", content)?;
        let response: ChildChunkResponse =
            self.client.post(&path, &ChildChunkBody { content }).await?;
        Ok(response.data)
    }

    /// List child chunks of a segment.
    pub async fn list(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
        query: ListChildChunksQuery,
    ) -> Result<Page<ChildChunk>> {
        let path = chunks_path(dataset_id, document_id, segment_id)?;
        self.client.get_with_query(&path, &query).await
    }

    /// Replace a child chunk's content.
    pub async fn update(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
        child_chunk_id: &str,
        content: &str,
    ) -> Result<ChildChunk> {
        let mut path = chunks_path(dataset_id, document_id, segment_id)?;
        path_id("child_chunk_id", child_chunk_id)?;
        non_blank("content", content)?;
        path.push(child_chunk_id);
        let response: ChildChunkResponse = self
            .client
            .patch(&path, &ChildChunkBody { content })
            .await?;
        Ok(response.data)
    }

    /// Delete a child chunk.
    pub async fn delete(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
        child_chunk_id: &str,
    ) -> Result<()> {
        let mut path = chunks_path(dataset_id, document_id, segment_id)?;
        path_id("child_chunk_id", child_chunk_id)?;
        path.push(child_chunk_id);
        self.client.delete(&path).await
    }
}
