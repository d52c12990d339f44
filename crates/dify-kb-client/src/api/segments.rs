//! Segments API.

use crate::client::DifyKbClient;
use crate::error::{Error, Result};
use crate::types::{
    CreateSegmentsBody, NewSegment, SegmentPage, SegmentResponse, SegmentUpdate,
    SegmentsResponse, UpdateSegmentBody,
};
use crate::validate::{non_blank, path_id};

/// Query parameters for listing segments.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ListSegmentsQuery {
    /// Filter by content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Filter by status (completed, indexing, error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Page number (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for ListSegmentsQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            page: 1,
            limit: 20,
        }
    }
}

/// Segments API client.
pub struct SegmentsApi {
    client: DifyKbClient,
}

fn segments_path<'a>(dataset_id: &'a str, document_id: &'a str) -> Result<Vec<&'a str>> {
    path_id("dataset_id", dataset_id)?;
    path_id("document_id", document_id)?;
    Ok(vec!["datasets", dataset_id, "documents", document_id, "segments"])
}

fn segment_path<'a>(
    dataset_id: &'a str,
    document_id: &'a str,
    segment_id: &'a str,
) -> Result<Vec<&'a str>> {
    let mut path = segments_path(dataset_id, document_id)?;
    path_id("segment_id", segment_id)?;
    path.push(segment_id);
    Ok(path)
}

impl SegmentsApi {
    pub(crate) fn new(client: DifyKbClient) -> Self {
        Self { client }
    }

    /// Add segments to a document.
    ///
    /// The returned segments are in the same order as `segments`.
    pub async fn create(
        &self,
        dataset_id: &str,
        document_id: &str,
        segments: Vec<NewSegment>,
    ) -> Result<SegmentsResponse> {
        let path = segments_path(dataset_id, document_id)?;
        if segments.is_empty() {
            return Err(Error::validation("segments", "must not be empty"));
        }
        for segment in &segments {
            non_blank("content", &segment.content)?;
        }
        self.client
            .post(
                &path,
                &CreateSegmentsBody {
                    segments: &segments,
                },
            )
            .await
    }

    /// List segments of a document.
    pub async fn list(
        &self,
        dataset_id: &str,
        document_id: &str,
        query: ListSegmentsQuery,
    ) -> Result<SegmentPage> {
        let path = segments_path(dataset_id, document_id)?;
        self.client.get_with_query(&path, &query).await
    }

    /// Get a segment by ID.
    pub async fn get(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
    ) -> Result<SegmentResponse> {
        let path = segment_path(dataset_id, document_id, segment_id)?;
        self.client.get(&path).await
    }

    /// Update a segment.
    pub async fn update(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
        update: SegmentUpdate,
    ) -> Result<SegmentResponse> {
        let path = segment_path(dataset_id, document_id, segment_id)?;
        non_blank("content", &update.content)?;
        self.client
            .post(&path, &UpdateSegmentBody { segment: &update })
            .await
    }

    /// Delete a segment.
    pub async fn delete(&self, dataset_id: &str, document_id: &str, segment_id: &str) -> Result<()> {
        let path = segment_path(dataset_id, document_id, segment_id)?;
        self.client.delete(&path).await
    }
}
