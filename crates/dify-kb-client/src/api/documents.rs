//! Documents API.

use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};

use crate::client::DifyKbClient;
use crate::error::{Error, Result};
use crate::types::{
    CreateByTextBody, Document, DocumentContent, DocumentResponse, DocumentSettings,
    IndexingStatus, IndexingStatusResponse, NewDocument, Page, UpdateDocumentByTextRequest,
};
use crate::validate::{non_blank, path_id};

/// Query parameters for listing documents.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ListDocumentsQuery {
    /// Filter by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Page number (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for ListDocumentsQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            page: 1,
            limit: 20,
        }
    }
}

/// How [`DocumentsApi::wait_for_indexing`] polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between status queries.
    pub interval: Duration,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Documents API client.
pub struct DocumentsApi {
    client: DifyKbClient,
}

impl DocumentsApi {
    pub(crate) fn new(client: DifyKbClient) -> Self {
        Self { client }
    }

    /// Create a document from text or a file.
    pub async fn create(&self, dataset_id: &str, document: NewDocument) -> Result<DocumentResponse> {
        match document.content {
            DocumentContent::Text { name, text } => {
                self.create_by_text(dataset_id, &name, &text, &document.settings)
                    .await
            }
            content @ DocumentContent::File { .. } => {
                self.create_by_file(dataset_id, content, &document.settings)
                    .await
            }
        }
    }

    /// Create a document from inline text.
    pub async fn create_by_text(
        &self,
        dataset_id: &str,
        name: &str,
        text: &str,
        settings: &DocumentSettings,
    ) -> Result<DocumentResponse> {
        path_id("dataset_id", dataset_id)?;
        non_blank("name", name)?;
        non_blank("text", text)?;
        settings.validate()?;

        let body = CreateByTextBody {
            name,
            text,
            settings,
        };
        self.client
            .post(
                &["datasets", dataset_id, "document", "create-by-text"],
                &body,
            )
            .await
    }

    /// Create a document by uploading a file.
    ///
    /// The settings travel as a JSON `data` part next to the `file` part.
    pub async fn create_by_file(
        &self,
        dataset_id: &str,
        content: DocumentContent,
        settings: &DocumentSettings,
    ) -> Result<DocumentResponse> {
        path_id("dataset_id", dataset_id)?;
        content.validate()?;
        settings.validate()?;

        let (file_name, bytes, mime_type) = match content {
            DocumentContent::File {
                file_name,
                bytes,
                mime_type,
            } => (file_name, bytes, mime_type),
            DocumentContent::Text { .. } => {
                return Err(Error::validation("file", "is required for file upload"));
            }
        };

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(mime_type) = mime_type {
            part = part
                .mime_str(&mime_type)
                .map_err(|_| Error::validation("mime_type", "is not a valid MIME type"))?;
        }
        let form = Form::new()
            .text("data", serde_json::to_string(settings)?)
            .part("file", part);

        self.client
            .post_multipart(
                &["datasets", dataset_id, "document", "create-by-file"],
                form,
            )
            .await
    }

    /// Replace a document's text, name or process rule.
    pub async fn update_by_text(
        &self,
        dataset_id: &str,
        document_id: &str,
        request: UpdateDocumentByTextRequest,
    ) -> Result<DocumentResponse> {
        path_id("dataset_id", dataset_id)?;
        path_id("document_id", document_id)?;
        request.validate()?;
        self.client
            .post(
                &["datasets", dataset_id, "documents", document_id, "update-by-text"],
                &request,
            )
            .await
    }

    /// List documents in a dataset.
    pub async fn list(&self, dataset_id: &str, query: ListDocumentsQuery) -> Result<Page<Document>> {
        path_id("dataset_id", dataset_id)?;
        self.client
            .get_with_query(&["datasets", dataset_id, "documents"], &query)
            .await
    }

    /// Query indexing progress for a creation batch.
    pub async fn indexing_status(
        &self,
        dataset_id: &str,
        batch: &str,
    ) -> Result<Vec<IndexingStatus>> {
        path_id("dataset_id", dataset_id)?;
        path_id("batch", batch)?;
        let response: IndexingStatusResponse = self
            .client
            .get(&["datasets", dataset_id, "documents", batch, "indexing-status"])
            .await?;
        Ok(response.data)
    }

    /// Poll indexing status until every document in the batch has finished.
    ///
    /// Returns the final statuses, which may include failures. A batch the
    /// server reports no documents for returns an empty list after the first
    /// query. Fails with [`Error::Timeout`] once `policy.timeout` has elapsed.
    pub async fn wait_for_indexing(
        &self,
        dataset_id: &str,
        batch: &str,
        policy: PollPolicy,
    ) -> Result<Vec<IndexingStatus>> {
        let started = Instant::now();
        loop {
            let statuses = self.indexing_status(dataset_id, batch).await?;
            if statuses.is_empty() {
                tracing::warn!(batch, "no documents found for batch");
                return Ok(statuses);
            }
            if statuses.iter().all(IndexingStatus::is_finished) {
                return Ok(statuses);
            }

            let waited = started.elapsed();
            tracing::debug!(batch, ?waited, "indexing not finished yet");
            if waited + policy.interval > policy.timeout {
                return Err(Error::Timeout { waited });
            }
            tokio::time::sleep(policy.interval).await;
        }
    }

    /// Delete a document.
    pub async fn delete(&self, dataset_id: &str, document_id: &str) -> Result<()> {
        path_id("dataset_id", dataset_id)?;
        path_id("document_id", document_id)?;
        self.client
            .delete(&["datasets", dataset_id, "documents", document_id])
            .await
    }
}
