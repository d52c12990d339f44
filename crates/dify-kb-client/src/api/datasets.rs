//! Datasets API.

use crate::client::DifyKbClient;
use crate::error::Result;
use crate::types::{
    CreateDatasetRequest, Dataset, Page, PageQuery, RetrieveRequest, RetrieveResponse,
    UpdateDatasetRequest,
};
use crate::validate::path_id;

/// Datasets API client.
pub struct DatasetsApi {
    client: DifyKbClient,
}

impl DatasetsApi {
    pub(crate) fn new(client: DifyKbClient) -> Self {
        Self { client }
    }

    /// Create a dataset.
    pub async fn create(&self, request: CreateDatasetRequest) -> Result<Dataset> {
        request.validate()?;
        self.client.post(&["datasets"], &request).await
    }

    /// Create a dataset with just a name.
    pub async fn create_simple(&self, name: impl Into<String>) -> Result<Dataset> {
        self.create(CreateDatasetRequest::new(name)).await
    }

    /// List datasets, one page at a time.
    pub async fn list(&self, page: u32, limit: u32) -> Result<Page<Dataset>> {
        self.client
            .get_with_query(&["datasets"], &PageQuery { page, limit })
            .await
    }

    /// Get a dataset by ID.
    pub async fn get(&self, id: &str) -> Result<Dataset> {
        path_id("dataset_id", id)?;
        self.client.get(&["datasets", id]).await
    }

    /// Update a dataset.
    pub async fn update(&self, id: &str, request: UpdateDatasetRequest) -> Result<Dataset> {
        path_id("dataset_id", id)?;
        request.validate()?;
        self.client.patch(&["datasets", id], &request).await
    }

    /// Delete a dataset.
    pub async fn delete(&self, id: &str) -> Result<()> {
        path_id("dataset_id", id)?;
        self.client.delete(&["datasets", id]).await
    }

    /// Search a dataset.
    pub async fn retrieve(&self, id: &str, request: RetrieveRequest) -> Result<RetrieveResponse> {
        path_id("dataset_id", id)?;
        request.validate()?;
        self.client
            .post(&["datasets", id, "retrieve"], &request)
            .await
    }

    /// Search a dataset with its default retrieval settings.
    pub async fn retrieve_simple(
        &self,
        id: &str,
        query: impl Into<String>,
    ) -> Result<RetrieveResponse> {
        self.retrieve(id, RetrieveRequest::new(query)).await
    }
}
