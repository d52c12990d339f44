//! Metadata API.

use crate::client::DifyKbClient;
use crate::error::Result;
use crate::types::{
    CreateMetadataBody, DocumentMetadataUpdate, MetadataDefinition, MetadataList, MetadataType,
    RenameMetadataBody,
};
use crate::validate::{non_blank, path_id};

/// Metadata API client.
pub struct MetadataApi {
    client: DifyKbClient,
}

impl MetadataApi {
    pub(crate) fn new(client: DifyKbClient) -> Self {
        Self { client }
    }

    /// Define a metadata field on a dataset.
    pub async fn create(
        &self,
        dataset_id: &str,
        name: &str,
        metadata_type: MetadataType,
    ) -> Result<MetadataDefinition> {
        path_id("dataset_id", dataset_id)?;
        non_blank("name", name)?;
        self.client
            .post(
                &["datasets", dataset_id, "metadata"],
                &CreateMetadataBody {
                    metadata_type,
                    name,
                },
            )
            .await
    }

    /// List a dataset's metadata fields.
    pub async fn list(&self, dataset_id: &str) -> Result<MetadataList> {
        path_id("dataset_id", dataset_id)?;
        self.client
            .get(&["datasets", dataset_id, "metadata"])
            .await
    }

    /// Rename a metadata field.
    pub async fn update(
        &self,
        dataset_id: &str,
        metadata_id: &str,
        name: &str,
    ) -> Result<MetadataDefinition> {
        path_id("dataset_id", dataset_id)?;
        path_id("metadata_id", metadata_id)?;
        non_blank("name", name)?;
        self.client
            .patch(
                &["datasets", dataset_id, "metadata", metadata_id],
                &RenameMetadataBody { name },
            )
            .await
    }

    /// Remove a metadata field.
    pub async fn delete(&self, dataset_id: &str, metadata_id: &str) -> Result<()> {
        path_id("dataset_id", dataset_id)?;
        path_id("metadata_id", metadata_id)?;
        self.client
            .delete(&["datasets", dataset_id, "metadata", metadata_id])
            .await
    }

    /// Turn the built-in fields (document name, uploader, dates) on or off.
    pub async fn set_built_in_fields(&self, dataset_id: &str, enabled: bool) -> Result<()> {
        path_id("dataset_id", dataset_id)?;
        let action = if enabled { "enable" } else { "disable" };
        self.client
            .post_unit(
                &["datasets", dataset_id, "metadata", "built-in", action],
                &serde_json::json!({}),
            )
            .await
    }

    /// Assign metadata values to one or more documents.
    pub async fn update_document_values(
        &self,
        dataset_id: &str,
        update: DocumentMetadataUpdate,
    ) -> Result<()> {
        path_id("dataset_id", dataset_id)?;
        update.validate()?;
        self.client
            .post_unit(
                &["datasets", dataset_id, "documents", "metadata"],
                &update,
            )
            .await
    }
}
