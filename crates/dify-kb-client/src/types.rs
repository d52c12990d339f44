//! Request and response types for the Dify knowledge API.
//!
//! These types mirror the server's wire schema. Request-side enums are typed;
//! status-like response fields stay plain strings so a new server value never
//! breaks decoding.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate::{non_blank, present};

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

/// Paging fields shared by every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Whether another page exists.
    pub has_more: bool,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total number of pages, when the endpoint reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl Pagination {
    /// Whether a further page may hold unseen items.
    pub fn has_next(&self) -> bool {
        self.has_more || self.total_pages.is_some_and(|pages| self.page < pages)
    }

    /// Number of the following page, if any.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }
}

/// A page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Paging information.
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// Query parameters shared by plain paginated listings.
#[derive(Debug, Clone, Serialize)]
pub struct PageQuery {
    /// Page number (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Datasets
// ─────────────────────────────────────────────────────────────────────────────

/// How documents are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingTechnique {
    /// Embedding-based indexing.
    HighQuality,
    /// Keyword-only indexing.
    Economy,
}

impl IndexingTechnique {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingTechnique::HighQuality => "high_quality",
            IndexingTechnique::Economy => "economy",
        }
    }
}

/// Who can see a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Only the creator.
    OnlyMe,
    /// Everyone in the workspace.
    AllTeamMembers,
    /// A chosen subset of members.
    PartialMembers,
}

impl Permission {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::OnlyMe => "only_me",
            Permission::AllTeamMembers => "all_team_members",
            Permission::PartialMembers => "partial_members",
        }
    }
}

/// Where a dataset's content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Hosted by the service.
    Vendor,
    /// Backed by an external knowledge API.
    External,
}

/// Request to create a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatasetRequest {
    /// Dataset name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Indexing technique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexing_technique: Option<IndexingTechnique>,
    /// Visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
    /// Content provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

impl CreateDatasetRequest {
    /// Create a request with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            indexing_technique: None,
            permission: None,
            provider: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the indexing technique.
    pub fn with_indexing_technique(mut self, technique: IndexingTechnique) -> Self {
        self.indexing_technique = Some(technique);
        self
    }

    /// Set the permission.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        non_blank("name", &self.name)
    }
}

/// Request to update a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDatasetRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New indexing technique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexing_technique: Option<IndexingTechnique>,
    /// New permission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

impl UpdateDatasetRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => non_blank("name", name),
            None => Ok(()),
        }
    }
}

/// A knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset ID.
    pub id: String,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Provider (vendor, external).
    #[serde(default)]
    pub provider: Option<String>,
    /// Permission (only_me, all_team_members, partial_members).
    #[serde(default)]
    pub permission: Option<String>,
    /// Data source type.
    #[serde(default)]
    pub data_source_type: Option<String>,
    /// Indexing technique (high_quality, economy).
    #[serde(default)]
    pub indexing_technique: Option<String>,
    /// Number of apps using the dataset.
    #[serde(default)]
    pub app_count: u64,
    /// Number of documents.
    #[serde(default)]
    pub document_count: u64,
    /// Total word count.
    #[serde(default)]
    pub word_count: u64,
    /// Creator.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Last editor.
    #[serde(default)]
    pub updated_by: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Documents
// ─────────────────────────────────────────────────────────────────────────────

/// How a document is split and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocForm {
    /// Plain text chunks.
    TextModel,
    /// Parent/child chunks.
    HierarchicalModel,
    /// Question/answer pairs.
    QaModel,
}

/// Process rule mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRuleMode {
    /// Server-chosen cleaning and segmentation.
    Automatic,
    /// Caller-provided rules.
    Custom,
    /// Parent/child segmentation.
    Hierarchical,
}

/// A text cleaning step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreProcessingRule {
    /// Rule ID (remove_extra_spaces, remove_urls_emails).
    pub id: String,
    /// Whether the rule runs.
    pub enabled: bool,
}

/// Segmentation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Split separator.
    pub separator: String,
    /// Maximum tokens per segment.
    pub max_tokens: u32,
    /// Overlap between neighbouring segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<u32>,
}

/// Custom processing rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Cleaning steps.
    #[serde(default)]
    pub pre_processing_rules: Vec<PreProcessingRule>,
    /// Segmentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<Segmentation>,
    /// Parent chunk mode for hierarchical documents (full-doc, paragraph).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_mode: Option<String>,
    /// Child chunk segmentation for hierarchical documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subchunk_segmentation: Option<Segmentation>,
}

/// Cleaning and segmentation settings for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRule {
    /// Mode.
    pub mode: ProcessRuleMode,
    /// Rules, required in custom mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Rules>,
}

impl ProcessRule {
    /// Let the server pick cleaning and segmentation.
    pub fn automatic() -> Self {
        Self {
            mode: ProcessRuleMode::Automatic,
            rules: None,
        }
    }

    /// Use caller-provided rules.
    pub fn custom(rules: Rules) -> Self {
        Self {
            mode: ProcessRuleMode::Custom,
            rules: Some(rules),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.mode == ProcessRuleMode::Custom && self.rules.is_none() {
            return Err(Error::validation(
                "process_rule.rules",
                "is required in custom mode",
            ));
        }
        Ok(())
    }
}

/// Content of a new document: inline text or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    /// Inline text.
    Text {
        /// Document name.
        name: String,
        /// Document body.
        text: String,
    },
    /// File upload.
    File {
        /// File name reported to the server.
        file_name: String,
        /// File contents.
        bytes: Vec<u8>,
        /// MIME type of the part; the server sniffs the file name when absent.
        mime_type: Option<String>,
    },
}

impl DocumentContent {
    /// Inline text content.
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        DocumentContent::Text {
            name: name.into(),
            text: text.into(),
        }
    }

    /// File content from bytes.
    pub fn file(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        DocumentContent::File {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime_type: None,
        }
    }

    /// Read a file from disk, naming the upload after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::validation("file_name", "path has no usable file name"))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(DocumentContent::File {
            file_name,
            bytes,
            mime_type: None,
        })
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            DocumentContent::Text { name, text } => {
                non_blank("name", name)?;
                non_blank("text", text)
            }
            DocumentContent::File {
                file_name, bytes, ..
            } => {
                non_blank("file_name", file_name)?;
                if bytes.is_empty() {
                    return Err(Error::validation("file", "must not be empty"));
                }
                Ok(())
            }
        }
    }
}

/// Indexing settings shared by text and file document creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Indexing technique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexing_technique: Option<IndexingTechnique>,
    /// Document form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_form: Option<DocForm>,
    /// Document language (e.g. "English"). Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_language: Option<String>,
    /// Cleaning and segmentation. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_rule: Option<ProcessRule>,
    /// Retrieval configuration. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_model: Option<RetrievalModel>,
}

impl DocumentSettings {
    /// Settings with every required field filled: automatic processing,
    /// text form and the given language and retrieval model.
    pub fn new(doc_language: impl Into<String>, retrieval_model: RetrievalModel) -> Self {
        Self {
            indexing_technique: None,
            doc_form: Some(DocForm::TextModel),
            doc_language: Some(doc_language.into()),
            process_rule: Some(ProcessRule::automatic()),
            retrieval_model: Some(retrieval_model),
        }
    }

    /// Set the indexing technique.
    pub fn with_indexing_technique(mut self, technique: IndexingTechnique) -> Self {
        self.indexing_technique = Some(technique);
        self
    }

    /// Set the document form.
    pub fn with_doc_form(mut self, doc_form: DocForm) -> Self {
        self.doc_form = Some(doc_form);
        self
    }

    /// Set the process rule.
    pub fn with_process_rule(mut self, rule: ProcessRule) -> Self {
        self.process_rule = Some(rule);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        // The server faults with a 500 when process_rule is missing and a
        // 400 for the other two.
        present("process_rule", &self.process_rule)?;
        present("retrieval_model", &self.retrieval_model)?;
        present("doc_language", &self.doc_language)?;
        if let Some(language) = &self.doc_language {
            non_blank("doc_language", language)?;
        }
        if let Some(rule) = &self.process_rule {
            rule.validate()?;
        }
        if let Some(model) = &self.retrieval_model {
            model.validate()?;
        }
        Ok(())
    }
}

/// A document to create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    /// Text or file.
    pub content: DocumentContent,
    /// Indexing settings.
    pub settings: DocumentSettings,
}

/// Body of a create-by-text request.
#[derive(Debug, Serialize)]
pub(crate) struct CreateByTextBody<'a> {
    pub name: &'a str,
    pub text: &'a str,
    #[serde(flatten)]
    pub settings: &'a DocumentSettings,
}

/// Request to replace a document's text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocumentByTextRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New process rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_rule: Option<ProcessRule>,
}

impl UpdateDocumentByTextRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.text.is_none() && self.process_rule.is_none() {
            return Err(Error::validation("request", "has nothing to update"));
        }
        if let Some(text) = &self.text {
            non_blank("text", text)?;
        }
        if let Some(rule) = &self.process_rule {
            rule.validate()?;
        }
        Ok(())
    }
}

/// A document within a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document ID.
    pub id: String,
    /// Position within the dataset.
    #[serde(default)]
    pub position: Option<u32>,
    /// Data source type (upload_file, notion_import, ...).
    #[serde(default)]
    pub data_source_type: Option<String>,
    /// Data source details.
    #[serde(default)]
    pub data_source_info: Option<serde_json::Value>,
    /// Process rule ID.
    #[serde(default)]
    pub dataset_process_rule_id: Option<String>,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Creation channel (api, web).
    #[serde(default)]
    pub created_from: Option<String>,
    /// Creator.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Token count.
    #[serde(default)]
    pub tokens: Option<u64>,
    /// Indexing status (waiting, parsing, indexing, completed, error, paused).
    #[serde(default)]
    pub indexing_status: Option<String>,
    /// Indexing error.
    #[serde(default)]
    pub error: Option<String>,
    /// Whether the document is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// When the document was disabled.
    #[serde(default)]
    pub disabled_at: Option<i64>,
    /// Who disabled the document.
    #[serde(default)]
    pub disabled_by: Option<String>,
    /// Whether the document is archived.
    #[serde(default)]
    pub archived: Option<bool>,
    /// Status for display.
    #[serde(default)]
    pub display_status: Option<String>,
    /// Word count.
    #[serde(default)]
    pub word_count: Option<u64>,
    /// Hit count.
    #[serde(default)]
    pub hit_count: Option<u64>,
    /// Document form.
    #[serde(default)]
    pub doc_form: Option<String>,
}

/// Response to document creation or text update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    /// The document.
    pub document: Document,
    /// Indexing batch ID, used to query indexing status.
    #[serde(default)]
    pub batch: String,
}

/// Indexing progress of one document in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingStatus {
    /// Document ID.
    pub id: String,
    /// Status (waiting, parsing, cleaning, splitting, indexing, completed, error, paused).
    pub indexing_status: String,
    /// Processing start.
    #[serde(default)]
    pub processing_started_at: Option<f64>,
    /// Parsing end.
    #[serde(default)]
    pub parsing_completed_at: Option<f64>,
    /// Cleaning end.
    #[serde(default)]
    pub cleaning_completed_at: Option<f64>,
    /// Splitting end.
    #[serde(default)]
    pub splitting_completed_at: Option<f64>,
    /// Completion.
    #[serde(default)]
    pub completed_at: Option<f64>,
    /// Pause time.
    #[serde(default)]
    pub paused_at: Option<f64>,
    /// Error message.
    #[serde(default)]
    pub error: Option<String>,
    /// Stop time.
    #[serde(default)]
    pub stopped_at: Option<f64>,
    /// Segments indexed so far.
    #[serde(default)]
    pub completed_segments: Option<u64>,
    /// Total segments.
    #[serde(default)]
    pub total_segments: Option<u64>,
}

impl IndexingStatus {
    /// Whether indexing has stopped, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.indexing_status.as_str(),
            "completed" | "error" | "paused"
        )
    }

    /// Whether indexing completed successfully.
    pub fn is_completed(&self) -> bool {
        self.indexing_status == "completed"
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexingStatusResponse {
    #[serde(default)]
    pub data: Vec<IndexingStatus>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Segments
// ─────────────────────────────────────────────────────────────────────────────

/// A segment to create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSegment {
    /// Content (the question, in QA form).
    pub content: String,
    /// Answer, in QA form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl NewSegment {
    /// Segment with content only.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Set the answer.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Set the keywords.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = Some(keywords);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSegmentsBody<'a> {
    pub segments: &'a [NewSegment],
}

/// Changes to a segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentUpdate {
    /// New content.
    pub content: String,
    /// New answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// New keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Enable or disable the segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Ask the server to rebuild this segment's child chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regenerate_child_chunks: Option<bool>,
}

impl SegmentUpdate {
    /// Update with content only.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Set the keywords.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Set the regenerate flag.
    pub fn regenerate_child_chunks(mut self, regenerate: bool) -> Self {
        self.regenerate_child_chunks = Some(regenerate);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateSegmentBody<'a> {
    pub segment: &'a SegmentUpdate,
}

/// A chunk of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Segment ID.
    pub id: String,
    /// Position within the document.
    #[serde(default)]
    pub position: Option<u32>,
    /// Owning document.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Content.
    #[serde(default)]
    pub content: String,
    /// Answer, in QA form.
    #[serde(default)]
    pub answer: Option<String>,
    /// Word count.
    #[serde(default)]
    pub word_count: Option<u64>,
    /// Token count.
    #[serde(default)]
    pub tokens: Option<u64>,
    /// Keywords.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
    /// Index node ID.
    #[serde(default)]
    pub index_node_id: Option<String>,
    /// Index node hash.
    #[serde(default)]
    pub index_node_hash: Option<String>,
    /// Hit count.
    #[serde(default)]
    pub hit_count: Option<u64>,
    /// Whether the segment is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// When the segment was disabled.
    #[serde(default)]
    pub disabled_at: Option<i64>,
    /// Who disabled the segment.
    #[serde(default)]
    pub disabled_by: Option<String>,
    /// Status (waiting, indexing, completed, error).
    #[serde(default)]
    pub status: Option<String>,
    /// Creator.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Indexing start.
    #[serde(default)]
    pub indexing_at: Option<i64>,
    /// Indexing end.
    #[serde(default)]
    pub completed_at: Option<i64>,
    /// Indexing error.
    #[serde(default)]
    pub error: Option<String>,
    /// Stop time.
    #[serde(default)]
    pub stopped_at: Option<i64>,
    /// Child chunks, for hierarchical documents.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub child_chunks: Vec<ChildChunk>,
}

/// Response to segment creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentsResponse {
    /// Created segments, in request order.
    #[serde(default)]
    pub data: Vec<Segment>,
    /// Document form.
    #[serde(default)]
    pub doc_form: Option<String>,
}

/// A single segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentResponse {
    /// The segment.
    pub data: Segment,
    /// Document form.
    #[serde(default)]
    pub doc_form: Option<String>,
}

/// A page of segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentPage {
    /// Segments on this page.
    #[serde(default)]
    pub data: Vec<Segment>,
    /// Document form.
    #[serde(default)]
    pub doc_form: Option<String>,
    /// Paging information.
    #[serde(flatten)]
    pub pagination: Pagination,
}

// ─────────────────────────────────────────────────────────────────────────────
// Child chunks
// ─────────────────────────────────────────────────────────────────────────────

/// A sub-chunk of a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildChunk {
    /// Child chunk ID.
    pub id: String,
    /// Owning segment.
    #[serde(default)]
    pub segment_id: Option<String>,
    /// Content.
    #[serde(default)]
    pub content: String,
    /// Word count.
    #[serde(default)]
    pub word_count: Option<u64>,
    /// Token count.
    #[serde(default)]
    pub tokens: Option<u64>,
    /// Index node ID.
    #[serde(default)]
    pub index_node_id: Option<String>,
    /// Index node hash.
    #[serde(default)]
    pub index_node_hash: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// How the chunk was made (automatic, customized).
    #[serde(default, rename = "type")]
    pub chunk_type: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChildChunkBody<'a> {
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChildChunkResponse {
    pub data: ChildChunk,
}

// ─────────────────────────────────────────────────────────────────────────────
// Metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Value type of a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataType {
    /// Free text.
    String,
    /// Numeric.
    Number,
    /// Timestamp.
    Time,
}

impl MetadataType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataType::String => "string",
            MetadataType::Number => "number",
            MetadataType::Time => "time",
        }
    }
}

/// A dataset-scoped metadata field definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDefinition {
    /// Definition ID.
    pub id: String,
    /// Field name.
    pub name: String,
    /// Value type (string, number, time).
    #[serde(rename = "type")]
    pub metadata_type: String,
    /// Number of documents using the field.
    #[serde(default)]
    pub count: Option<u64>,
}

/// Metadata definitions of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataList {
    /// Definitions.
    #[serde(default)]
    pub doc_metadata: Vec<MetadataDefinition>,
    /// Whether built-in fields are enabled.
    #[serde(default)]
    pub built_in_field_enabled: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateMetadataBody<'a> {
    #[serde(rename = "type")]
    pub metadata_type: MetadataType,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameMetadataBody<'a> {
    pub name: &'a str,
}

/// A metadata value assigned to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataValue {
    /// Definition ID.
    pub id: String,
    /// Field name.
    pub name: String,
    /// Value.
    pub value: String,
}

/// Metadata values for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadataOperation {
    /// Target document.
    pub document_id: String,
    /// Values to assign.
    pub metadata_list: Vec<MetadataValue>,
}

/// Bulk metadata assignment across documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadataUpdate {
    /// One entry per document.
    pub operation_data: Vec<DocumentMetadataOperation>,
}

impl DocumentMetadataUpdate {
    /// Add values for a document.
    pub fn with_document(
        mut self,
        document_id: impl Into<String>,
        metadata_list: Vec<MetadataValue>,
    ) -> Self {
        self.operation_data.push(DocumentMetadataOperation {
            document_id: document_id.into(),
            metadata_list,
        });
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.operation_data.is_empty() {
            return Err(Error::validation("operation_data", "must not be empty"));
        }
        for operation in &self.operation_data {
            non_blank("document_id", &operation.document_id)?;
            for value in &operation.metadata_list {
                non_blank("metadata_list.id", &value.id)?;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Retrieval
// ─────────────────────────────────────────────────────────────────────────────

/// How a query is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Keyword search.
    KeywordSearch,
    /// Vector search.
    SemanticSearch,
    /// Full-text search.
    FullTextSearch,
    /// Vector and full-text combined.
    HybridSearch,
}

/// Rerank model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerankingModel {
    /// Provider name.
    pub reranking_provider_name: String,
    /// Model name.
    pub reranking_model_name: String,
}

/// Retrieval configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalModel {
    /// Search method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_method: Option<SearchMethod>,
    /// Whether reranking runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranking_enable: Option<bool>,
    /// Rerank model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranking_model: Option<RerankingModel>,
    /// Number of results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Whether `score_threshold` applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold_enabled: Option<bool>,
    /// Minimum score; ignored by the server unless enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,
}

impl RetrievalModel {
    /// Configuration with a search method and no reranking.
    pub fn new(search_method: SearchMethod) -> Self {
        Self {
            search_method: Some(search_method),
            reranking_enable: Some(false),
            score_threshold_enabled: Some(false),
            ..Default::default()
        }
    }

    /// Set the result count.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set and enable the score threshold.
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self.score_threshold_enabled = Some(true);
        self
    }

    /// Enable reranking with a model.
    pub fn with_reranking(mut self, model: RerankingModel) -> Self {
        self.reranking_enable = Some(true);
        self.reranking_model = Some(model);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.top_k == Some(0) {
            return Err(Error::validation("top_k", "must be at least 1"));
        }
        if let Some(threshold) = self.score_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::validation(
                    "score_threshold",
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        Ok(())
    }
}

/// Request to search a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveRequest {
    /// Query text.
    pub query: String,
    /// Retrieval configuration; the dataset default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_model: Option<RetrievalModel>,
}

impl RetrieveRequest {
    /// Query with the dataset's default retrieval model.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            retrieval_model: None,
        }
    }

    /// Set the retrieval model.
    pub fn with_retrieval_model(mut self, model: RetrievalModel) -> Self {
        self.retrieval_model = Some(model);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        non_blank("query", &self.query)?;
        match &self.retrieval_model {
            Some(model) => model.validate(),
            None => Ok(()),
        }
    }
}

/// Echo of the executed query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveQuery {
    /// Query text.
    pub content: String,
}

/// Document a retrieved segment belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Document ID.
    pub id: String,
    /// Data source type.
    #[serde(default)]
    pub data_source_type: Option<String>,
    /// Document name.
    #[serde(default)]
    pub name: String,
}

/// A segment returned by retrieval, with its document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedSegment {
    /// Segment fields.
    #[serde(flatten)]
    pub segment: Segment,
    /// Owning document.
    #[serde(default)]
    pub document: Option<DocumentRef>,
}

/// One ranked hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveRecord {
    /// Matching segment.
    pub segment: RetrievedSegment,
    /// Relevance score.
    #[serde(default)]
    pub score: Option<f32>,
    /// Visualisation coordinates.
    #[serde(default)]
    pub tsne_position: Option<serde_json::Value>,
}

/// Retrieval results, ranked by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveResponse {
    /// Executed query.
    pub query: RetrieveQuery,
    /// Hits.
    #[serde(default)]
    pub records: Vec<RetrieveRecord>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
