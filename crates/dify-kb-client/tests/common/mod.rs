//! Shared helpers for the wiremock-backed client tests.

#![allow(dead_code)]

use dify_kb_client::{DifyKbClient, DocumentSettings, RetrievalModel, SearchMethod};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "dataset-test-key";

/// Client pointed at the mock server, with a version prefix like the real API.
pub fn client_for(server: &MockServer) -> DifyKbClient {
    DifyKbClient::new(format!("{}/v1", server.uri()), API_KEY).unwrap()
}

/// Settings the service accepts for a plain text document.
pub fn text_settings() -> DocumentSettings {
    DocumentSettings::new(
        "English",
        RetrievalModel::new(SearchMethod::HybridSearch).with_top_k(2),
    )
}

pub fn dataset_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "provider": "vendor",
        "permission": "only_me",
        "data_source_type": null,
        "indexing_technique": "high_quality",
        "app_count": 0,
        "document_count": 0,
        "word_count": 0,
        "created_by": "user-1",
        "created_at": 1_700_000_000,
        "updated_by": "user-1",
        "updated_at": 1_700_000_000
    })
}

pub fn document_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "position": 1,
        "data_source_type": "upload_file",
        "data_source_info": {"upload_file_id": "file-1"},
        "dataset_process_rule_id": "rule-1",
        "name": name,
        "created_from": "api",
        "created_by": "user-1",
        "created_at": 1_700_000_000,
        "tokens": 0,
        "indexing_status": "waiting",
        "error": null,
        "enabled": true,
        "disabled_at": null,
        "disabled_by": null,
        "archived": false,
        "display_status": "queuing",
        "word_count": 0,
        "hit_count": 0,
        "doc_form": "text_model"
    })
}

pub fn segment_json(id: &str, position: u32, content: &str) -> Value {
    json!({
        "id": id,
        "position": position,
        "document_id": "doc-1",
        "content": content,
        "answer": null,
        "word_count": content.len(),
        "tokens": 0,
        "keywords": [],
        "index_node_id": "node-1",
        "index_node_hash": "hash-1",
        "hit_count": 0,
        "enabled": true,
        "disabled_at": null,
        "disabled_by": null,
        "status": "completed",
        "created_by": "user-1",
        "created_at": 1_700_000_000,
        "indexing_at": 1_700_000_000,
        "completed_at": 1_700_000_001,
        "error": null,
        "stopped_at": null
    })
}

pub fn child_chunk_json(id: &str, content: &str) -> Value {
    json!({
        "id": id,
        "segment_id": "seg-1",
        "content": content,
        "word_count": content.len(),
        "tokens": 0,
        "index_node_id": "node-2",
        "index_node_hash": "hash-2",
        "status": "completed",
        "type": "customized",
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000
    })
}
