//! Dataset and retrieval endpoints against a mock server.

mod common;

use common::{client_for, dataset_json, API_KEY};
use dify_kb_client::{
    CreateDatasetRequest, Error, IndexingTechnique, Permission, Provider, RetrievalModel,
    RetrieveRequest, SearchMethod, UpdateDatasetRequest,
};
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_dataset_sends_bearer_key_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/datasets"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(body_json(json!({
            "name": "handbook",
            "description": "team handbook",
            "indexing_technique": "high_quality",
            "permission": "only_me",
            "provider": "vendor"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut body = dataset_json("ds-1", "handbook");
            body["description"] = json!("team handbook");
            body
        }))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateDatasetRequest::new("handbook")
        .with_description("team handbook")
        .with_indexing_technique(IndexingTechnique::HighQuality)
        .with_permission(Permission::OnlyMe)
        .with_provider(Provider::Vendor);
    let dataset = client_for(&server).datasets().create(request).await.unwrap();

    assert_eq!(dataset.id, "ds-1");
    assert_eq!(dataset.name, "handbook");
    assert_eq!(dataset.description.as_deref(), Some("team handbook"));
    assert_eq!(
        dataset.indexing_technique.as_deref(),
        Some(IndexingTechnique::HighQuality.as_str())
    );
}

#[tokio::test]
async fn test_create_dataset_with_empty_name_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .datasets()
        .create_simple("   ")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "name", .. }));
}

#[tokio::test]
async fn test_list_datasets_passes_paging_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [dataset_json("ds-2", "second")],
            "has_more": true,
            "limit": 1,
            "total": 3,
            "page": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).datasets().list(2, 1).await.unwrap();

    assert!(page.data.len() <= page.pagination.limit as usize);
    assert_eq!(page.data[0].id, "ds-2");
    assert_eq!(page.pagination.total, 3);
    assert!(page.pagination.has_next());
    assert_eq!(page.pagination.next_page(), Some(3));
}

#[tokio::test]
async fn test_get_update_delete_dataset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets/ds-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_json("ds-1", "old")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/datasets/ds-1"))
        .and(body_json(json!({"name": "new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_json("ds-1", "new")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/datasets/ds-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let datasets = client_for(&server).datasets();
    assert_eq!(datasets.get("ds-1").await.unwrap().name, "old");

    let updated = datasets
        .update(
            "ds-1",
            UpdateDatasetRequest {
                name: Some("new".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "new");

    datasets.delete("ds-1").await.unwrap();
}

#[tokio::test]
async fn test_retrieve_returns_ranked_records() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/datasets/ds-1/retrieve"))
        .and(body_json(json!({
            "query": "what is ai",
            "retrieval_model": {
                "search_method": "semantic_search",
                "reranking_enable": false,
                "top_k": 3,
                "score_threshold_enabled": true,
                "score_threshold": 0.5
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"content": "what is ai"},
            "records": [
                {
                    "segment": {
                        "id": "seg-1",
                        "position": 1,
                        "document_id": "doc-1",
                        "content": "AI is a branch of computer science",
                        "keywords": ["ai"],
                        "document": {"id": "doc-1", "data_source_type": "upload_file", "name": "ai.txt"}
                    },
                    "score": 0.91,
                    "tsne_position": null
                },
                {
                    "segment": {"id": "seg-2", "content": "machines that think", "keywords": null},
                    "score": 0.64
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RetrieveRequest::new("what is ai").with_retrieval_model(
        RetrievalModel::new(SearchMethod::SemanticSearch)
            .with_top_k(3)
            .with_score_threshold(0.5),
    );
    let response = client_for(&server)
        .datasets()
        .retrieve("ds-1", request)
        .await
        .unwrap();

    assert_eq!(response.query.content, "what is ai");
    assert_eq!(response.records.len(), 2);
    let first = &response.records[0];
    assert_eq!(first.score, Some(0.91));
    assert_eq!(first.segment.segment.id, "seg-1");
    assert_eq!(first.segment.document.as_ref().unwrap().name, "ai.txt");
    assert!(response.records[1].segment.document.is_none());
}

#[tokio::test]
async fn test_retrieve_rejects_zero_top_k() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = RetrieveRequest::new("q")
        .with_retrieval_model(RetrievalModel::default().with_top_k(0));
    let err = client_for(&server)
        .datasets()
        .retrieve("ds-1", request)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "top_k", .. }));
}
