//! NotionClient against a fake Notion API served by axum.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use notion_locator::config::NotionConfig;
use notion_locator::models::{Block, BlockId, BlockKind, RichText};
use notion_locator::notion::{payload, BlockSource, ClientError, NotionClient};
use serde_json::{json, Value};

const PAGED: &str = "11111111-1111-1111-1111-111111111111";
const MISSING: &str = "22222222-2222-2222-2222-222222222222";
const LOCKED: &str = "33333333-3333-3333-3333-333333333333";
const THROTTLED: &str = "44444444-4444-4444-4444-444444444444";
const BROKEN: &str = "55555555-5555-5555-5555-555555555555";
const REJECTED: &str = "66666666-6666-6666-6666-666666666666";

#[derive(Default)]
struct Recorded {
    headers: Vec<HeaderMap>,
    queries: Vec<HashMap<String, String>>,
    bodies: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn block_json(id: &str, kind: BlockKind, text: &str) -> Value {
    let block = Block::new(
        BlockId::parse(id).unwrap(),
        kind,
        vec![RichText::text(text, None)],
    );
    serde_json::to_value(block).unwrap()
}

fn error_for(id: &str) -> Option<(StatusCode, String)> {
    let status = match id {
        MISSING => StatusCode::NOT_FOUND,
        LOCKED => StatusCode::UNAUTHORIZED,
        THROTTLED => StatusCode::TOO_MANY_REQUESTS,
        BROKEN => StatusCode::INTERNAL_SERVER_ERROR,
        REJECTED => StatusCode::BAD_REQUEST,
        _ => return None,
    };
    Some((status, format!("{{\"object\":\"error\",\"id\":\"{}\"}}", id)))
}

async fn list_children(
    State(rec): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    {
        let mut rec = rec.lock().unwrap();
        rec.headers.push(headers);
        rec.queries.push(query.clone());
    }
    if let Some(err) = error_for(&id) {
        return Err(err);
    }

    let body = match query.get("start_cursor").map(String::as_str) {
        None if id == PAGED => json!({
            "object": "list",
            "results": [
                block_json("aaaaaaaa-0000-0000-0000-000000000001", BlockKind::Callout, "card"),
                block_json("aaaaaaaa-0000-0000-0000-000000000002", BlockKind::Paragraph, "one"),
            ],
            "has_more": true,
            "next_cursor": "cursor-2"
        }),
        Some("cursor-2") => json!({
            "object": "list",
            "results": [
                block_json("aaaaaaaa-0000-0000-0000-000000000003", BlockKind::Paragraph, "two"),
            ],
            "has_more": false,
            "next_cursor": null
        }),
        _ => json!({ "object": "list", "results": [], "has_more": false, "next_cursor": null }),
    };
    Ok(Json(body))
}

async fn update_block(
    State(rec): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    rec.lock().unwrap().bodies.push((id.clone(), body.clone()));
    if let Some(err) = error_for(&id) {
        return Err(err);
    }
    Ok(Json(json!({
        "object": "block",
        "id": id,
        "type": "paragraph",
        "has_children": false,
        "paragraph": body.get("paragraph").cloned().unwrap_or_else(|| json!({ "rich_text": [] }))
    })))
}

async fn append_children(
    State(rec): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    rec.lock().unwrap().bodies.push((id.clone(), body.clone()));
    if let Some(err) = error_for(&id) {
        return Err(err);
    }
    let results: Vec<Value> = body["children"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, mut child)| {
            child["id"] = json!(format!("bbbbbbbb-0000-0000-0000-{:012}", i));
            child
        })
        .collect();
    Ok(Json(json!({ "object": "list", "results": results, "has_more": false, "next_cursor": null })))
}

async fn setup() -> (NotionClient, Shared) {
    let rec: Shared = Arc::default();
    let app = Router::new()
        .route("/v1/blocks/{id}", patch(update_block))
        .route(
            "/v1/blocks/{id}/children",
            get(list_children).patch(append_children),
        )
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let config = NotionConfig::new("secret-token").with_base_url(format!("http://{}/v1", addr));
    let client = NotionClient::new(&config).expect("Failed to build client");
    (client, rec)
}

fn id(s: &str) -> BlockId {
    BlockId::parse(s).unwrap()
}

mod get_children {
    use super::*;

    #[tokio::test]
    async fn follows_pagination_cursors() {
        let (client, rec) = setup().await;

        let blocks = client.get_children(&id(PAGED)).await.expect("fetch failed");

        let texts: Vec<String> = blocks.iter().map(Block::text).collect();
        assert_eq!(texts, vec!["card", "one", "two"]);
        assert!(blocks[0].is_callout());

        let rec = rec.lock().unwrap();
        assert_eq!(rec.queries.len(), 2);
        assert_eq!(rec.queries[0].get("page_size").map(String::as_str), Some("100"));
        assert_eq!(
            rec.queries[1].get("start_cursor").map(String::as_str),
            Some("cursor-2")
        );
    }

    #[tokio::test]
    async fn sends_auth_and_version_headers() {
        let (client, rec) = setup().await;

        client.get_children(&id(PAGED)).await.expect("fetch failed");

        let rec = rec.lock().unwrap();
        let headers = &rec.headers[0];
        assert_eq!(headers["authorization"], "Bearer secret-token");
        assert_eq!(headers["notion-version"], "2022-06-28");
    }

    #[tokio::test]
    async fn is_the_block_source_implementation() {
        let (client, _rec) = setup().await;

        let blocks = BlockSource::fetch_children(&client, &id(PAGED))
            .await
            .expect("fetch failed");

        assert_eq!(blocks.len(), 3);
    }

    #[tokio::test]
    async fn returns_empty_list_for_childless_block() {
        let (client, _rec) = setup().await;

        let blocks = client
            .get_children(&id("77777777-7777-7777-7777-777777777777"))
            .await
            .expect("fetch failed");

        assert!(blocks.is_empty());
    }
}

mod status_mapping {
    use super::*;

    #[tokio::test]
    async fn maps_404_to_not_found() {
        let (client, _rec) = setup().await;
        let err = client.get_children(&id(MISSING)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn maps_401_to_unauthorized() {
        let (client, _rec) = setup().await;
        let err = client.get_children(&id(LOCKED)).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let (client, _rec) = setup().await;
        let err = client.get_children(&id(THROTTLED)).await.unwrap_err();
        assert!(matches!(err, ClientError::RateLimited(_)));
    }

    #[tokio::test]
    async fn maps_400_to_bad_request() {
        let (client, _rec) = setup().await;
        let err = client
            .update_block(&id(REJECTED), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::BadRequest(_)));
    }

    #[tokio::test]
    async fn maps_other_failures_to_server_error() {
        let (client, _rec) = setup().await;
        let err = client.get_children(&id(BROKEN)).await.unwrap_err();
        match err {
            ClientError::Server(msg) => assert!(msg.starts_with("500")),
            other => panic!("expected server error, got {:?}", other),
        }
    }
}

mod writes {
    use super::*;

    #[tokio::test]
    async fn update_block_sends_body_and_decodes_result() {
        let (client, rec) = setup().await;
        let target = id("88888888-8888-8888-8888-888888888888");
        let body = payload::rich_text_update(
            &BlockKind::Paragraph,
            vec![RichText::equation(r"\texttt{x}")],
        );

        let block = client.update_block(&target, &body).await.expect("update failed");

        assert_eq!(block.id, target);
        assert_eq!(block.text(), r"\texttt{x}");
        let rec = rec.lock().unwrap();
        assert_eq!(rec.bodies[0].0, target.as_str());
        assert_eq!(rec.bodies[0].1, body);
    }

    #[tokio::test]
    async fn append_children_wraps_children_and_returns_created_blocks() {
        let (client, rec) = setup().await;
        let parent = id("99999999-9999-9999-9999-999999999999");
        let child = payload::paragraph(vec![RichText::text("headline", Some("https://example.com"))]);

        let created = client
            .append_children(&parent, &[child.clone()])
            .await
            .expect("append failed");

        assert_eq!(created.len(), 1);
        assert!(created[0].is_paragraph());
        assert_eq!(created[0].text(), "headline");
        let rec = rec.lock().unwrap();
        assert_eq!(rec.bodies[0].1, json!({ "children": [child] }));
    }
}
