use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use bpj_client::migrate::migrate;
use bpj_client::{ApiConfig, Journal, SupabaseClient};
use bpj_core::fallback::journal_posts;
use bpj_core::{Error, RenderedView, ViewMode};
use serde_json::{json, Value};

const KEY: &str = "test-key";

type Patches = Arc<Mutex<Vec<(String, Value)>>>;

fn rows() -> Vec<Value> {
    vec![
        json!({
            "id": "p1",
            "title": "Hosted article",
            "description": "{'introduction': 'Intro', 'essence': 'Core', 'conclusion': 'Advice'}",
            "summary": "{'introduction': 'Intro', 'essence': 'Core', 'conclusion': 'Advice'}",
            "content_lite": "Lite text",
            "created_at": "2024-05-01T10:00:00+00:00"
        }),
        json!({
            "id": 2,
            "title": "Plain article",
            "description": "Just prose.",
            "summary": "Just prose.",
            "date": "2024-04-01"
        }),
    ]
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    apikey == Some(KEY) && bearer == Some("Bearer test-key")
}

async fn list_posts(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let rows: Vec<Value> = match params.get("id") {
        Some(filter) => {
            let id = filter.trim_start_matches("eq.");
            rows()
                .into_iter()
                .filter(|row| row["id"].as_str() == Some(id) || row["id"].to_string() == id)
                .collect()
        }
        None => {
            if params.get("order").map(String::as_str) != Some("created_at.desc") {
                return Err(StatusCode::BAD_REQUEST);
            }
            rows()
        }
    };
    Ok(Json(Value::Array(rows.into_iter().take(limit).collect())))
}

async fn patch_post(
    State(patches): State<Patches>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let id = params.get("id").cloned().unwrap_or_default();
    patches.lock().unwrap().push((id, body));
    StatusCode::NO_CONTENT
}

async fn openapi() -> Json<Value> {
    Json(json!({
        "definitions": {
            "journal_posts": {
                "properties": { "id": {}, "summary": {}, "created_at": {} }
            }
        }
    }))
}

async fn serve() -> (String, Patches) {
    let patches: Patches = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/rest/v1/", get(openapi))
        .route("/rest/v1/journal_posts", get(list_posts).patch(patch_post))
        .with_state(patches.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/", addr), patches)
}

#[tokio::test]
async fn test_fetch_posts_sends_credentials_and_parses_rows() {
    let (url, _) = serve().await;
    let client = SupabaseClient::new(ApiConfig::new(&url, KEY).unwrap()).unwrap();

    let posts = client.fetch_posts(12).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].id.as_deref(), Some("2"));

    let limited = client.fetch_posts(1).await.unwrap();
    assert_eq!(limited.len(), 1);

    let post = client.fetch_post("p1").await.unwrap().unwrap();
    assert_eq!(post.content_lite.as_deref(), Some("Lite text"));
    assert!(client.fetch_post("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejected_key_is_an_api_error_but_journal_falls_back() {
    let (url, _) = serve().await;
    let config = ApiConfig::new(&url, "wrong").unwrap();

    let client = SupabaseClient::new(config.clone()).unwrap();
    match client.fetch_posts(12).await {
        Err(Error::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected an API error, got {:?}", other),
    }

    let journal = Journal::from_config(Some(config)).unwrap();
    assert_eq!(journal.list(12).await.len(), journal_posts().len());
    assert!(journal.article("p1").await.is_none());
}

#[tokio::test]
async fn test_journal_renders_hosted_article() {
    let (url, _) = serve().await;
    let journal = Journal::from_config(Some(ApiConfig::new(&url, KEY).unwrap())).unwrap();

    let articles = journal.list(12).await;
    assert_eq!(articles.len(), journal_posts().len() + 2);

    let article = journal.article("p1").await.unwrap();
    match article.render(ViewMode::BpPlus) {
        RenderedView::Sections { sections } => {
            assert_eq!(sections.introduction, "Intro");
            assert_eq!(sections.essence, "Core");
            assert_eq!(sections.recommendation, "Advice");
        }
        other => panic!("expected sections, got {:?}", other),
    }
    assert_eq!(
        article.render(ViewMode::Lite),
        RenderedView::Markdown { text: "Lite text".to_string() }
    );
}

#[tokio::test]
async fn test_migrate_patches_literal_rows() {
    let (url, patches) = serve().await;
    let client = SupabaseClient::new(ApiConfig::new(&url, KEY).unwrap()).unwrap();

    let dry = migrate(&client, 2, true).await.unwrap();
    assert_eq!(dry.column, "summary");
    assert_eq!(dry.updated, vec!["p1".to_string()]);
    assert!(patches.lock().unwrap().is_empty());

    let report = migrate(&client, 2, false).await.unwrap();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.updated, vec!["p1".to_string()]);

    let patches = patches.lock().unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].0, "eq.p1");
    assert_eq!(
        patches[0].1,
        json!({ "summary": "Intro\n\n[СУТЬ]\nCore\n\n[РЕКОМЕНДАЦИЯ]\nAdvice" })
    );
}
