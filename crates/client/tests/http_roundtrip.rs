//! Round-trips against a local article service.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wsearch_client::{HttpClient, HttpConfig};
use wsearch_core::{ArticlesApi, QueryCache, QueryStatus, RemoteClient};

#[derive(Clone, Default)]
struct Hits {
    articles: Arc<AtomicUsize>,
    created: Arc<AtomicUsize>,
}

async fn list_articles(State(hits): State<Hits>) -> Json<Value> {
    hits.articles.fetch_add(1, Ordering::SeqCst);
    let mut articles = vec![json!({"title": "Ada Lovelace", "tokenized_content": ["ada", "lovelace"]})];
    if hits.created.load(Ordering::SeqCst) > 0 {
        articles.push(json!({"title": "Grace Hopper", "tokenized_content": "grace,hopper"}));
    }
    Json(Value::Array(articles))
}

async fn create_articles(State(hits): State<Hits>) -> (StatusCode, Json<Value>) {
    hits.created.fetch_add(1, Ordering::SeqCst);
    (StatusCode::CREATED, Json(json!([{"title": "Grace Hopper", "tokenized_content": null}])))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let term = params.get("query").cloned().unwrap_or_default();
    if term.is_empty() {
        return Json(json!([]));
    }
    Json(json!([{"title": term, "ranking": 1.5}]))
}

async fn spawn_service(hits: Hits) -> String {
    let router = Router::new()
        .route("/", get(|| async { Json(json!({"message": "Welcome!"})) }))
        .route("/articles", get(list_articles).post(create_articles))
        .route("/search", get(search))
        .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "index unavailable") }))
        .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
        .route("/empty", get(|| async { StatusCode::OK }))
        .route("/html", get(|| async { "<html></html>" }))
        .with_state(hits);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> HttpClient {
    HttpClient::new(HttpConfig { base_url, ..Default::default() }).unwrap()
}

#[tokio::test]
async fn test_get_decodes_json() {
    let client = client(spawn_service(Hits::default()).await);

    let body = client.get("/articles", &[]).await.unwrap();

    assert_eq!(body[0]["title"], "Ada Lovelace");
}

#[tokio::test]
async fn test_get_encodes_query_pairs() {
    let client = client(spawn_service(Hits::default()).await);

    let hit = client.get("/search", &[("query", "ada & grace")]).await.unwrap();
    let empty = client.get("/search", &[("query", "")]).await.unwrap();

    assert_eq!(hit[0]["title"], "ada & grace");
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn test_post_returns_created_body() {
    let client = client(spawn_service(Hits::default()).await);

    let body = client.post("/articles", &json!({})).await.unwrap();

    assert_eq!(body[0]["title"], "Grace Hopper");
}

#[tokio::test]
async fn test_non_success_maps_status_and_body() {
    let client = client(spawn_service(Hits::default()).await);

    let err = client.get("/broken", &[]).await.unwrap_err();
    assert_eq!(err.status, Some(500));
    assert_eq!(err.message, "index unavailable");

    let err = client.get("/teapot", &[]).await.unwrap_err();
    assert_eq!(err.status, Some(418));
    assert_eq!(err.message, "I'm a teapot");

    let err = client.get("/missing", &[]).await.unwrap_err();
    assert_eq!(err.status, Some(404));
}

#[tokio::test]
async fn test_empty_body_is_null_and_html_is_decode_error() {
    let client = client(spawn_service(Hits::default()).await);

    assert_eq!(client.get("/empty", &[]).await.unwrap(), Value::Null);

    let err = client.get("/html", &[]).await.unwrap_err();
    assert_eq!(err.status, None);
    assert!(err.message.contains("invalid response body"));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}")).get("/articles", &[]).await.unwrap_err();

    assert_eq!(err.status, None);
    assert!(err.message.contains("network error"));
}

#[tokio::test]
async fn test_base_url_trailing_slash_is_tolerated() {
    let base = spawn_service(Hits::default()).await;
    let client = client(format!("{base}/"));

    let health = client.get("/", &[]).await.unwrap();

    assert_eq!(health["message"], "Welcome!");
}

#[tokio::test]
async fn test_api_over_http_dedups_and_refetches_after_mutation() {
    let hits = Hits::default();
    let client = Arc::new(client(spawn_service(hits.clone()).await));
    let api = ArticlesApi::new(client, QueryCache::default());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let api = api.clone();
            tokio::spawn(async move { api.articles().await })
        })
        .collect();
    for reader in readers {
        let state = reader.await.unwrap();
        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.data.unwrap().len(), 1);
    }
    assert_eq!(hits.articles.load(Ordering::SeqCst), 1);

    let added = api.fetch_new_articles().await.unwrap();
    assert_eq!(added[0].title, "Grace Hopper");

    let refreshed = api.articles().await;
    api.articles().await;
    assert_eq!(refreshed.data.unwrap().len(), 2);
    assert_eq!(hits.articles.load(Ordering::SeqCst), 2);

    let search = api.search("Grace Hopper").await;
    assert_eq!(search.data.unwrap()[0].title, "Grace Hopper");
    assert_eq!(api.health().await.unwrap().message, "Welcome!");
}
