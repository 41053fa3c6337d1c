#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use trivia_api::db::{self, Category, MemoryStore, NewQuestion, QuestionRepository, SqliteStore};
use trivia_api::server::app::{router, AppState};

pub fn default_categories() -> Vec<Category> {
    ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        .into_iter()
        .zip(1..)
        .map(|(kind, id)| Category {
            id,
            kind: kind.to_owned(),
        })
        .collect()
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_categories(default_categories()))
}

pub fn build_app(store: Arc<MemoryStore>) -> Router {
    router(AppState::from_store(store))
}

/// Router over a migrated in-memory SQLite database, plus the store for
/// seeding.
pub async fn build_sqlite_app() -> (Router, Arc<SqliteStore>) {
    let pool = db::establish_in_memory().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let store = Arc::new(SqliteStore::new(pool));
    (router(AppState::from_store(store.clone())), store)
}

pub fn new_question(text: &str, category: i64) -> NewQuestion {
    NewQuestion {
        question: Some(text.to_owned()),
        answer: Some(format!("answer to {text}")),
        category: Some(category),
        difficulty: Some(2),
    }
}

/// Inserts `count` questions cycling through categories 1..=3.
pub async fn seed_questions(store: &dyn QuestionRepository, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let category = (n % 3) as i64 + 1;
        let id = store
            .insert(new_question(&format!("Question number {n}?"), category))
            .await
            .unwrap();
        ids.push(id);
    }
    ids
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// POST with no body and no content type.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::post(uri).body(Body::empty()).unwrap()).await
}

pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert_eq!(body["message"], message);
}

pub fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}
