//! The API end to end over a migrated SQLite database.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};
use trivia_api::db::QuestionRepository;

#[tokio::test]
async fn seeded_categories_are_served() {
    let (app, _) = build_sqlite_app().await;

    let (status, body) = get(&app, "/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_categories"], 6);
    assert_eq!(body["categories"][0], json!({"id": 1, "type": "Science"}));
}

#[tokio::test]
async fn empty_database_lists_404_until_a_question_is_created() {
    let (app, _) = build_sqlite_app().await;

    let (status, _) = get(&app, "/questions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = post_json(
        &app,
        "/questions",
        json!({"question": "Question", "answer": "Answer", "category": 1, "difficulty": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["created"].as_i64().unwrap() > 0);

    let (status, body) = get(&app, "/questions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 1);
    assert_eq!(body["questions"][0]["answer"], "Answer");
}

#[tokio::test]
async fn search_for_title() {
    let (app, store) = build_sqlite_app().await;
    let id = store
        .insert(new_question(
            "What is the title of the 1990 fantasy directed by Tim Burton?",
            5,
        ))
        .await
        .unwrap();
    seed_questions(&*store, 4).await;

    let (status, body) = post_json(&app, "/questions/search", json!({"searchTerm": "title"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body["questions"]), [id]);
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let (app, store) = build_sqlite_app().await;
    let id = store
        .insert(new_question("Qui a peint ÉTÉ à Giverny?", 2))
        .await
        .unwrap();
    seed_questions(&*store, 3).await;

    let (status, body) = post_json(&app, "/questions/search", json!({"searchTerm": "été"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["questions"]), [id]);
    assert_eq!(body["total_matches"], 1);

    let (_, body) = post_json(&app, "/questions/search", json!({"searchTerm": "GIVERNY"})).await;
    assert_eq!(ids(&body["questions"]), [id]);
}

#[tokio::test]
async fn delete_then_quiz_never_serves_deleted_question() {
    let (app, store) = build_sqlite_app().await;
    let seeded = seed_questions(&*store, 3).await;

    let (status, body) = delete(&app, &format!("/questions/{}", seeded[1])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 2);

    let (status, body) = delete(&app, &format!("/questions/{}", seeded[1])).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");

    let mut history: Vec<i64> = Vec::new();
    loop {
        let (status, body) = post_json(
            &app,
            "/quizzes",
            json!({"previous_questions": history, "quiz_category": {"id": 0}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        history = body["previous_questions"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        if body["question"].is_null() {
            break;
        }
    }
    history.sort_unstable();
    assert_eq!(history, [seeded[0], seeded[2]]);
}

#[tokio::test]
async fn questions_by_category_over_sqlite() {
    let (app, store) = build_sqlite_app().await;
    seed_questions(&*store, 6).await;

    let (status, body) = get(&app, "/categories/3/questions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["current_category"], 3);
}
