use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    db::QuestionRepository,
    server::{
        app::AppState,
        error::{ApiError, ApiResult},
        quiz::{self, QuizRound, ALL_CATEGORIES},
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

// The frontend echoes the whole category object back, `type` included;
// only the id matters here.
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    #[serde(flatten)]
    round: QuizRound,
}

async fn play_quiz(
    State(questions): State<Arc<dyn QuestionRepository>>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResult<Json<QuizResponse>> {
    let Json(request) = body.map_err(ApiError::unprocessable)?;
    let category = request.quiz_category.id;

    let candidates = if category == ALL_CATEGORIES {
        questions.list_all().await
    } else {
        questions.list_by_category(category).await
    }
    .map_err(ApiError::unprocessable)?;

    let round = quiz::next_question(
        candidates,
        request.previous_questions,
        &mut rand::thread_rng(),
    );
    if round.question.is_some() {
        let scope = if category == ALL_CATEGORIES {
            "all".to_owned()
        } else {
            category.to_string()
        };
        QUIZ_QUESTIONS_SERVED
            .with_label_values(&[scope.as_str()])
            .inc();
    } else {
        tracing::debug!(category, "Quiz exhausted");
    }

    Ok(Json(QuizResponse {
        success: true,
        round,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
