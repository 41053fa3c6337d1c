use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{Category, CategoryRepository, NewQuestion, Question, QuestionRepository},
    server::{
        app::AppState,
        error::{ApiError, ApiResult},
        pagination::{paginate, PageQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

// The add-question form posts category ids as strings, API clients as
// numbers.
#[derive(Deserialize)]
struct QuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl From<QuestionBody> for NewQuestion {
    fn from(body: QuestionBody) -> Self {
        NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    categories: Vec<Category>,
    total_questions: usize,
}

#[derive(Serialize)]
struct CreatedResponse {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    /// Display labels only.
    categories: Vec<String>,
    total_questions: usize,
}

#[derive(Serialize)]
struct DeletedResponse {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    questions: Vec<Question>,
    /// Size of the returned page, kept for existing clients.
    total_questions: usize,
    total_matches: usize,
}

/// Without `?page=` the whole table is returned. An empty table is a 404,
/// a page past the end is not.
async fn get_questions(
    State(questions): State<Arc<dyn QuestionRepository>>,
    State(categories): State<Arc<dyn CategoryRepository>>,
    query: PageQuery,
) -> ApiResult<Json<QuestionsResponse>> {
    let all = questions.list_all().await.map_err(ApiError::internal)?;
    if all.is_empty() {
        return Err(ApiError::not_found("no questions are stored"));
    }
    let categories = categories.list_all().await.map_err(ApiError::internal)?;
    let total_questions = questions.count().await.map_err(ApiError::internal)?;

    let questions = if query.is_requested() {
        paginate(&all, query.page()).to_vec()
    } else {
        all
    };

    Ok(Json(QuestionsResponse {
        success: true,
        questions,
        categories,
        total_questions,
    }))
}

async fn create_question(
    State(questions): State<Arc<dyn QuestionRepository>>,
    State(categories): State<Arc<dyn CategoryRepository>>,
    query: PageQuery,
    body: Result<Json<QuestionBody>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let Json(body) = body.map_err(ApiError::unprocessable)?;
    let created = questions
        .insert(body.into())
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id = created, "Question created");

    let all = questions.list_all().await.map_err(ApiError::unprocessable)?;
    let labels = categories
        .list_all()
        .await
        .map_err(ApiError::unprocessable)?
        .into_iter()
        .map(|c| c.kind)
        .collect();

    Ok(Json(CreatedResponse {
        success: true,
        created,
        questions: paginate(&all, query.page()).to_vec(),
        categories: labels,
        total_questions: all.len(),
    }))
}

// A missing id is reported as 422, not 404; clients depend on it. Ids that
// are not non-negative integers never match the route.
async fn delete_question(
    State(questions): State<Arc<dyn QuestionRepository>>,
    path: Result<Path<u64>, PathRejection>,
    query: PageQuery,
) -> ApiResult<Json<DeletedResponse>> {
    let Path(id) = path.map_err(ApiError::not_found)?;
    let id = i64::try_from(id).map_err(ApiError::not_found)?;
    let existing = questions
        .find_by_id(id)
        .await
        .map_err(ApiError::unprocessable)?;
    if existing.is_none() {
        return Err(ApiError::unprocessable(format_args!(
            "question {id} does not exist"
        )));
    }

    let removed = questions
        .delete_by_id(id)
        .await
        .map_err(ApiError::unprocessable)?;
    if !removed {
        return Err(ApiError::unprocessable(format_args!(
            "question {id} vanished before it could be deleted"
        )));
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    let remaining = questions.list_all().await.map_err(ApiError::unprocessable)?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
        questions: paginate(&remaining, query.page()).to_vec(),
        total_questions: remaining.len(),
    }))
}

async fn search_questions(
    State(questions): State<Arc<dyn QuestionRepository>>,
    query: PageQuery,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(body) = body.map_err(ApiError::not_found)?;
    let matches = questions
        .search(&body.search_term)
        .await
        .map_err(ApiError::not_found)?;
    let page = paginate(&matches, query.page()).to_vec();

    Ok(Json(SearchResponse {
        success: true,
        total_questions: page.len(),
        total_matches: matches.len(),
        questions: page,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
