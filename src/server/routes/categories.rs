use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::{Category, CategoryRepository, Question, QuestionRepository},
    server::{
        app::AppState,
        error::{ApiError, ApiResult},
        pagination::{paginate, PageQuery},
    },
};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: Vec<Category>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    /// Size of the returned page.
    total_questions: usize,
    total_matches: usize,
    current_category: i64,
}

async fn get_categories(
    State(categories): State<Arc<dyn CategoryRepository>>,
) -> ApiResult<Json<CategoriesResponse>> {
    let categories = categories.list_all().await.map_err(ApiError::internal)?;
    if categories.is_empty() {
        return Err(ApiError::not_found("no categories are stored"));
    }
    Ok(Json(CategoriesResponse {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

async fn get_questions_by_category(
    State(questions): State<Arc<dyn QuestionRepository>>,
    path: Result<Path<u64>, PathRejection>,
    query: PageQuery,
) -> ApiResult<Json<CategoryQuestionsResponse>> {
    let Path(category_id) = path.map_err(ApiError::not_found)?;
    let category_id = i64::try_from(category_id).map_err(ApiError::not_found)?;
    let matches = questions
        .list_by_category(category_id)
        .await
        .map_err(ApiError::not_found)?;
    let page = paginate(&matches, query.page()).to_vec();

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: page.len(),
        total_matches: matches.len(),
        questions: page,
        current_category: category_id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_questions_by_category))
        .with_state(state)
}
