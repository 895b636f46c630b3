use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::get_category;
use crate::db::queries::questions::get_questions_by_category;
use crate::db::{Category, Question};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::pagination::{page_slice, PageQuery};

use super::category_map;

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    categories: BTreeMap<i64, String>,
    current_category: Category,
    total_questions: usize,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResult<CategoriesResponse> {
    let categories = category_map(&pool).await?;
    Ok(Json(CategoriesResponse {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

/// Questions restricted to one category. An out-of-range page yields an
/// empty list rather than a 404, unlike the unfiltered listing.
async fn category_questions(
    State(pool): State<SqlitePool>,
    Path(category_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> ApiResult<CategoryQuestionsResponse> {
    let category = get_category(&pool, category_id)
        .await
        .map_err(ApiError::not_found)?
        .ok_or(ApiError::NotFound)?;
    let questions = get_questions_by_category(&pool, category.id)
        .await
        .map_err(ApiError::not_found)?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = category_map(&pool).await.map_err(ApiError::not_found)?;
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions: page_slice(&questions, page.page()).to_vec(),
        categories,
        current_category: category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route(
            "/categories/{category_id}/questions",
            get(category_questions),
        )
        .with_state(state)
}
