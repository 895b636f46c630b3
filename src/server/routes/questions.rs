use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::queries::questions;
use crate::db::Question;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::pagination::{page_slice, PageQuery};

use super::category_map;

/// `POST /questions` is overloaded: a payload carrying a non-empty
/// `searchTerm` searches the bank, anything else creates a question.
#[derive(Deserialize)]
struct QuestionPayload {
    question: Option<String>,
    answer: Option<String>,
    category: Option<i64>,
    difficulty: Option<i64>,
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    categories: BTreeMap<i64, String>,
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
struct CreatedResponse {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    categories: BTreeMap<i64, String>,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(page): Query<PageQuery>,
) -> ApiResult<QuestionsResponse> {
    let all = questions::get_all_questions(&pool).await?;
    let current = page_slice(&all, page.page());
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(QuestionsResponse {
        success: true,
        total_questions: all.len(),
        questions: current.to_vec(),
        categories: category_map(&pool).await?,
    }))
}

async fn remove_question(
    State(pool): State<SqlitePool>,
    Path(question_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> ApiResult<DeletedResponse> {
    questions::get_question(&pool, question_id)
        .await
        .map_err(ApiError::not_found)?
        .ok_or(ApiError::NotFound)?;
    questions::delete_question(&pool, question_id)
        .await
        .map_err(ApiError::not_found)?;
    let remaining = questions::get_all_questions(&pool)
        .await
        .map_err(ApiError::not_found)?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: question_id,
        total_questions: remaining.len(),
        questions: page_slice(&remaining, page.page()).to_vec(),
    }))
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    Query(page): Query<PageQuery>,
    payload: Result<Json<QuestionPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest)?;

    if let Some(term) = payload.search_term.as_deref().filter(|t| !t.is_empty()) {
        return search(&pool, term, page.page()).await;
    }

    let question = non_empty(payload.question.as_deref())?;
    let answer = non_empty(payload.answer.as_deref())?;
    let category = payload.category.ok_or(ApiError::Unprocessable)?;
    let difficulty = payload.difficulty.ok_or(ApiError::Unprocessable)?;

    let created = questions::create_question(&pool, question, answer, category, difficulty)
        .await
        .map_err(ApiError::unprocessable)?;
    let all = questions::get_all_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;
    let current = page_slice(&all, page.page());
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = category_map(&pool).await.map_err(ApiError::unprocessable)?;
    Ok(Json(CreatedResponse {
        success: true,
        created,
        total_questions: all.len(),
        questions: current.to_vec(),
        categories,
    })
    .into_response())
}

async fn search(pool: &SqlitePool, term: &str, page: usize) -> Result<Response, ApiError> {
    let matches = questions::search_questions(pool, term)
        .await
        .map_err(ApiError::unprocessable)?;
    // An empty match page is still a successful search. total_questions
    // reports the size of the whole bank, not the match count.
    let total = questions::get_all_questions(pool)
        .await
        .map_err(ApiError::unprocessable)?
        .len();
    let categories = category_map(pool).await.map_err(ApiError::unprocessable)?;
    Ok(Json(QuestionsResponse {
        success: true,
        questions: page_slice(&matches, page).to_vec(),
        total_questions: total,
        categories,
    })
    .into_response())
}

fn non_empty(field: Option<&str>) -> Result<&str, ApiError> {
    field.filter(|v| !v.is_empty()).ok_or(ApiError::Unprocessable)
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_or_search))
        .route("/questions/{question_id}", delete(remove_question))
        .with_state(state)
}
