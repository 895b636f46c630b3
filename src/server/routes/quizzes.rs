use std::collections::HashSet;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::queries::questions;
use crate::db::Question;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::telemetry::QUIZ_QUESTION_CNTR;

#[derive(Deserialize)]
struct QuizPayload {
    #[serde(default)]
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

/// `id == 0` means the whole bank.
#[derive(Deserialize)]
struct QuizCategory {
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
}

/// Uniform draw over the candidates not yet seen this round. `None`
/// signals an exhausted round.
fn pick_unseen(candidates: &[Question], previous: &[i64]) -> Option<Question> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let unseen: Vec<&Question> = candidates
        .iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();
    unseen.choose(&mut rand::thread_rng()).map(|q| (*q).clone())
}

async fn take_quiz(
    State(pool): State<SqlitePool>,
    payload: Result<Json<QuizPayload>, JsonRejection>,
) -> ApiResult<QuizResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest)?;
    let candidates = if payload.quiz_category.id == 0 {
        questions::get_all_questions(&pool).await?
    } else {
        questions::get_questions_by_category(&pool, payload.quiz_category.id).await?
    };
    if candidates.is_empty() {
        return Err(ApiError::NotFound);
    }
    let question = pick_unseen(&candidates, &payload.previous_questions);
    if question.is_some() {
        let label = match payload.quiz_category.id {
            0 => "all".to_owned(),
            id => id.to_string(),
        };
        QUIZ_QUESTION_CNTR.with_label_values(&[label.as_str()]).inc();
    }
    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(take_quiz))
        .with_state(state)
}
