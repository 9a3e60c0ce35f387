use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_questions, Question, QuestionFilter},
    server::{
        app::AppState,
        deserializers::deserialize_category_id,
        error::ApiResponse,
    },
    telemetry::QUIZ_QUESTION_CNTR,
};

use super::ApiJson;

// Both keys are required: a request without `quiz_category` is rejected even
// though an empty object is accepted and means "any category".
#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_category_id")]
    id: Option<i64>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let filter = QuestionFilter {
        category: request.quiz_category.id,
        exclude: request.previous_questions.into_iter().collect(),
        ..QuestionFilter::default()
    };
    let candidates = get_questions(&pool, &filter).await?;
    let question = candidates.choose(&mut rand::thread_rng()).cloned();

    if question.is_some() {
        let label = filter
            .category
            .map_or_else(|| "all".to_owned(), |id| id.to_string());
        QUIZ_QUESTION_CNTR.with_label_values(&[label.as_str()]).inc();
    }
    tracing::debug!(
        "Picked {:?} out of {} candidates",
        question.as_ref().map(|q| q.id),
        candidates.len()
    );

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
