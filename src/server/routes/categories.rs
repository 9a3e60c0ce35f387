use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category_map, questions::get_questions},
        Question, QuestionFilter,
    },
    server::{
        app::AppState,
        deserializers::PageQuery,
        error::{ApiError, ApiResponse},
        pagination::paginate,
    },
};

use super::{ApiPath, ApiQuery};

#[derive(Serialize)]
struct CategoryList {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoryList> {
    let categories = get_category_map(&pool).await?;
    Ok(Json(CategoryList {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

async fn questions_by_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<CategoryQuestions> {
    let selection = get_questions(&pool, &QuestionFilter::in_category(id)).await?;
    let questions = paginate(&selection, page);
    let current_category = match questions.first() {
        Some(first) => first.category,
        None => return Err(ApiError::NotFound),
    };

    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        total_questions: selection.len(),
        current_category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_by_category))
        .with_state(state)
}
