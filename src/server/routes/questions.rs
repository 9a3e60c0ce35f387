use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_category_map,
            questions::{self, count_questions, get_all_questions, get_questions},
        },
        NewQuestion, Question, QuestionFilter,
    },
    server::{
        app::AppState,
        deserializers::PageQuery,
        error::{ApiError, ApiResponse},
        pagination::paginate,
    },
};

use super::{ApiJson, ApiPath, ApiQuery};

/// Body of `POST /questions`. A non-empty `searchTerm` turns the request into a
/// search; otherwise the remaining fields are stored as given.
#[derive(Deserialize)]
struct QuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
#[serde(untagged)]
enum CreatedOrFound {
    Found {
        success: bool,
        questions: Vec<Question>,
        total_questions: usize,
    },
    Created {
        success: bool,
        created: i64,
        questions: Vec<Question>,
        total_questions: i64,
    },
}

async fn get_questions_page(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let selection = get_all_questions(&pool).await?;
    let questions = paginate(&selection, page);
    let current_category = match questions.first() {
        Some(first) => first.category,
        None => return Err(ApiError::NotFound),
    };

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions: selection.len(),
        categories: get_category_map(&pool).await?,
        current_category,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<Deleted> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!("Deleted question {id}");

    let selection = get_all_questions(&pool).await?;
    Ok(Json(Deleted {
        success: true,
        deleted: id,
        questions: paginate(&selection, page),
        total_questions: selection.len(),
    }))
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
    ApiJson(body): ApiJson<QuestionBody>,
) -> ApiResponse<CreatedOrFound> {
    if let Some(term) = body.search_term.filter(|t| !t.is_empty()) {
        let selection = get_questions(&pool, &QuestionFilter::matching(term)).await?;
        return Ok(Json(CreatedOrFound::Found {
            success: true,
            questions: paginate(&selection, page),
            total_questions: selection.len(),
        }));
    }

    let created = questions::create_question(
        &pool,
        NewQuestion {
            question: body.question,
            answer: body.answer,
            difficulty: body.difficulty,
            category: body.category,
        },
    )
    .await?;
    tracing::info!("Created question {created}");

    let selection = get_all_questions(&pool).await?;
    Ok(Json(CreatedOrFound::Created {
        success: true,
        created,
        questions: paginate(&selection, page),
        total_questions: count_questions(&pool).await?,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions_page).post(create_or_search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
