use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Text fields and ratings are nullable: questions are stored exactly as they
/// were submitted.
#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub difficulty: Option<i64>,
    pub category: Option<i64>,
}

#[derive(Debug, Default, Clone)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub difficulty: Option<i64>,
    pub category: Option<i64>,
}

/// Conditions are ANDed together; an empty filter selects every question.
#[derive(Debug, Default, Clone)]
pub struct QuestionFilter {
    pub category: Option<i64>,
    /// Case-insensitive (Unicode-aware) substring of the question text.
    pub search: Option<String>,
    pub exclude: HashSet<i64>,
}

impl QuestionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(category: i64) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn matching(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }
}

// Only the category test runs in SQL. SQLite's `lower()` folds ASCII alone and
// caps bind parameters, so text search and exclusion are applied to the rows.
pub async fn get_questions(
    pool: &SqlitePool,
    filter: &QuestionFilter,
) -> sqlx::Result<Vec<Question>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, question, answer, difficulty, category FROM questions",
    );
    if let Some(category) = filter.category {
        query.push(" WHERE category = ").push_bind(category);
    }
    query.push(" ORDER BY id");

    let rows = query.build_query_as::<Question>().fetch_all(pool).await?;
    let term = filter.search.as_deref().map(str::to_lowercase);
    Ok(rows
        .into_iter()
        .filter(|q| !filter.exclude.contains(&q.id))
        .filter(|q| match &term {
            Some(term) => q
                .question
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(term.as_str())),
            None => true,
        })
        .collect())
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    get_questions(pool, &QuestionFilter::all()).await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, difficulty, category
FROM questions
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn create_question(pool: &SqlitePool, new: NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new.question)
    .bind(new.answer)
    .bind(new.difficulty)
    .bind(new.category)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no question had this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let deleted = sqlx::query("DELETE FROM questions WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(deleted > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for q in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    difficulty = excluded.difficulty,
    category = excluded.category
            "#,
        )
        .bind(q.id)
        .bind(q.question)
        .bind(q.answer)
        .bind(q.difficulty)
        .bind(q.category)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: Some(text.to_owned()),
            answer: Some("answer".to_owned()),
            difficulty: Some(1),
            category: Some(category),
        }
    }

    async fn seeded() -> SqlitePool {
        let pool = db::in_memory().await.unwrap();
        for (text, category) in [
            ("What is the title of the 1990 fantasy film?", 5),
            ("Which planet is the hottest?", 1),
            ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", 4),
            ("What movie earned Tom Hanks his third straight Oscar nomination?", 5),
            ("Which is the only team to play in every soccer World Cup?", 6),
        ] {
            create_question(&pool, new_question(text, category))
                .await
                .unwrap();
        }
        pool
    }

    fn ids(questions: &[Question]) -> Vec<i64> {
        questions.iter().map(|q| q.id).collect()
    }

    #[tokio::test]
    async fn created_questions_get_increasing_ids() {
        let pool = seeded().await;
        let questions = get_all_questions(&pool).await.unwrap();
        assert_eq!(ids(&questions), vec![1, 2, 3, 4, 5]);
        assert_eq!(count_questions(&pool).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn filter_by_category() {
        let pool = seeded().await;
        let questions = get_questions(&pool, &QuestionFilter::in_category(5))
            .await
            .unwrap();
        assert_eq!(ids(&questions), vec![1, 4]);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let pool = seeded().await;
        let questions = get_questions(&pool, &QuestionFilter::matching("TITLE"))
            .await
            .unwrap();
        assert_eq!(ids(&questions), vec![1, 3]);

        let questions = get_questions(&pool, &QuestionFilter::matching("which"))
            .await
            .unwrap();
        assert_eq!(ids(&questions), vec![2, 5]);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let pool = seeded().await;
        let questions = get_questions(&pool, &QuestionFilter::matching("%"))
            .await
            .unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = seeded().await;
        create_question(&pool, new_question("Où se trouve l'ÉCOLE polytechnique?", 3))
            .await
            .unwrap();
        let questions = get_questions(&pool, &QuestionFilter::matching("école"))
            .await
            .unwrap();
        assert_eq!(ids(&questions), vec![6]);
    }

    #[tokio::test]
    async fn exclusion_accepts_more_ids_than_sqlite_binds() {
        let pool = seeded().await;
        let filter = QuestionFilter {
            exclude: (1..=40_000).filter(|id| *id != 4).collect(),
            ..QuestionFilter::default()
        };
        let questions = get_questions(&pool, &filter).await.unwrap();
        assert_eq!(ids(&questions), vec![4]);
    }

    #[tokio::test]
    async fn exclusion_combines_with_category() {
        let pool = seeded().await;
        let filter = QuestionFilter {
            category: Some(5),
            exclude: HashSet::from([1, 2]),
            ..QuestionFilter::default()
        };
        let questions = get_questions(&pool, &filter).await.unwrap();
        assert_eq!(ids(&questions), vec![4]);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = seeded().await;
        assert!(delete_question(&pool, 3).await.unwrap());
        assert!(!delete_question(&pool, 3).await.unwrap());
        assert_eq!(get_question(&pool, 3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let pool = seeded().await;
        delete_question(&pool, 5).await.unwrap();
        let id = create_question(&pool, new_question("Another?", 1))
            .await
            .unwrap();
        assert_eq!(id, 6);
    }

    #[tokio::test]
    async fn empty_fields_are_stored_as_null() {
        let pool = db::in_memory().await.unwrap();
        let id = create_question(&pool, NewQuestion::default()).await.unwrap();
        let stored = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(
            stored,
            Question {
                id,
                question: None,
                answer: None,
                difficulty: None,
                category: None,
            }
        );
    }

    #[tokio::test]
    async fn import_keeps_explicit_ids() {
        let pool = db::in_memory().await.unwrap();
        import_questions(
            &pool,
            vec![Question {
                id: 20,
                question: Some("Imported?".to_owned()),
                answer: Some("Yes".to_owned()),
                difficulty: Some(2),
                category: Some(1),
            }],
        )
        .await
        .unwrap();

        assert!(get_question(&pool, 20).await.unwrap().is_some());
        let next = create_question(&pool, new_question("Next?", 1))
            .await
            .unwrap();
        assert_eq!(next, 21);
    }
}
