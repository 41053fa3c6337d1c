//! Repository traits the HTTP layer talks to.
//!
//! Handlers never touch a pool directly; they receive trait objects through
//! the application state so tests can swap in [`MemoryStore`](super::MemoryStore).

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::queries::{categories, questions};
use super::{Category, NewQuestion, Question, Result};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id.
    async fn list_all(&self) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All questions ordered by id.
    async fn list_all(&self) -> Result<Vec<Question>>;

    /// Questions of one category ordered by id. Unknown categories yield an
    /// empty list.
    async fn list_by_category(&self, category: i64) -> Result<Vec<Question>>;

    /// Questions whose text contains `term`, ignoring case, ordered by id.
    async fn search(&self, term: &str) -> Result<Vec<Question>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>>;

    /// Stores the question and returns its freshly allocated id.
    async fn insert(&self, question: NewQuestion) -> Result<i64>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CategoryRepository for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Category>> {
        Ok(categories::get_all_categories(&self.pool).await?)
    }
}

#[async_trait]
impl QuestionRepository for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Question>> {
        Ok(questions::get_all_questions(&self.pool).await?)
    }

    async fn list_by_category(&self, category: i64) -> Result<Vec<Question>> {
        Ok(questions::get_questions_for_category(&self.pool, category).await?)
    }

    async fn search(&self, term: &str) -> Result<Vec<Question>> {
        Ok(questions::search_questions(&self.pool, term).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>> {
        Ok(questions::get_question_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, question: NewQuestion) -> Result<i64> {
        Ok(questions::create_question(&self.pool, question).await?)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        Ok(questions::delete_question(&self.pool, id).await?)
    }

    async fn count(&self) -> Result<usize> {
        let count = questions::count_questions(&self.pool).await?;
        row_count(count)
    }
}

fn row_count(count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
}
