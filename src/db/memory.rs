//! In-memory implementation of the repositories, used by tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repository::{CategoryRepository, QuestionRepository};
use super::{Category, NewQuestion, Question, Result, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    failing: AtomicBool,
}

#[derive(Default)]
struct Inner {
    categories: BTreeMap<i64, Category>,
    questions: BTreeMap<i64, Question>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let inner = Inner {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            ..Inner::default()
        };
        Self {
            inner: RwLock::new(inner),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every repository call fails with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    async fn filtered(&self, keep: impl Fn(&Question) -> bool) -> Result<Vec<Question>> {
        self.check()?;
        let inner = self.inner.read().await;
        Ok(inner.questions.values().filter(|q| keep(q)).cloned().collect())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>> {
        self.check()?;
        Ok(self.inner.read().await.categories.values().cloned().collect())
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Question>> {
        self.filtered(|_| true).await
    }

    async fn list_by_category(&self, category: i64) -> Result<Vec<Question>> {
        self.filtered(|q| q.category == Some(category)).await
    }

    async fn search(&self, term: &str) -> Result<Vec<Question>> {
        let term = term.to_lowercase();
        self.filtered(|q| {
            q.question
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&term))
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.check()?;
        Ok(self.inner.read().await.questions.get(&id).cloned())
    }

    async fn insert(&self, question: NewQuestion) -> Result<i64> {
        self.check()?;
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.questions.insert(id, question.into_question(id));
        Ok(id)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        self.check()?;
        Ok(self.inner.write().await.questions.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        self.check()?;
        Ok(self.inner.read().await.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: Some(text.to_owned()),
            category: Some(category),
            ..NewQuestion::default()
        }
    }

    #[tokio::test]
    async fn ids_increase_and_are_not_reused() {
        let store = MemoryStore::new();
        let a = store.insert(question("a", 1)).await.unwrap();
        let b = store.insert(question("b", 1)).await.unwrap();
        assert!(store.delete_by_id(b).await.unwrap());
        let c = store.insert(question("c", 1)).await.unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn search_ignores_case_and_skips_missing_text() {
        let store = MemoryStore::new();
        store.insert(question("What is the Title?", 2)).await.unwrap();
        store.insert(NewQuestion::default()).await.unwrap();

        let hits = store.search("TITLE").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(store.search("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failing_mode_rejects_every_call() {
        let store = MemoryStore::with_categories([Category {
            id: 1,
            kind: "Science".into(),
        }]);
        store.set_failing(true);
        assert!(matches!(
            CategoryRepository::list_all(&store).await,
            Err(StoreError::Unavailable)
        ));
        assert!(store.insert(NewQuestion::default()).await.is_err());

        store.set_failing(false);
        assert_eq!(CategoryRepository::list_all(&store).await.unwrap().len(), 1);
    }
}
