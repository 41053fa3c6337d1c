use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(usize);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Anything below 1 is clamped to the first page.
    pub fn new(number: i64) -> Self {
        Page(usize::try_from(number).unwrap_or(0).max(1))
    }

    pub fn number(self) -> usize {
        self.0
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::FIRST
    }
}

/// The `?page=` query parameter, kept raw so a garbled value falls back to
/// the first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// Whether the client asked for a page at all.
    pub fn is_requested(&self) -> bool {
        self.page.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn page(&self) -> Page {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(Page::new)
            .unwrap_or_default()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Query::<PageQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default())
    }
}

/// `items[(page-1)*10 .. page*10]`, truncated at the end of `items`.
pub fn paginate<T>(items: &[T], page: Page) -> &[T] {
    let start = (page.number() - 1).saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
