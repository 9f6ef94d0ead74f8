//! Data sources: where pages come from.

use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use log::debug;

use crate::error::FetchError;
use crate::types::{PagedQuery, PagedResponse};

/// Async page provider.
///
/// The table is single-threaded, so implementations are not required to be
/// `Send`. `response.data.len() <= query.size` is expected but not checked.
#[async_trait(?Send)]
pub trait DataSource<T> {
    async fn fetch_page(&self, query: PagedQuery) -> Result<PagedResponse<T>, FetchError>;
}

#[async_trait(?Send)]
impl<T, S> DataSource<T> for Rc<S>
where
    S: DataSource<T> + ?Sized,
{
    async fn fetch_page(&self, query: PagedQuery) -> Result<PagedResponse<T>, FetchError> {
        (**self).fetch_page(query).await
    }
}

/// Rows held in memory and served page by page.
///
/// Pages past the end are clamped to the last page, and the response echoes
/// the page actually served.
#[derive(Debug, Clone, Default)]
pub struct MemorySource<T> {
    rows: Vec<T>,
}

impl<T: Clone> MemorySource<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Synchronous page lookup behind [`DataSource::fetch_page`].
    ///
    /// # Errors
    /// Returns [`FetchError::Source`] for a zero page size.
    pub fn page(&self, query: &PagedQuery) -> Result<PagedResponse<T>, FetchError> {
        if query.size == 0 {
            return Err(FetchError::Source("page size must be positive".to_string()));
        }
        let size = query.size as usize;
        let total = self.rows.len();
        let last_page = total.saturating_sub(1) / size;
        let page = (query.page as usize).min(last_page);
        let data: Vec<T> = self
            .rows
            .iter()
            .skip(page * size)
            .take(size)
            .cloned()
            .collect();
        debug!(
            "memory source served page {page} ({} of {total} rows)",
            data.len()
        );
        Ok(PagedResponse::new(
            data,
            u32::try_from(page).unwrap_or(query.page),
            query.size,
            total as u64,
        ))
    }
}

#[async_trait(?Send)]
impl<T: Clone> DataSource<T> for MemorySource<T> {
    async fn fetch_page(&self, query: PagedQuery) -> Result<PagedResponse<T>, FetchError> {
        self.page(&query)
    }
}

/// Adapts an async closure into a [`DataSource`].
pub struct FnSource<F>(pub F);

#[async_trait(?Send)]
impl<T, F, Fut> DataSource<T> for FnSource<F>
where
    T: 'static,
    F: Fn(PagedQuery) -> Fut,
    Fut: Future<Output = Result<PagedResponse<T>, FetchError>> + 'static,
{
    async fn fetch_page(&self, query: PagedQuery) -> Result<PagedResponse<T>, FetchError> {
        (self.0)(query).await
    }
}
