//! Paginated fetch state machine.
//!
//! The machine is sans-io: transitions return a [`FetchRequest`] describing
//! what to fetch, and the caller feeds the outcome back through
//! [`FetchMachine::complete`]. Every request carries a [`RequestSeq`]; only
//! the most recently issued one may change state.

mod source;

#[cfg(target_arch = "wasm32")]
mod js;

pub use source::{DataSource, FnSource, MemorySource};

#[cfg(target_arch = "wasm32")]
pub use js::JsDataSource;

use std::fmt;

use log::{debug, trace, warn};

use crate::config::PaginationConfig;
use crate::error::FetchError;
use crate::types::{PagedQuery, PagedResponse};

/// Monotonically increasing request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a successful response is allowed to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Rows, total, page and size.
    Page,
    /// Rows only.
    Reload,
}

/// A fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: RequestSeq,
    pub kind: FetchKind,
    pub query: PagedQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Loading,
    Loaded,
}

/// Outcome of feeding a result back into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The response was written into the state.
    Applied,
    /// The current request failed; loading is cleared, nothing else changed.
    Failed(FetchError),
    /// The request was superseded; the state is untouched.
    Stale,
}

impl Completion {
    pub fn is_stale(&self) -> bool {
        matches!(self, Completion::Stale)
    }
}

/// Everything the table displays about the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// One-based page.
    pub page: u32,
    pub size: u32,
    pub loading: bool,
    pub data_source: Vec<T>,
    pub total: u64,
}

#[derive(Debug)]
pub struct FetchMachine<T> {
    state: FetchState<T>,
    sort: Option<String>,
    filter: Option<String>,
    last_seq: u64,
    current: Option<(RequestSeq, FetchKind)>,
}

impl<T> FetchMachine<T> {
    /// New machine in the loading phase. Nothing is issued until
    /// [`mount`](Self::mount).
    pub fn new(defaults: &PaginationConfig) -> Self {
        Self {
            state: FetchState {
                page: defaults.current.max(1),
                size: defaults.page_size.max(1),
                loading: true,
                data_source: Vec::new(),
                total: defaults.total,
            },
            sort: None,
            filter: None,
            last_seq: 0,
            current: None,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn phase(&self) -> FetchPhase {
        if self.state.loading {
            FetchPhase::Loading
        } else {
            FetchPhase::Loaded
        }
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn size(&self) -> u32 {
        self.state.size
    }

    pub fn total(&self) -> u64 {
        self.state.total
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn rows(&self) -> &[T] {
        &self.state.data_source
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Sequence number of the request still awaited, if any.
    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.current.map(|(seq, _)| seq)
    }

    /// Wire query for the current page and criteria.
    pub fn query(&self) -> PagedQuery {
        PagedQuery {
            page: self.state.page.saturating_sub(1),
            size: self.state.size,
            sort: self.sort.clone(),
            filter: self.filter.clone(),
        }
    }

    /// Initial fetch with the configured page and size.
    pub fn mount(&mut self) -> FetchRequest {
        self.issue(FetchKind::Page)
    }

    /// User picked another page. Same page issues nothing.
    pub fn page_changed(&mut self, page: u32) -> Option<FetchRequest> {
        let page = page.max(1);
        if page == self.state.page {
            trace!("page {page} already current");
            return None;
        }
        self.state.page = page;
        Some(self.issue(FetchKind::Page))
    }

    /// User picked another page size; the page goes back to 1.
    pub fn size_changed(&mut self, size: u32) -> Option<FetchRequest> {
        if size == 0 {
            warn!("ignoring page size 0");
            return None;
        }
        if size == self.state.size && self.state.page == 1 {
            return None;
        }
        self.state.size = size;
        self.state.page = 1;
        Some(self.issue(FetchKind::Page))
    }

    /// Refetch the current page, replacing only the rows on success.
    ///
    /// A reload that supersedes a pending page fetch takes over its kind so
    /// the server's page, size and total are still applied.
    pub fn reload(&mut self) -> FetchRequest {
        let kind = match self.current {
            Some((_, FetchKind::Page)) => FetchKind::Page,
            _ => FetchKind::Reload,
        };
        self.issue(kind)
    }

    /// New sort or filter criteria; the page goes back to 1.
    pub fn query_changed(
        &mut self,
        sort: Option<String>,
        filter: Option<String>,
    ) -> Option<FetchRequest> {
        if sort == self.sort && filter == self.filter {
            return None;
        }
        self.sort = sort;
        self.filter = filter;
        self.state.page = 1;
        Some(self.issue(FetchKind::Page))
    }

    /// Feed back the result of request `seq`.
    pub fn complete(
        &mut self,
        seq: RequestSeq,
        result: Result<PagedResponse<T>, FetchError>,
    ) -> Completion {
        let kind = match self.current {
            Some((current, kind)) if current == seq => kind,
            _ => {
                debug!("dropping stale response {seq}");
                return Completion::Stale;
            }
        };
        self.current = None;
        self.state.loading = false;

        match result {
            Ok(response) => {
                debug!(
                    "request {seq} loaded {} rows (page {}, total {})",
                    response.data.len(),
                    response.page,
                    response.total
                );
                self.state.data_source = response.data;
                if kind == FetchKind::Page {
                    self.state.total = response.total;
                    self.state.page = response.page.saturating_add(1);
                    if response.size > 0 {
                        self.state.size = response.size;
                    }
                }
                Completion::Applied
            }
            Err(err) => {
                warn!("request {seq} failed: {err}");
                Completion::Failed(err)
            }
        }
    }

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        self.last_seq += 1;
        let seq = RequestSeq(self.last_seq);
        if let Some((superseded, _)) = self.current.replace((seq, kind)) {
            trace!("request {superseded} superseded by {seq}");
        }
        self.state.loading = true;
        let query = self.query();
        debug!(
            "issuing {kind:?} request {seq}: page {} size {}",
            query.page, query.size
        );
        FetchRequest { seq, kind, query }
    }
}
