//! Running fetch requests on the host executor.

use std::rc::{Rc, Weak};

use futures::task::LocalSpawnExt;
use log::warn;

use super::Inner;
use crate::error::FetchError;
use crate::fetch::{FetchRequest, RequestSeq};
use crate::types::PagedResponse;

/// Completes its request when dropped without a result.
///
/// Every spawned fetch owns one, so the loading flag clears even when the
/// future is dropped by the executor or never gets to run.
pub(crate) struct LoadingGuard<T: 'static> {
    table: Weak<Inner<T>>,
    seq: RequestSeq,
    finished: bool,
}

impl<T: 'static> LoadingGuard<T> {
    pub(crate) fn new(table: Weak<Inner<T>>, seq: RequestSeq) -> Self {
        Self {
            table,
            seq,
            finished: false,
        }
    }

    pub(crate) fn finish(mut self, result: Result<PagedResponse<T>, FetchError>) {
        self.finished = true;
        if let Some(table) = self.table.upgrade() {
            table.apply(self.seq, result);
        }
    }
}

impl<T: 'static> Drop for LoadingGuard<T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!("fetch {} abandoned", self.seq);
        if let Some(table) = self.table.upgrade() {
            table.apply(self.seq, Err(FetchError::Abandoned(self.seq.get())));
        }
    }
}

/// Spawn the fetch for `request`. A spawn failure drops the future, and with
/// it the guard, which completes the request as abandoned.
pub(crate) fn spawn_fetch<T: 'static>(table: &Rc<Inner<T>>, request: FetchRequest) {
    let guard = LoadingGuard::new(Rc::downgrade(table), request.seq);
    let source = Rc::clone(&table.source);
    let seq = request.seq;
    let query = request.query;
    let fetch = async move {
        let result = source.fetch_page(query).await;
        guard.finish(result);
    };
    if let Err(err) = table.spawner.spawn_local(fetch) {
        warn!("could not spawn fetch {seq}: {err}");
    }
}
