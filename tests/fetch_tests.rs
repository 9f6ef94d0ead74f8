//! Fetch state machine tests
//!
//! Covers the transitions of the paginated fetch machine, the sequence guard
//! that drops superseded responses, and the loading guarantees of the table
//! when fetches fail or are abandoned.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use panegrid::{
    Column, Completion, DataSource, DataTable, FetchError, FetchKind, FetchMachine, FetchPhase,
    MemorySource, PagedQuery, PagedResponse, PaginationConfig, TableConfig, TableEvent,
};
use serde_json::{json, Value};
use test_case::test_case;

// ============================================================================
// Test Helpers
// ============================================================================

fn machine() -> FetchMachine<Value> {
    FetchMachine::new(&PaginationConfig::default())
}

fn page(ids: &[u32], page: u32, size: u32, total: u64) -> PagedResponse<Value> {
    PagedResponse::new(
        ids.iter().map(|id| json!({ "id": id })).collect(),
        page,
        size,
        total,
    )
}

fn ids(rows: &[Value]) -> Vec<u64> {
    rows.iter().map(|r| r["id"].as_u64().unwrap()).collect()
}

type Reply = oneshot::Sender<Result<PagedResponse<Value>, FetchError>>;

/// Data source whose responses are sent by the test, in any order.
#[derive(Default)]
struct ManualSource {
    pending: RefCell<Vec<(PagedQuery, Reply)>>,
}

impl ManualSource {
    fn take(&self) -> Vec<(PagedQuery, Reply)> {
        self.pending.borrow_mut().drain(..).collect()
    }
}

#[async_trait(?Send)]
impl DataSource<Value> for ManualSource {
    async fn fetch_page(&self, query: PagedQuery) -> Result<PagedResponse<Value>, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((query, tx));
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Source("reply dropped".into())))
    }
}

fn columns() -> Vec<Column<Value>> {
    vec![Column::leaf("Id").data_index("id").into()]
}

fn manual_table() -> (LocalPool, Rc<ManualSource>, DataTable<Value>) {
    let pool = LocalPool::new();
    let source = Rc::new(ManualSource::default());
    let table = DataTable::new(
        TableConfig::new("id", columns()).pagination(PaginationConfig::default()),
        Rc::clone(&source),
        pool.spawner(),
    )
    .unwrap();
    (pool, source, table)
}

// ============================================================================
// Machine Transitions
// ============================================================================

#[test]
fn test_initial_state_uses_pagination_defaults() {
    let m = machine();
    assert_eq!(m.phase(), FetchPhase::Loading, "machine starts loading");
    assert_eq!((m.page(), m.size(), m.total()), (1, 10, 0));
    assert!(m.rows().is_empty());
}

#[test]
fn test_mount_sends_zero_based_page() {
    let mut m = FetchMachine::<Value>::new(&PaginationConfig {
        current: 3,
        page_size: 25,
        ..PaginationConfig::default()
    });
    let request = m.mount();
    assert_eq!(request.kind, FetchKind::Page);
    assert_eq!(request.query, PagedQuery::new(2, 25));
}

#[test]
fn test_fetch_success_postconditions() {
    let mut m = machine();
    let request = m.mount();
    let completion = m.complete(request.seq, Ok(page(&[1, 2, 3], 0, 10, 31)));

    assert_eq!(completion, Completion::Applied);
    assert_eq!(ids(m.rows()), vec![1, 2, 3]);
    assert_eq!(m.total(), 31);
    assert_eq!(m.page(), 1, "page is the served zero-based page plus one");
    assert_eq!(m.size(), 10);
    assert!(!m.is_loading());
    assert_eq!(m.phase(), FetchPhase::Loaded);
    assert!(m.in_flight().is_none());
}

#[test]
fn test_server_page_and_size_are_authoritative() {
    let mut m = machine();
    let request = m.page_changed(9).unwrap();
    assert_eq!(request.query.page, 8);

    m.complete(request.seq, Ok(page(&[21], 2, 20, 41)));
    assert_eq!((m.page(), m.size()), (3, 20));
    assert!(m.in_flight().is_none(), "reconciling page does not refetch");
}

#[test]
fn test_size_changed_resets_page() {
    let mut m = machine();
    let request = m.mount();
    m.complete(request.seq, Ok(page(&[], 2, 10, 50)));
    assert_eq!(m.page(), 3);

    let request = m.size_changed(20).unwrap();
    assert_eq!(m.page(), 1);
    assert_eq!(m.size(), 20);
    assert!(m.is_loading());
    assert_eq!(request.query, PagedQuery::new(0, 20));
}

#[test]
fn test_size_changed_without_change_is_noop() {
    let mut m = machine();
    let request = m.mount();
    m.complete(request.seq, Ok(page(&[], 0, 10, 5)));

    assert!(m.size_changed(10).is_none());
    assert!(m.size_changed(0).is_none(), "zero size is ignored");
    assert!(!m.is_loading());
}

#[test]
fn test_page_changed_to_current_is_noop() {
    let mut m = machine();
    let request = m.mount();
    m.complete(request.seq, Ok(page(&[1], 0, 10, 30)));

    assert!(m.page_changed(1).is_none());
    assert!(!m.is_loading(), "no fetch, no loading");
}

#[test_case(0, 1 ; "zero clamps to first page")]
#[test_case(1, 1 ; "first page")]
#[test_case(4, 4 ; "later page")]
fn test_page_changed_clamps_to_one(requested: u32, expected: u32) {
    let mut m = machine();
    let request = m.mount();
    m.complete(request.seq, Ok(page(&[], 1, 10, 100)));
    assert_eq!(m.page(), 2);

    m.page_changed(requested);
    assert_eq!(m.page(), expected);
}

#[test]
fn test_reload_replaces_only_rows() {
    let mut m = machine();
    let request = m.page_changed(2).unwrap();
    m.complete(request.seq, Ok(page(&[11, 12], 1, 10, 12)));

    let request = m.reload();
    assert_eq!(request.kind, FetchKind::Reload);
    assert_eq!(request.query.page, 1, "reload keeps the current page");
    assert!(m.is_loading());

    m.complete(request.seq, Ok(page(&[11], 0, 50, 999)));
    assert_eq!(ids(m.rows()), vec![11]);
    assert_eq!(m.total(), 12, "total unchanged by reload");
    assert_eq!((m.page(), m.size()), (2, 10), "page and size unchanged");
    assert!(!m.is_loading());
}

#[test]
fn test_reload_over_pending_page_keeps_server_echo() {
    let mut m = machine();
    m.mount();
    let request = m.reload();
    assert_eq!(request.kind, FetchKind::Page, "reload takes over the pending page fetch");

    m.complete(request.seq, Ok(page(&[1, 2], 0, 10, 25)));
    assert_eq!(m.total(), 25, "total from the server is applied");
    assert_eq!((m.page(), m.size()), (1, 10));

    let request = m.reload();
    assert_eq!(request.kind, FetchKind::Reload, "nothing pending, plain reload");
}

#[test]
fn test_reload_after_out_of_range_page_uses_clamped_page() {
    let mut pool = LocalPool::new();
    let rows: Vec<Value> = (0..25).map(|i| json!({ "id": i })).collect();
    let table = DataTable::new(
        TableConfig::new("id", columns()).pagination(PaginationConfig::default()),
        MemorySource::new(rows),
        pool.spawner(),
    )
    .unwrap();

    table.mount();
    table.reload();
    pool.run_until_stalled();
    assert_eq!(table.total(), 25);
    assert_eq!(table.pagination().unwrap().total, 25);
    assert_eq!(ids(&table.state().data_source), (0..10).collect::<Vec<_>>());

    table.set_page(9);
    table.reload();
    pool.run_until_stalled();
    assert_eq!(table.page(), 3, "server clamped the page");
    assert_eq!(ids(&table.state().data_source), (20..25).collect::<Vec<_>>());
}

#[test]
fn test_failure_clears_loading_and_keeps_rows() {
    let mut m = machine();
    let request = m.mount();
    m.complete(request.seq, Ok(page(&[1, 2], 0, 10, 2)));

    let request = m.page_changed(2).unwrap();
    let completion = m.complete(request.seq, Err(FetchError::Source("boom".into())));

    assert_eq!(completion, Completion::Failed(FetchError::Source("boom".into())));
    assert!(!m.is_loading());
    assert_eq!(ids(m.rows()), vec![1, 2]);
    assert_eq!(m.total(), 2);
    assert_eq!(m.page(), 2, "requested page stays selected");
}

#[test]
fn test_stale_completion_is_dropped() {
    let mut m = machine();
    let first = m.page_changed(2).unwrap();
    let second = m.page_changed(3).unwrap();

    assert_eq!(m.complete(first.seq, Ok(page(&[20], 1, 10, 40))), Completion::Stale);
    assert!(m.is_loading(), "stale response leaves loading set");
    assert!(m.rows().is_empty());
    assert_eq!(m.page(), 3);

    assert_eq!(m.complete(second.seq, Ok(page(&[30], 2, 10, 40))), Completion::Applied);
    assert_eq!(ids(m.rows()), vec![30]);

    // Completing twice is stale as well.
    assert!(m.complete(second.seq, Ok(page(&[], 2, 10, 40))).is_stale());
}

#[test]
fn test_sort_and_filter_forwarded() {
    let mut m = machine();
    let request = m.query_changed(Some("name".into()), Some("active".into())).unwrap();
    assert_eq!(request.query.sort.as_deref(), Some("name"));
    assert_eq!(request.query.filter.as_deref(), Some("active"));

    let request = m.page_changed(2).unwrap();
    assert_eq!(request.query.sort.as_deref(), Some("name"), "criteria persist");
}

// ============================================================================
// Table Driven Fetches
// ============================================================================

#[test]
fn test_memory_source_end_to_end() {
    let mut pool = LocalPool::new();
    let rows: Vec<Value> = (0..25).map(|i| json!({ "id": i })).collect();
    let table = DataTable::new(
        TableConfig::new("id", columns()),
        MemorySource::new(rows),
        pool.spawner(),
    )
    .unwrap();

    table.mount();
    assert!(table.is_loading());
    pool.run_until_stalled();

    assert!(!table.is_loading());
    assert_eq!(table.total(), 25);
    assert_eq!(ids(&table.state().data_source), (0..10).collect::<Vec<_>>());

    table.set_page(3);
    pool.run_until_stalled();
    assert_eq!(ids(&table.state().data_source), (20..25).collect::<Vec<_>>());

    // Out of range: the source serves (and echoes) its last page.
    table.set_page(7);
    pool.run_until_stalled();
    assert_eq!(table.page(), 3);
}

#[test]
fn test_out_of_order_completions() {
    let (mut pool, source, table) = manual_table();
    table.mount();
    pool.run_until_stalled();
    for (_, reply) in source.take() {
        reply.send(Ok(page(&[1], 0, 10, 30))).unwrap();
    }
    pool.run_until_stalled();

    table.set_page(2);
    table.set_page(3);
    pool.run_until_stalled();
    let mut pending = source.take();
    assert_eq!(pending.len(), 2);
    let (q3, r3) = pending.pop().unwrap();
    let (q2, r2) = pending.pop().unwrap();
    assert_eq!((q2.page, q3.page), (1, 2));

    r3.send(Ok(page(&[3], 2, 10, 30))).unwrap();
    pool.run_until_stalled();
    assert_eq!(ids(&table.state().data_source), vec![3]);
    assert!(!table.is_loading());

    r2.send(Ok(page(&[2], 1, 10, 30))).unwrap();
    pool.run_until_stalled();
    assert_eq!(ids(&table.state().data_source), vec![3], "late response ignored");
    assert_eq!(table.page(), 3);
}

#[test]
fn test_events_reported_to_listener() {
    let (mut pool, source, table) = manual_table();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    table.on_change(move |event| sink.borrow_mut().push(event.clone()));

    let seq = table.mount();
    pool.run_until_stalled();
    for (_, reply) in source.take() {
        reply.send(Err(FetchError::Response("bad page".into()))).unwrap();
    }
    pool.run_until_stalled();

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], TableEvent::Loading(seq));
    assert_eq!(
        events[1],
        TableEvent::Completed {
            seq,
            completion: Completion::Failed(FetchError::Response("bad page".into())),
        }
    );
    assert!(!table.is_loading());
}

#[test]
fn test_dropped_reply_is_a_failure() {
    let (mut pool, source, table) = manual_table();
    table.mount();
    pool.run_until_stalled();
    drop(source.take());
    pool.run_until_stalled();
    assert!(!table.is_loading());
    assert!(table.state().data_source.is_empty());
}

#[test]
fn test_abandoned_fetch_clears_loading() {
    let (pool, _source, table) = manual_table();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    table.on_change(move |event| sink.borrow_mut().push(event.clone()));

    let seq = table.mount();
    assert!(table.is_loading());
    drop(pool);

    assert!(!table.is_loading(), "dropping the executor completes the request");
    assert!(events.borrow().iter().any(|e| matches!(
        e,
        TableEvent::Completed { completion: Completion::Failed(FetchError::Abandoned(n)), .. }
            if *n == seq.get()
    )));
}

#[test]
fn test_result_arriving_while_state_borrowed_is_applied() {
    let mut pool = LocalPool::new();
    let rows: Vec<Value> = (0..25).map(|i| json!({ "id": i })).collect();
    let table = DataTable::new(
        TableConfig::new("id", columns()),
        MemorySource::new(rows),
        pool.spawner(),
    )
    .unwrap();

    table.mount();
    {
        let state = table.state();
        pool.run_until_stalled();
        assert!(state.loading, "result waits for the borrow to end");
        assert!(state.data_source.is_empty());
    }

    assert!(!table.is_loading(), "queued result applied on release");
    assert!(table.in_flight().is_none());
    assert_eq!(ids(&table.state().data_source), (0..10).collect::<Vec<_>>());

    pool.run_until_stalled();
    assert_eq!(table.total(), 25, "applied exactly once");
}

#[test]
fn test_spawn_failure_clears_loading() {
    let (pool, _source, table) = manual_table();
    drop(pool);
    table.reload();
    assert!(!table.is_loading(), "unspawnable fetch is abandoned at once");
}
