//! The table orchestrator.
//!
//! `DataTable` owns the fetch machine, the data source, the scroll
//! synchronizer and the configuration. Transitions issue requests that run
//! on a host-supplied [`LocalSpawn`] executor; completions come back through
//! the sequence guard and a change notification tells the host to render.

mod scroll;
mod task;

#[cfg(target_arch = "wasm32")]
mod events;

#[cfg(target_arch = "wasm32")]
mod logger;

pub use scroll::{PaneRegistry, ScrollBox, ScrollPane, ScrollSync, SyncGuard, SyncOutcome};

#[cfg(target_arch = "wasm32")]
pub use events::GridView;

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use futures::task::{LocalSpawn, LocalSpawnExt};
use log::{debug, warn};

use crate::column;
use crate::config::TableConfig;
use crate::error::{FetchError, Result};
use crate::fetch::{Completion, DataSource, FetchMachine, FetchRequest, FetchState, RequestSeq};
use crate::layout::TableLayout;
use crate::render::{render_footer, render_pane, Element, Node, PaginationProps, PaneContext};
use crate::types::{PagedResponse, Pane, PaneSet, Pin, Record};

use task::spawn_fetch;

/// Receiver of reload requests issued from cells.
pub trait ReloadTarget {
    fn trigger_reload(&self);
}

/// Handle given to cell renderers to refetch the current page.
#[derive(Clone)]
pub struct Reload {
    target: Option<Weak<dyn ReloadTarget>>,
}

impl Reload {
    pub fn new(target: Weak<dyn ReloadTarget>) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// A handle connected to nothing.
    pub fn detached() -> Self {
        Self { target: None }
    }

    /// Request a reload. Returns false when the table is gone.
    pub fn trigger(&self) -> bool {
        match self.target.as_ref().and_then(Weak::upgrade) {
            Some(target) => {
                target.trigger_reload();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Reload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reload")
            .field("attached", &self.target.is_some())
            .finish()
    }
}

/// Notification sent to the host after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A request was issued; the table is loading.
    Loading(RequestSeq),
    /// A request finished; stale completions are not reported.
    Completed {
        seq: RequestSeq,
        completion: Completion,
    },
}

type Listener = Rc<dyn Fn(&TableEvent)>;

type FetchResult<T> = std::result::Result<PagedResponse<T>, FetchError>;

pub(crate) struct Inner<T: 'static> {
    this: Weak<Inner<T>>,
    config: TableConfig<T>,
    machine: RefCell<FetchMachine<T>>,
    source: Rc<dyn DataSource<T>>,
    spawner: Rc<dyn LocalSpawn>,
    listener: RefCell<Option<Listener>>,
    sync: ScrollSync,
    /// Results that arrived while the fetch state was borrowed.
    pending: RefCell<Vec<(RequestSeq, FetchResult<T>)>>,
    reload_pending: Cell<bool>,
}

impl<T: 'static> Inner<T> {
    fn run(&self, request: FetchRequest) -> RequestSeq {
        let seq = request.seq;
        self.notify(&TableEvent::Loading(seq));
        if let Some(this) = self.this.upgrade() {
            spawn_fetch(&this, request);
        }
        seq
    }

    /// Feed a result back into the machine and notify the host. While the
    /// state is borrowed the result is queued until the borrow ends.
    pub(crate) fn apply(&self, seq: RequestSeq, result: FetchResult<T>) {
        let completion = match self.machine.try_borrow_mut() {
            Ok(mut machine) => machine.complete(seq, result),
            Err(_) => {
                debug!("fetch state busy, queueing result of {seq}");
                self.pending.borrow_mut().push((seq, result));
                self.schedule_flush();
                return;
            }
        };
        if completion.is_stale() {
            return;
        }
        self.notify(&TableEvent::Completed { seq, completion });
    }

    /// Apply queued results and a deferred reload, unless the state is
    /// still borrowed.
    fn flush(&self) {
        if self.machine.try_borrow_mut().is_err() {
            return;
        }
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for (seq, result) in pending {
            self.apply(seq, result);
        }
        if self.reload_pending.replace(false) {
            self.reload();
        }
    }

    /// Run [`flush`](Self::flush) once the current task yields. A flush
    /// that still finds the state busy leaves the queue to the borrow's
    /// release.
    fn schedule_flush(&self) {
        let this = Weak::clone(&self.this);
        let deferred = async move {
            if let Some(table) = this.upgrade() {
                table.flush();
            }
        };
        if let Err(err) = self.spawner.spawn_local(deferred) {
            warn!("could not schedule flush: {err}");
        }
    }

    fn notify(&self, event: &TableEvent) {
        let listener = self.listener.borrow().as_ref().map(Rc::clone);
        if let Some(listener) = listener {
            listener(event);
        }
    }

    fn reload(&self) -> RequestSeq {
        let request = self.machine.borrow_mut().reload();
        self.run(request)
    }
}

impl<T: 'static> ReloadTarget for Inner<T> {
    fn trigger_reload(&self) {
        if self.machine.try_borrow_mut().is_ok() {
            self.reload();
            return;
        }
        // Triggered while the table is rendering; run after it returns.
        debug!("deferring reload requested during render");
        if !self.reload_pending.replace(true) {
            self.schedule_flush();
        }
    }
}

/// Borrowed fetch state returned by [`DataTable::state`].
pub struct StateRef<'a, T: 'static> {
    // Dropped before `_flush`, releasing the borrow first.
    state: Ref<'a, FetchState<T>>,
    _flush: FlushOnDrop<'a, T>,
}

impl<T: 'static> Deref for StateRef<'_, T> {
    type Target = FetchState<T>;

    fn deref(&self) -> &FetchState<T> {
        &self.state
    }
}

struct FlushOnDrop<'a, T: 'static>(&'a Inner<T>);

impl<T: 'static> Drop for FlushOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.flush();
    }
}

/// A paginated table bound to a data source.
pub struct DataTable<T: 'static> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for DataTable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> DataTable<T> {
    /// Create a table. Nothing is fetched until [`mount`](Self::mount).
    ///
    /// # Errors
    /// Returns [`GridError::Config`](crate::GridError::Config) when the
    /// configuration has no row key.
    pub fn new<S, Sp>(config: TableConfig<T>, source: S, spawner: Sp) -> Result<Self>
    where
        S: DataSource<T> + 'static,
        Sp: LocalSpawn + 'static,
    {
        config.validate()?;
        let machine = FetchMachine::new(&config.initial_pagination());
        let inner = Rc::new_cyclic(|this| Inner {
            this: Weak::clone(this),
            config,
            machine: RefCell::new(machine),
            source: Rc::new(source),
            spawner: Rc::new(spawner),
            listener: RefCell::new(None),
            sync: ScrollSync::new(),
            pending: RefCell::new(Vec::new()),
            reload_pending: Cell::new(false),
        });
        Ok(Self { inner })
    }

    pub fn config(&self) -> &TableConfig<T> {
        &self.inner.config
    }

    /// Called with every state change the host should render.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&TableEvent) + 'static,
    {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Issue the initial fetch.
    pub fn mount(&self) -> RequestSeq {
        let request = self.inner.machine.borrow_mut().mount();
        self.inner.run(request)
    }

    /// Pagination control picked `page` (one-based).
    pub fn set_page(&self, page: u32) -> Option<RequestSeq> {
        let request = self.inner.machine.borrow_mut().page_changed(page);
        request.map(|request| self.inner.run(request))
    }

    /// Size changer picked `size`. The reported page is ignored; the table
    /// returns to the first page.
    pub fn set_page_size(&self, _page: u32, size: u32) -> Option<RequestSeq> {
        let request = self.inner.machine.borrow_mut().size_changed(size);
        request.map(|request| self.inner.run(request))
    }

    /// Refetch the current page, replacing only the rows.
    pub fn reload(&self) -> RequestSeq {
        self.inner.reload()
    }

    /// New sort or filter criteria, forwarded in the query.
    pub fn set_query(&self, sort: Option<String>, filter: Option<String>) -> Option<RequestSeq> {
        let request = self.inner.machine.borrow_mut().query_changed(sort, filter);
        request.map(|request| self.inner.run(request))
    }

    /// Handle passed to cell renderers.
    pub fn reload_handle(&self) -> Reload {
        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        let target: Weak<dyn ReloadTarget> = weak;
        Reload::new(target)
    }

    /// Borrow the fetch state. Results arriving meanwhile are applied when
    /// the returned guard is dropped.
    pub fn state(&self) -> StateRef<'_, T> {
        StateRef {
            state: Ref::map(self.inner.machine.borrow(), FetchMachine::state),
            _flush: FlushOnDrop(&self.inner),
        }
    }

    pub fn page(&self) -> u32 {
        self.inner.machine.borrow().page()
    }

    pub fn page_size(&self) -> u32 {
        self.inner.machine.borrow().size()
    }

    pub fn total(&self) -> u64 {
        self.inner.machine.borrow().total()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.machine.borrow().is_loading()
    }

    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.inner.machine.borrow().in_flight()
    }

    /// Panes this table renders.
    pub fn panes(&self) -> PaneSet {
        let columns = &self.inner.config.columns;
        let mut panes = PaneSet::only(Pane::Center);
        if column::has_pinned(columns, Pin::Left) {
            panes.insert(Pane::Left);
        }
        if column::has_pinned(columns, Pin::Right) {
            panes.insert(Pane::Right);
        }
        panes
    }

    pub fn layout(&self) -> TableLayout {
        let config = &self.inner.config;
        let rows = self.inner.machine.borrow().rows().len();
        TableLayout::compute(&config.columns, rows, &config.scroll, &config.pane_widths)
            .with_styles(config.styles.clone())
    }

    /// Props for the pagination control; `None` when pagination is off.
    pub fn pagination(&self) -> Option<PaginationProps> {
        let machine = self.inner.machine.borrow();
        self.inner
            .config
            .pagination
            .as_ref()
            .map(|config| PaginationProps::from_state(config, machine.state()))
    }

    pub fn footer(&self) -> Node {
        let pagination = self.pagination();
        let machine = self.inner.machine.borrow();
        render_footer(&self.inner.config.local, machine.state(), pagination.as_ref())
    }

    // Scroll synchronization

    pub fn register_pane(&self, pane: Pane, handle: Rc<dyn ScrollPane>) {
        self.inner.sync.register(pane, handle);
    }

    pub fn unregister_pane(&self, pane: Pane) -> bool {
        self.inner.sync.unregister(pane)
    }

    /// Scroll event on a pane; `direct` when the pane itself is the target.
    pub fn on_pane_scroll(&self, pane: Pane, direct: bool) -> SyncOutcome {
        self.inner.sync.on_scroll(pane, direct)
    }

    pub fn on_wheel(&self, delta_y: f64) -> SyncOutcome {
        self.inner.sync.on_wheel(delta_y)
    }

    pub fn scroll_sync(&self) -> &ScrollSync {
        &self.inner.sync
    }
}

impl<T: Record + 'static> DataTable<T> {
    /// Render the whole table: panes inside the spin wrapper, then the footer.
    pub fn render(&self) -> Node {
        let config = &self.inner.config;
        let layout = self.layout();
        let reload = self.reload_handle();
        let footer = self.footer();

        let machine = self.inner.machine.borrow();
        let state = machine.state();
        let panes = layout.panes.iter().map(|pane| {
            render_pane(&PaneContext {
                pane,
                layout: &layout,
                columns: &config.columns,
                rows: &state.data_source,
                row_key: &config.row_key,
                loading: state.loading,
                empty_text: &config.local.empty_text,
                reload: &reload,
            })
        });
        let mut spin = Element::div().class("spin").children(panes);
        if state.loading {
            spin = spin.attr("data-loading", "true");
        }

        let mut root = Element::div().class("panegrid");
        if config.bordered {
            root = root.class("bordered");
        }
        root.child(spin).child(footer).into()
    }

    pub fn render_html(&self) -> String {
        self.render().to_html()
    }
}
