//! Vertical scroll synchronization across the table panes.
//!
//! The pane the user touched is authoritative for one event; its offset is
//! written onto the others. Writes made here come back as scroll events on
//! the followers. Those echoes are recognized by the offset recorded at
//! write time and are not broadcast again.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, trace};

use crate::types::Pane;

/// Offsets closer than this are treated as equal.
const OFFSET_EPSILON: f64 = 0.5;

/// A vertically scrollable region.
pub trait ScrollPane {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&self, top: f64);
    fn client_height(&self) -> f64;
    fn scroll_height(&self) -> f64;

    /// Largest reachable `scroll_top`.
    fn max_scroll_top(&self) -> f64 {
        (self.scroll_height() - self.client_height()).max(0.0)
    }

    fn at_bottom(&self) -> bool {
        self.scroll_top() >= self.max_scroll_top() - OFFSET_EPSILON
    }
}

impl<P: ScrollPane + ?Sized> ScrollPane for Rc<P> {
    fn scroll_top(&self) -> f64 {
        (**self).scroll_top()
    }

    fn set_scroll_top(&self, top: f64) {
        (**self).set_scroll_top(top);
    }

    fn client_height(&self) -> f64 {
        (**self).client_height()
    }

    fn scroll_height(&self) -> f64 {
        (**self).scroll_height()
    }
}

/// Live panes, by position.
#[derive(Default)]
pub struct PaneRegistry {
    panes: BTreeMap<Pane, Rc<dyn ScrollPane>>,
}

impl PaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pane, returning the handle it replaced.
    pub fn register(&mut self, pane: Pane, handle: Rc<dyn ScrollPane>) -> Option<Rc<dyn ScrollPane>> {
        self.panes.insert(pane, handle)
    }

    pub fn unregister(&mut self, pane: Pane) -> Option<Rc<dyn ScrollPane>> {
        self.panes.remove(&pane)
    }

    pub fn get(&self, pane: Pane) -> Option<Rc<dyn ScrollPane>> {
        self.panes.get(&pane).map(Rc::clone)
    }

    pub fn contains(&self, pane: Pane) -> bool {
        self.panes.contains_key(&pane)
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Snapshot of the registered panes in position order.
    pub fn snapshot(&self) -> Vec<(Pane, Rc<dyn ScrollPane>)> {
        self.panes
            .iter()
            .map(|(pane, handle)| (*pane, Rc::clone(handle)))
            .collect()
    }
}

/// Marks a synchronization pass in progress; cleared on drop.
pub struct SyncGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> SyncGuard<'a> {
    /// `None` when a pass is already running.
    pub fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// What a scroll or wheel event led to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// `source` moved to `offset`; `moved` followers were written.
    Synced { source: Pane, offset: f64, moved: usize },
    /// Wheel delta applied to `moved` panes.
    Wheeled { delta: f64, moved: usize },
    /// The event came from a descendant of the pane.
    Bubbled,
    /// The event is the result of one of our own writes.
    Echo,
    /// Another pass is running.
    Reentrant,
    /// Center pane already at the bottom and the wheel points down.
    AtBottom,
    /// The pane is not registered.
    Unregistered,
}

/// Keeps the registered panes at the same vertical offset.
#[derive(Default)]
pub struct ScrollSync {
    registry: RefCell<PaneRegistry>,
    syncing: Cell<bool>,
    echoes: RefCell<BTreeMap<Pane, f64>>,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, pane: Pane, handle: Rc<dyn ScrollPane>) {
        debug!("registering {pane} pane");
        self.registry.borrow_mut().register(pane, handle);
        self.echoes.borrow_mut().remove(&pane);
    }

    pub fn unregister(&self, pane: Pane) -> bool {
        self.echoes.borrow_mut().remove(&pane);
        self.registry.borrow_mut().unregister(pane).is_some()
    }

    pub fn is_registered(&self, pane: Pane) -> bool {
        self.registry.borrow().contains(pane)
    }

    pub fn pane_count(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.get()
    }

    /// Scroll event on `pane`. `direct` is false for events that bubbled up
    /// from a descendant.
    pub fn on_scroll(&self, pane: Pane, direct: bool) -> SyncOutcome {
        if !direct {
            return SyncOutcome::Bubbled;
        }
        let Some(_guard) = SyncGuard::enter(&self.syncing) else {
            trace!("ignoring scroll on {pane} during sync");
            return SyncOutcome::Reentrant;
        };
        let panes = self.registry.borrow().snapshot();
        let Some(source) = panes.iter().find(|(p, _)| *p == pane).map(|(_, h)| h) else {
            return SyncOutcome::Unregistered;
        };

        let offset = source.scroll_top();
        if let Some(expected) = self.echoes.borrow_mut().remove(&pane) {
            if (expected - offset).abs() < OFFSET_EPSILON {
                trace!("scroll echo on {pane} at {offset}");
                return SyncOutcome::Echo;
            }
        }

        let mut moved = 0;
        for (follower, handle) in &panes {
            if *follower != pane && self.write(*follower, &**handle, offset) {
                moved += 1;
            }
        }
        debug!("{pane} scrolled to {offset}, moved {moved} panes");
        SyncOutcome::Synced {
            source: pane,
            offset,
            moved,
        }
    }

    /// Wheel over the table: move every pane by `delta_y`, clamped.
    pub fn on_wheel(&self, delta_y: f64) -> SyncOutcome {
        let Some(_guard) = SyncGuard::enter(&self.syncing) else {
            return SyncOutcome::Reentrant;
        };
        let panes = self.registry.borrow().snapshot();
        let center = panes.iter().find(|(p, _)| *p == Pane::Center);
        if delta_y > 0.0 && center.is_some_and(|(_, handle)| handle.at_bottom()) {
            trace!("wheel at bottom ignored");
            return SyncOutcome::AtBottom;
        }

        let mut moved = 0;
        for (pane, handle) in &panes {
            let target = (handle.scroll_top() + delta_y).clamp(0.0, handle.max_scroll_top());
            if self.write(*pane, &**handle, target) {
                moved += 1;
            }
        }
        debug!("wheel {delta_y} moved {moved} panes");
        SyncOutcome::Wheeled {
            delta: delta_y,
            moved,
        }
    }

    /// Write `top` onto a follower and remember the resulting offset so the
    /// scroll event it triggers is not broadcast. Returns whether it moved.
    fn write(&self, pane: Pane, handle: &dyn ScrollPane, top: f64) -> bool {
        let before = handle.scroll_top();
        handle.set_scroll_top(top);
        let after = handle.scroll_top();
        if (after - before).abs() < OFFSET_EPSILON {
            return false;
        }
        self.echoes.borrow_mut().insert(pane, after);
        true
    }
}

/// In-memory scroll pane.
#[derive(Debug, Default)]
pub struct ScrollBox {
    top: Cell<f64>,
    client_height: f64,
    scroll_height: f64,
    writes: Cell<usize>,
}

impl ScrollBox {
    pub fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            top: Cell::new(0.0),
            client_height,
            scroll_height,
            writes: Cell::new(0),
        }
    }

    /// Number of `set_scroll_top` calls received.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl ScrollPane for ScrollBox {
    fn scroll_top(&self) -> f64 {
        self.top.get()
    }

    fn set_scroll_top(&self, top: f64) {
        self.writes.set(self.writes.get() + 1);
        self.top.set(top.clamp(0.0, self.max_scroll_top()));
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }
}
