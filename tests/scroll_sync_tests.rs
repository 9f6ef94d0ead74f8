//! Scroll synchronization tests
//!
//! Tests offset mirroring between the center and pinned panes, wheel
//! handling at content boundaries, echo suppression and re-entrancy.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::executor::LocalPool;
use panegrid::viewer::{PaneRegistry, ScrollBox, ScrollPane, ScrollSync, SyncOutcome};
use panegrid::{Column, DataTable, MemorySource, Pane, Pin, TableConfig};
use serde_json::Value;

// ============================================================================
// Test Helpers
// ============================================================================

struct Panes {
    left: Rc<ScrollBox>,
    center: Rc<ScrollBox>,
    right: Rc<ScrollBox>,
}

/// Three panes of 200px showing 1000px of content.
fn synced() -> (ScrollSync, Panes) {
    let sync = ScrollSync::new();
    let panes = Panes {
        left: Rc::new(ScrollBox::new(200.0, 1000.0)),
        center: Rc::new(ScrollBox::new(200.0, 1000.0)),
        right: Rc::new(ScrollBox::new(200.0, 1000.0)),
    };
    sync.register(Pane::Left, Rc::clone(&panes.left) as Rc<dyn ScrollPane>);
    sync.register(Pane::Center, Rc::clone(&panes.center) as Rc<dyn ScrollPane>);
    sync.register(Pane::Right, Rc::clone(&panes.right) as Rc<dyn ScrollPane>);
    (sync, panes)
}

fn tops(panes: &Panes) -> [f64; 3] {
    [
        panes.left.scroll_top(),
        panes.center.scroll_top(),
        panes.right.scroll_top(),
    ]
}

// ============================================================================
// Direct Scroll
// ============================================================================

#[test]
fn test_direct_scroll_mirrors_offset() {
    let (sync, panes) = synced();
    panes.center.set_scroll_top(120.0);

    let outcome = sync.on_scroll(Pane::Center, true);
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            source: Pane::Center,
            offset: 120.0,
            moved: 2
        }
    );
    assert_eq!(tops(&panes), [120.0, 120.0, 120.0]);
    assert!(!sync.is_syncing(), "guard released after the pass");
}

#[test]
fn test_pinned_pane_can_lead() {
    let (sync, panes) = synced();
    panes.right.set_scroll_top(300.0);
    sync.on_scroll(Pane::Right, true);
    assert_eq!(tops(&panes), [300.0, 300.0, 300.0]);
}

#[test]
fn test_bubbled_scroll_ignored() {
    let (sync, panes) = synced();
    panes.center.set_scroll_top(50.0);
    assert_eq!(sync.on_scroll(Pane::Center, false), SyncOutcome::Bubbled);
    assert_eq!(tops(&panes), [0.0, 50.0, 0.0]);
}

#[test]
fn test_follower_echo_not_rebroadcast() {
    let (sync, panes) = synced();
    panes.center.set_scroll_top(120.0);
    sync.on_scroll(Pane::Center, true);
    let writes = panes.center.writes();

    // The writes onto the pinned panes come back as scroll events.
    assert_eq!(sync.on_scroll(Pane::Left, true), SyncOutcome::Echo);
    assert_eq!(sync.on_scroll(Pane::Right, true), SyncOutcome::Echo);
    assert_eq!(panes.center.writes(), writes, "center not written again");

    // A later user scroll on the pinned pane leads again.
    panes.left.set_scroll_top(400.0);
    assert!(matches!(
        sync.on_scroll(Pane::Left, true),
        SyncOutcome::Synced { source: Pane::Left, .. }
    ));
    assert_eq!(tops(&panes), [400.0, 400.0, 400.0]);
}

#[test]
fn test_unchanged_followers_not_written_as_echo() {
    let (sync, panes) = synced();
    panes.center.set_scroll_top(80.0);
    sync.on_scroll(Pane::Center, true);
    sync.on_scroll(Pane::Left, true);
    sync.on_scroll(Pane::Right, true);

    // Same offset again: followers do not move, so no echo is expected.
    let outcome = sync.on_scroll(Pane::Center, true);
    assert!(matches!(outcome, SyncOutcome::Synced { moved: 0, .. }));
    panes.left.set_scroll_top(90.0);
    assert!(matches!(sync.on_scroll(Pane::Left, true), SyncOutcome::Synced { .. }));
}

// ============================================================================
// Wheel
// ============================================================================

#[test]
fn test_wheel_moves_every_pane() {
    let (sync, panes) = synced();
    let outcome = sync.on_wheel(150.0);
    assert_eq!(outcome, SyncOutcome::Wheeled { delta: 150.0, moved: 3 });
    assert_eq!(tops(&panes), [150.0, 150.0, 150.0]);

    // Clamped at the top.
    sync.on_wheel(-500.0);
    assert_eq!(tops(&panes), [0.0, 0.0, 0.0]);
}

#[test]
fn test_wheel_clamps_at_bottom() {
    let (sync, panes) = synced();
    sync.on_wheel(790.0);
    assert_eq!(tops(&panes), [790.0, 790.0, 790.0]);
    sync.on_wheel(50.0);
    assert_eq!(tops(&panes), [800.0, 800.0, 800.0]);
}

#[test]
fn test_wheel_down_at_bottom_suppressed() {
    let (sync, panes) = synced();
    panes.center.set_scroll_top(800.0);
    let before = panes.left.writes();

    assert_eq!(sync.on_wheel(40.0), SyncOutcome::AtBottom);
    assert_eq!(panes.left.writes(), before, "nothing moves");
    assert_eq!(panes.left.scroll_top(), 0.0);

    // Scrolling back up is still allowed.
    assert!(matches!(sync.on_wheel(-100.0), SyncOutcome::Wheeled { .. }));
    assert_eq!(panes.center.scroll_top(), 700.0);
}

#[test]
fn test_wheel_echoes_suppressed() {
    let (sync, _panes) = synced();
    sync.on_wheel(100.0);
    for pane in Pane::ALL {
        assert_eq!(sync.on_scroll(pane, true), SyncOutcome::Echo, "{pane}");
    }
}

// ============================================================================
// Re-entrancy and Registry
// ============================================================================

/// Pane that reports its own scroll synchronously, like a DOM that fires
/// scroll events inside the setter.
struct EagerPane {
    inner: ScrollBox,
    pane: Pane,
    sync: RefCell<Weak<ScrollSync>>,
    nested: Cell<Option<SyncOutcome>>,
}

impl ScrollPane for EagerPane {
    fn scroll_top(&self) -> f64 {
        self.inner.scroll_top()
    }

    fn set_scroll_top(&self, top: f64) {
        self.inner.set_scroll_top(top);
        if let Some(sync) = self.sync.borrow().upgrade() {
            self.nested.set(Some(sync.on_scroll(self.pane, true)));
        }
    }

    fn client_height(&self) -> f64 {
        self.inner.client_height()
    }

    fn scroll_height(&self) -> f64 {
        self.inner.scroll_height()
    }
}

#[test]
fn test_reentrant_events_ignored() {
    let sync = Rc::new(ScrollSync::new());
    let center = Rc::new(ScrollBox::new(100.0, 500.0));
    let left = Rc::new(EagerPane {
        inner: ScrollBox::new(100.0, 500.0),
        pane: Pane::Left,
        sync: RefCell::new(Rc::downgrade(&sync)),
        nested: Cell::new(None),
    });
    sync.register(Pane::Center, Rc::clone(&center) as Rc<dyn ScrollPane>);
    sync.register(Pane::Left, Rc::clone(&left) as Rc<dyn ScrollPane>);

    center.set_scroll_top(60.0);
    sync.on_scroll(Pane::Center, true);

    assert_eq!(left.nested.get(), Some(SyncOutcome::Reentrant));
    assert_eq!(left.scroll_top(), 60.0);
    assert!(!sync.is_syncing());
}

#[test]
fn test_registry() {
    let mut registry = PaneRegistry::new();
    assert!(registry.is_empty());
    let first: Rc<dyn ScrollPane> = Rc::new(ScrollBox::new(10.0, 20.0));
    let second: Rc<dyn ScrollPane> = Rc::new(ScrollBox::new(10.0, 30.0));
    assert!(registry.register(Pane::Center, first).is_none());
    assert!(registry.register(Pane::Center, second).is_some(), "re-register replaces");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(Pane::Center).unwrap().scroll_height(), 30.0);
    assert!(registry.unregister(Pane::Center).is_some());
    assert!(registry.get(Pane::Center).is_none());
}

#[test]
fn test_unregistered_pane_not_written() {
    let (sync, panes) = synced();
    assert!(sync.unregister(Pane::Right));
    panes.center.set_scroll_top(100.0);
    sync.on_scroll(Pane::Center, true);
    assert_eq!(tops(&panes), [100.0, 100.0, 0.0]);
    assert_eq!(sync.on_scroll(Pane::Right, true), SyncOutcome::Unregistered);
}

#[test]
fn test_table_owns_registry() {
    let pool = LocalPool::new();
    let columns: Vec<Column<Value>> = vec![
        Column::leaf("Id").data_index("id").fixed(Pin::Left).into(),
        Column::leaf("Name").data_index("name").into(),
    ];
    let table = DataTable::new(
        TableConfig::new("id", columns),
        MemorySource::new(Vec::new()),
        pool.spawner(),
    )
    .unwrap();

    let center = Rc::new(ScrollBox::new(100.0, 400.0));
    let left = Rc::new(ScrollBox::new(100.0, 400.0));
    table.register_pane(Pane::Center, Rc::clone(&center) as Rc<dyn ScrollPane>);
    table.register_pane(Pane::Left, Rc::clone(&left) as Rc<dyn ScrollPane>);

    center.set_scroll_top(120.0);
    assert!(matches!(table.on_pane_scroll(Pane::Center, true), SyncOutcome::Synced { .. }));
    assert_eq!(left.scroll_top(), 120.0);

    assert!(matches!(table.on_wheel(30.0), SyncOutcome::Wheeled { moved: 2, .. }));
    assert_eq!(left.scroll_top(), 150.0);
    assert!(table.unregister_pane(Pane::Left));
}
