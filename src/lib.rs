//! panegrid - paginated data grid for the web
//!
//! Renders remote, paginated tabular data as a CSS grid split into three
//! panes so that leading and trailing columns stay pinned while the middle
//! scrolls:
//! - Fetch state machine with sequenced requests (stale responses dropped)
//! - Column trees with nested group headers and flex / exact widths
//! - Pinned left and right panes kept in vertical sync with the center
//! - Runs natively (HTML output) or in the browser via WebAssembly
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use futures::executor::LocalPool;
//! use panegrid::{Column, DataTable, MemorySource, Pin, TableConfig};
//! use serde_json::{json, Value};
//!
//! let rows: Vec<Value> = (0..30).map(|i| json!({"id": i, "name": format!("row {i}")})).collect();
//! let columns: Vec<Column<Value>> = vec![
//!     Column::leaf("Id").data_index("id").width(60).fixed(Pin::Left).into(),
//!     Column::leaf("Name").data_index("name").width(200).into(),
//! ];
//! let mut pool = LocalPool::new();
//! let table = DataTable::new(
//!     TableConfig::new("id", columns),
//!     MemorySource::new(rows),
//!     pool.spawner(),
//! )?;
//! table.mount();
//! pool.run_until_stalled();
//! println!("{}", table.render_html());
//! # Ok::<(), panegrid::GridError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'panegrid';
//! await init();
//! const view = new GridView(container, { rowKey: "id", columns }, query => api.page(query));
//! view.mount();
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

pub use column::{Column, ColumnSpec, ColumnWidth, Group, Leaf, Title};
pub use config::{LocalText, PaginationConfig, PaneWidths, ScrollConfig, TableConfig, TableOptions};
pub use error::{FetchError, GridError, Result};
pub use fetch::{
    Completion, DataSource, FetchKind, FetchMachine, FetchPhase, FetchRequest, FetchState,
    FnSource, MemorySource, RequestSeq,
};
pub use layout::{StyleOverrides, TableLayout};
pub use render::{Element, Node, PaginationProps};
pub use types::*;
pub use viewer::{DataTable, Reload, ScrollPane, ScrollSync, StateRef, SyncOutcome, TableEvent};

#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;
