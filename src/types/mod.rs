//! Data types shared by the fetch, layout and render layers.

mod pane;
mod query;
mod record;

pub use pane::*;
pub use query::*;
pub use record::*;
