//! Rendering into a virtual node tree.
//!
//! This module provides:
//! - `Node`, a small element tree that serializes to HTML
//! - pane rendering (header, body rows, empty placeholder)
//! - the footer with the total label and pagination props

mod footer;
mod node;
mod pane;

pub use footer::{render_footer, PaginationProps};
pub use node::{Element, Node};
pub use pane::{render_pane, PaneContext};
