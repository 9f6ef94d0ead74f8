//! Leaf tracks and the header span tree.

use crate::column::{Column, Title};
use crate::types::{Pane, PaneSet};

use super::tracks::Track;

/// A leaf column resolved to its grid track.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafTrack {
    pub key: String,
    /// Position among all leaves, left to right.
    pub position: usize,
    pub pane: Pane,
    pub track: Track,
}

/// One header cell: a leaf title or a group title over its children.
#[derive(Debug, Clone)]
pub struct HeaderSpan {
    pub key: String,
    pub title: Title,
    /// Position of the first leaf under this span.
    pub first_leaf: usize,
    /// Number of leaf tracks covered.
    pub span: usize,
    /// Header level, 0 for top-level columns.
    pub depth: usize,
    /// Header rows occupied, counting the children's rows for a group.
    pub row_span: usize,
    /// Panes holding at least one leaf under this span.
    pub panes: PaneSet,
    pub is_leaf: bool,
    pub children: Vec<HeaderSpan>,
}

impl HeaderSpan {
    pub fn visible_in(&self, pane: Pane) -> bool {
        self.panes.contains(pane)
    }

    /// Leaf range covered, as positions.
    pub fn leaf_range(&self) -> std::ops::Range<usize> {
        self.first_leaf..self.first_leaf + self.span
    }
}

pub(super) struct SpanBuilder {
    next_leaf: usize,
    total_depth: usize,
}

impl SpanBuilder {
    pub(super) fn new(total_depth: usize) -> Self {
        Self {
            next_leaf: 0,
            total_depth,
        }
    }

    pub(super) fn build<T>(&mut self, column: &Column<T>, depth: usize) -> HeaderSpan {
        let first_leaf = self.next_leaf;
        let row_span = self.total_depth.saturating_sub(depth).max(1);
        match column {
            Column::Leaf(leaf) => {
                self.next_leaf += 1;
                HeaderSpan {
                    key: leaf.render_key(first_leaf),
                    title: leaf.title.clone(),
                    first_leaf,
                    span: 1,
                    depth,
                    row_span,
                    panes: PaneSet::only(leaf.pane()),
                    is_leaf: true,
                    children: Vec::new(),
                }
            }
            Column::Group(group) => {
                let children: Vec<HeaderSpan> = group
                    .children
                    .iter()
                    .map(|child| self.build(child, depth + 1))
                    .collect();
                let panes = children
                    .iter()
                    .fold(PaneSet::empty(), |acc, child| acc.union(child.panes));
                HeaderSpan {
                    key: group.render_key(first_leaf),
                    title: group.title.clone(),
                    first_leaf,
                    span: self.next_leaf - first_leaf,
                    depth,
                    row_span,
                    panes,
                    is_leaf: false,
                    children,
                }
            }
        }
    }
}
