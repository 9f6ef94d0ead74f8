//! Layout engine: column tree to CSS grid.
//!
//! All three panes share one grid template so their rows and columns line up
//! exactly. A pane differs from the others only in which cells are visible
//! and in its own positioning style:
//! - leaf widths resolve to tracks, flex shares computed per pane
//! - groups become header spans over their leaves
//! - left and right panes exist only when some leaf is pinned there

mod header;
mod style;
mod tracks;

pub use header::{HeaderSpan, LeafTrack};
pub use style::{
    CellStyle, CenterPaneStyle, Declarations, Overflow, PaneStyle, PaneWidth, PinnedPaneStyle,
    StyleOverrides, ZIndex,
};
pub use tracks::{GridTemplate, Track, TrackList, ROW_MIN_HEIGHT};

use header::SpanBuilder;

use crate::column::{self, Column, ColumnWidth};
use crate::config::{PaneWidths, ScrollConfig};
use crate::types::{Pane, PaneSet};

/// Computed layout of a table for one set of rows.
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Leaf tracks, left to right.
    pub leaves: Vec<LeafTrack>,
    /// Header spans for the top-level columns.
    pub headers: Vec<HeaderSpan>,
    pub template: GridTemplate,
    /// Panes to render; the center pane is always present.
    pub panes: PaneSet,
    /// Header rows.
    pub header_depth: usize,
    pub row_count: usize,
    scroll: ScrollConfig,
    pane_widths: PaneWidths,
    styles: StyleOverrides,
}

impl TableLayout {
    pub fn compute<T>(
        columns: &[Column<T>],
        row_count: usize,
        scroll: &ScrollConfig,
        pane_widths: &PaneWidths,
    ) -> Self {
        let leaves = column::leaves(columns);

        let mut flex_sums = [0.0_f32; 3];
        for leaf in &leaves {
            if let Some(ColumnWidth::Flex(px)) = leaf.width {
                if let Some(sum) = flex_sums.get_mut(pane_slot(leaf.pane())) {
                    *sum += px.max(0.0);
                }
            }
        }

        let leaf_tracks: Vec<LeafTrack> = leaves
            .iter()
            .enumerate()
            .map(|(position, leaf)| {
                let pane = leaf.pane();
                let sum = flex_sums.get(pane_slot(pane)).copied().unwrap_or(0.0);
                LeafTrack {
                    key: leaf.render_key(position),
                    position,
                    pane,
                    track: Track::resolve(leaf.width, sum),
                }
            })
            .collect();

        let header_depth = column::header_depth(columns);
        let mut builder = SpanBuilder::new(header_depth);
        let headers = columns.iter().map(|c| builder.build(c, 0)).collect();

        let mut panes: PaneSet = leaf_tracks.iter().map(|leaf| leaf.pane).collect();
        panes.insert(Pane::Center);

        let columns = TrackList(leaf_tracks.iter().map(|leaf| leaf.track).collect());

        Self {
            leaves: leaf_tracks,
            headers,
            template: GridTemplate::new(columns, header_depth, row_count),
            panes,
            header_depth,
            row_count,
            scroll: *scroll,
            pane_widths: *pane_widths,
            styles: StyleOverrides::default(),
        }
    }

    /// Layer host styles over the computed pane, body and row styles.
    pub fn with_styles(mut self, styles: StyleOverrides) -> Self {
        self.styles = styles;
        self
    }

    pub fn has_pane(&self, pane: Pane) -> bool {
        self.panes.contains(pane)
    }

    pub fn pane_style(&self, pane: Pane) -> PaneStyle {
        PaneStyle::for_pane(pane, &self.scroll, &self.pane_widths)
    }

    /// Inline style of a pane container, host table style included.
    pub fn pane_css(&self, pane: Pane) -> String {
        self.pane_style(pane).to_css_with(&self.styles.table)
    }

    /// Inline style of the header, host row style included.
    pub fn header_css(&self) -> String {
        merged(&self.template.header_css(), &self.styles.row)
    }

    /// Inline style of a body row, host row style included.
    pub fn row_css(&self) -> String {
        merged(&self.template.row_css(), &self.styles.row)
    }

    /// Inline style of the body, host body style included.
    pub fn body_css(&self) -> String {
        merged(&self.template.body_css(), &self.styles.body)
    }

    /// Style of the body cell at leaf `position` inside `pane`.
    pub fn cell_style(&self, pane: Pane, position: usize) -> CellStyle {
        let visible = self
            .leaves
            .get(position)
            .is_some_and(|leaf| leaf.pane == pane);
        CellStyle::new(visible)
    }

    /// Style of a header cell inside `pane`.
    pub fn header_style(&self, pane: Pane, span: &HeaderSpan) -> CellStyle {
        CellStyle::new(span.visible_in(pane))
    }
}

fn merged(base: &str, extra: &Declarations) -> String {
    if extra.is_empty() {
        return base.to_string();
    }
    let mut decls = Declarations::parse(base);
    decls.merge(extra);
    decls.to_css()
}

fn pane_slot(pane: Pane) -> usize {
    match pane {
        Pane::Left => 0,
        Pane::Center => 1,
        Pane::Right => 2,
    }
}
