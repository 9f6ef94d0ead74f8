//! Grid track sizing.

use std::fmt;

use crate::column::ColumnWidth;

/// Minimum height of a body or header row, in pixels.
pub const ROW_MIN_HEIGHT: f32 = 48.0;

/// Sizing rule for one grid column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Track {
    /// `minmax(Npx, Npx)`
    Exact(f32),
    /// `minmax(Npx, Ffr)`: never narrower than `min`, grows by `fr`.
    Flex { min: f32, fr: f32 },
    /// `minmax(max-content, auto)`
    Content,
}

impl Track {
    /// Track for a leaf width. `flex_sum` is the total flex width of the
    /// leaves sharing the leaf's pane.
    pub fn resolve(width: Option<ColumnWidth>, flex_sum: f32) -> Self {
        match width {
            None => Track::Content,
            Some(ColumnWidth::Fixed(px)) => Track::Exact(px.max(0.0)),
            Some(ColumnWidth::Flex(px)) => {
                let min = px.max(0.0);
                // Zero-width flex columns in a zero-sum group share equally.
                let fr = if flex_sum > 0.0 { min / flex_sum } else { 1.0 };
                Track::Flex { min, fr }
            }
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Exact(px) => write!(f, "minmax({px}px, {px}px)"),
            Track::Flex { min, fr } => write!(f, "minmax({min}px, {fr}fr)"),
            Track::Content => f.write_str("minmax(max-content, auto)"),
        }
    }
}

/// Ordered column tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackList(pub Vec<Track>);

impl TrackList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Grid templates shared by every pane.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTemplate {
    /// `grid-template-columns` of the header and of every row.
    pub columns: TrackList,
    /// `grid-template-rows` of a body row.
    pub row: String,
    /// `grid-template-rows` of the header, one track per header level.
    pub header_rows: String,
    /// `grid-template-rows` of the body.
    pub body_rows: String,
}

impl GridTemplate {
    pub fn new(columns: TrackList, header_depth: usize, row_count: usize) -> Self {
        let row = format!("minmax({ROW_MIN_HEIGHT}px, 1fr)");
        let header_rows = if header_depth > 1 {
            format!("repeat({header_depth}, {row})")
        } else {
            row.clone()
        };
        Self {
            columns,
            row,
            header_rows,
            body_rows: format!("repeat({row_count}, 1fr)"),
        }
    }

    /// Inline style of a body row.
    pub fn row_css(&self) -> String {
        format!(
            "grid-template-columns: {}; grid-template-rows: {}",
            self.columns.to_css(),
            self.row
        )
    }

    /// Inline style of the header.
    pub fn header_css(&self) -> String {
        format!(
            "grid-template-columns: {}; grid-template-rows: {}",
            self.columns.to_css(),
            self.header_rows
        )
    }

    /// Inline style of the body.
    pub fn body_css(&self) -> String {
        format!("grid-template-rows: {}", self.body_rows)
    }
}
