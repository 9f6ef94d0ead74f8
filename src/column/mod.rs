//! Column tree: the recursive description of header and cell structure.
//!
//! A column is either a [`Leaf`], which occupies one grid track and renders
//! one cell per row, or a [`Group`], whose header spans the tracks of its
//! children. Groups carry no width or pin of their own; both come from the
//! leaves underneath.

mod spec;

pub use spec::{ColumnSpec, WidthSpec};

use std::fmt;
use std::rc::Rc;

use crate::render::Node;
use crate::types::{Pane, Pin};
use crate::viewer::Reload;

/// Cell renderer: `(record, row_index, reload) -> content`.
pub type CellRender<T> = Rc<dyn Fn(&T, usize, &Reload) -> Node>;

/// Tooltip renderer: `(record, row_index) -> tooltip text`.
pub type TooltipRender<T> = Rc<dyn Fn(&T, usize) -> String>;

/// Header label.
#[derive(Clone)]
pub enum Title {
    Text(String),
    Render(Rc<dyn Fn() -> Node>),
}

impl Title {
    pub fn node(&self) -> Node {
        match self {
            Title::Text(text) => Node::text(text.as_str()),
            Title::Render(render) => render(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Title::Text(text) => Some(text),
            Title::Render(_) => None,
        }
    }
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Title::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Title::Render(_) => f.write_str("Render(..)"),
        }
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title::Text(text.to_string())
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Title::Text(text)
    }
}

/// Declared width of a leaf column, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Exactly this wide.
    Fixed(f32),
    /// At least this wide; extra space is shared in proportion to the width.
    Flex(f32),
}

impl ColumnWidth {
    pub fn px(self) -> f32 {
        match self {
            ColumnWidth::Fixed(px) | ColumnWidth::Flex(px) => px.max(0.0),
        }
    }
}

impl From<f32> for ColumnWidth {
    fn from(px: f32) -> Self {
        ColumnWidth::Flex(px)
    }
}

impl From<u32> for ColumnWidth {
    #[allow(clippy::cast_precision_loss)]
    fn from(px: u32) -> Self {
        ColumnWidth::Flex(px as f32)
    }
}

impl From<i32> for ColumnWidth {
    #[allow(clippy::cast_precision_loss)]
    fn from(px: i32) -> Self {
        ColumnWidth::Flex(px.max(0) as f32)
    }
}

/// A column that renders one cell per row.
pub struct Leaf<T> {
    pub title: Title,
    pub data_index: Option<String>,
    pub key: Option<String>,
    pub render: Option<CellRender<T>>,
    pub title_render: Option<TooltipRender<T>>,
    pub width: Option<ColumnWidth>,
    pub fixed: Option<Pin>,
}

impl<T> Leaf<T> {
    pub fn new(title: impl Into<Title>) -> Self {
        Self {
            title: title.into(),
            data_index: None,
            key: None,
            render: None,
            title_render: None,
            width: None,
            fixed: None,
        }
    }

    /// Field of the record this column displays.
    pub fn data_index(mut self, field: impl Into<String>) -> Self {
        self.data_index = Some(field.into());
        self
    }

    /// Stable identity; required when there is no `data_index` or it repeats.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Proportional width (see [`ColumnWidth::Flex`]).
    pub fn width(mut self, width: impl Into<ColumnWidth>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Rigid pixel width.
    pub fn exact_width(mut self, px: f32) -> Self {
        self.width = Some(ColumnWidth::Fixed(px));
        self
    }

    pub fn fixed(mut self, pin: Pin) -> Self {
        self.fixed = Some(pin);
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T, usize, &Reload) -> Node + 'static,
    {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn title_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T, usize) -> String + 'static,
    {
        self.title_render = Some(Rc::new(render));
        self
    }

    pub fn pane(&self) -> Pane {
        Pane::for_pin(self.fixed)
    }

    /// Render key: explicit key, else data index, else the leaf position.
    pub fn render_key(&self, position: usize) -> String {
        self.key
            .as_deref()
            .or(self.data_index.as_deref())
            .map_or_else(|| format!("col-{position}"), str::to_string)
    }
}

impl<T> Clone for Leaf<T> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            data_index: self.data_index.clone(),
            key: self.key.clone(),
            render: self.render.as_ref().map(Rc::clone),
            title_render: self.title_render.as_ref().map(Rc::clone),
            width: self.width,
            fixed: self.fixed,
        }
    }
}

impl<T> fmt::Debug for Leaf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("title", &self.title)
            .field("data_index", &self.data_index)
            .field("key", &self.key)
            .field("render", &self.render.is_some())
            .field("title_render", &self.title_render.is_some())
            .field("width", &self.width)
            .field("fixed", &self.fixed)
            .finish()
    }
}

/// A header spanning its children.
pub struct Group<T> {
    pub title: Title,
    pub key: Option<String>,
    pub children: Vec<Column<T>>,
}

impl<T> Group<T> {
    pub fn new(title: impl Into<Title>, children: Vec<Column<T>>) -> Self {
        Self {
            title: title.into(),
            key: None,
            children,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Render key: explicit key, else title text, else the first leaf position.
    pub fn render_key(&self, first_leaf: usize) -> String {
        self.key
            .as_deref()
            .or(self.title.as_text())
            .map_or_else(|| format!("group-{first_leaf}"), str::to_string)
    }
}

impl<T> Clone for Group<T> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            key: self.key.clone(),
            children: self.children.clone(),
        }
    }
}

impl<T> fmt::Debug for Group<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("title", &self.title)
            .field("key", &self.key)
            .field("children", &self.children)
            .finish()
    }
}

/// A node of the column tree.
pub enum Column<T> {
    Leaf(Leaf<T>),
    Group(Group<T>),
}

impl<T> Column<T> {
    /// Start building a leaf column.
    pub fn leaf(title: impl Into<Title>) -> Leaf<T> {
        Leaf::new(title)
    }

    pub fn group(title: impl Into<Title>, children: Vec<Column<T>>) -> Self {
        Column::Group(Group::new(title, children))
    }

    pub fn title(&self) -> &Title {
        match self {
            Column::Leaf(leaf) => &leaf.title,
            Column::Group(group) => &group.title,
        }
    }

    /// Number of grid tracks this node occupies.
    pub fn leaf_count(&self) -> usize {
        match self {
            Column::Leaf(_) => 1,
            Column::Group(group) => group.children.iter().map(Column::leaf_count).sum(),
        }
    }

    /// Header rows this node needs (a leaf needs one).
    pub fn depth(&self) -> usize {
        match self {
            Column::Leaf(_) => 1,
            Column::Group(group) => {
                1 + group.children.iter().map(Column::depth).max().unwrap_or(0)
            }
        }
    }

    /// Leaves under this node, left to right.
    pub fn leaves(&self) -> Vec<&Leaf<T>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf<T>>) {
        match self {
            Column::Leaf(leaf) => out.push(leaf),
            Column::Group(group) => {
                for child in &group.children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl<T> From<Leaf<T>> for Column<T> {
    fn from(leaf: Leaf<T>) -> Self {
        Column::Leaf(leaf)
    }
}

impl<T> From<Group<T>> for Column<T> {
    fn from(group: Group<T>) -> Self {
        Column::Group(group)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        match self {
            Column::Leaf(leaf) => Column::Leaf(leaf.clone()),
            Column::Group(group) => Column::Group(group.clone()),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Leaf(leaf) => leaf.fmt(f),
            Column::Group(group) => group.fmt(f),
        }
    }
}

/// All leaves of a column list, left to right.
pub fn leaves<T>(columns: &[Column<T>]) -> Vec<&Leaf<T>> {
    let mut out = Vec::new();
    for column in columns {
        column.collect_leaves(&mut out);
    }
    out
}

/// Header rows needed by a column list.
pub fn header_depth<T>(columns: &[Column<T>]) -> usize {
    columns.iter().map(Column::depth).max().unwrap_or(1)
}

/// Whether any leaf is pinned to `pin`.
pub fn has_pinned<T>(columns: &[Column<T>], pin: Pin) -> bool {
    leaves(columns).iter().any(|leaf| leaf.fixed == Some(pin))
}
