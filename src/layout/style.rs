//! Inline styles for panes and cells.
//!
//! Each style is a plain struct built by a pure function and rendered to a
//! CSS declaration list with `to_css`. Host supplied [`StyleOverrides`] are
//! merged over the computed declarations by `to_css_with`.

use crate::config::{PaneWidths, ScrollConfig};
use crate::types::{Pane, Pin};

/// Ordered CSS declarations. Setting a property again replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations(Vec<(String, String)>);

impl Declarations {
    /// Parse `prop: value; prop: value`. Entries without a colon are skipped.
    pub fn parse(css: &str) -> Self {
        let mut decls = Self::default();
        for entry in css.split(';') {
            if let Some((property, value)) = entry.split_once(':') {
                let property = property.trim();
                if !property.is_empty() {
                    decls.set(property, value.trim());
                }
            }
        }
        decls
    }

    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self.0.push((property, value.to_string())),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set every declaration of `other` whose property is not in `keep`.
    pub fn merge_except(&mut self, other: &Declarations, keep: &[&str]) {
        for (property, value) in &other.0 {
            if !keep.contains(&property.as_str()) {
                self.set(property, value);
            }
        }
    }

    pub fn merge(&mut self, other: &Declarations) {
        self.merge_except(other, &[]);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Host styles layered over the computed pane, body and row styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOverrides {
    /// Every pane container. Pinned panes ignore `overflow*` and the
    /// properties that anchor them.
    pub table: Declarations,
    pub body: Declarations,
    /// Body rows and the header.
    pub row: Declarations,
}

impl StyleOverrides {
    pub fn table(mut self, css: &str) -> Self {
        self.table = Declarations::parse(css);
        self
    }

    pub fn body(mut self, css: &str) -> Self {
        self.body = Declarations::parse(css);
        self
    }

    pub fn row(mut self, css: &str) -> Self {
        self.row = Declarations::parse(css);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Hidden,
    Auto,
}

impl Overflow {
    fn as_str(self) -> &'static str {
        match self {
            Overflow::Hidden => "hidden",
            Overflow::Auto => "auto",
        }
    }

    fn when(enabled: bool) -> Self {
        if enabled {
            Overflow::Auto
        } else {
            Overflow::Hidden
        }
    }
}

/// Stacking of a cell relative to the same cell in the other panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZIndex {
    Low = -1,
    High = 1,
}

/// The scrollable middle pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterPaneStyle {
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    /// Fixed height in pixels; `None` is `auto`.
    pub height: Option<f32>,
}

impl CenterPaneStyle {
    pub fn new(scroll: &ScrollConfig) -> Self {
        Self {
            overflow_x: Overflow::when(scroll.x),
            overflow_y: Overflow::when(scroll.y.is_some()),
            height: scroll.y,
        }
    }

    /// No scroll hints: both axes hidden.
    pub fn is_plain(&self) -> bool {
        self.overflow_x == Overflow::Hidden && self.overflow_y == Overflow::Hidden
    }

    pub fn to_css(&self) -> String {
        if self.is_plain() {
            return "overflow: hidden".to_string();
        }
        let height = self
            .height
            .map_or_else(|| "auto".to_string(), |px| format!("{px}px"));
        format!(
            "overflow-x: {}; overflow-y: {}; height: {height}",
            self.overflow_x.as_str(),
            self.overflow_y.as_str()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneWidth {
    Full,
    /// `calc(100% - Npx)`
    LessScrollbar(f32),
    Px(f32),
}

impl PaneWidth {
    fn to_css(self) -> String {
        match self {
            PaneWidth::Full => "100%".to_string(),
            PaneWidth::LessScrollbar(px) => format!("calc(100% - {px}px)"),
            PaneWidth::Px(px) => format!("{px}px"),
        }
    }
}

/// A pane laid over the center pane and anchored to one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedPaneStyle {
    pub side: Pin,
    pub width: PaneWidth,
    /// Distance from the anchored edge, in pixels.
    pub offset: f32,
    pub height: Option<f32>,
}

impl PinnedPaneStyle {
    pub fn new(side: Pin, scroll: &ScrollConfig, widths: &PaneWidths) -> Self {
        let sb = scroll.scrollbar_width;
        let computed = match side {
            Pin::Left if scroll.x => PaneWidth::LessScrollbar(sb),
            Pin::Left | Pin::Right => PaneWidth::Full,
        };
        let explicit = match side {
            Pin::Left => widths.left,
            Pin::Right => widths.right,
        };
        let offset = match side {
            Pin::Right if scroll.y.is_some() => sb,
            Pin::Left | Pin::Right => 0.0,
        };
        Self {
            side,
            width: explicit.map_or(computed, PaneWidth::Px),
            offset,
            height: scroll.y.map(|y| (y - sb).max(0.0)),
        }
    }

    pub fn to_css(&self) -> String {
        let mut decls = vec![
            "position: absolute".to_string(),
            "top: 0".to_string(),
            format!("width: {}", self.width.to_css()),
            "border: none".to_string(),
            "overflow: hidden".to_string(),
        ];
        if let Some(height) = self.height {
            decls.push(format!("height: {height}px"));
        }
        match self.side {
            Pin::Left => decls.push(format!("left: {}px", self.offset)),
            Pin::Right => {
                decls.push(format!("right: {}px", self.offset));
                decls.push("justify-content: flex-end".to_string());
            }
        }
        decls.join("; ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneStyle {
    Center(CenterPaneStyle),
    Pinned(PinnedPaneStyle),
}

impl PaneStyle {
    /// CSS with the host's table style merged in.
    ///
    /// The center pane takes the override over `overflow: hidden`, while
    /// scroll hints still win. Pinned panes keep overflow hidden and their
    /// anchoring, and a scroll height wins over an override height.
    pub fn to_css_with(&self, table: &Declarations) -> String {
        if table.is_empty() {
            return self.to_css();
        }
        match self {
            PaneStyle::Center(style) => {
                let mut decls = Declarations::parse("overflow: hidden");
                decls.merge(table);
                if !style.is_plain() {
                    decls.merge(&Declarations::parse(&style.to_css()));
                }
                decls.to_css()
            }
            PaneStyle::Pinned(style) => {
                let mut keep = vec!["overflow", "overflow-x", "overflow-y"];
                match style.side {
                    Pin::Left => keep.extend(["left", "width"]),
                    Pin::Right => keep.extend(["right", "justify-content"]),
                }
                if matches!(style.width, PaneWidth::Px(_)) {
                    keep.push("width");
                }
                if style.height.is_some() {
                    keep.push("height");
                }
                let mut decls = Declarations::parse(&style.to_css());
                decls.merge_except(table, &keep);
                decls.to_css()
            }
        }
    }

    pub fn for_pane(pane: Pane, scroll: &ScrollConfig, widths: &PaneWidths) -> Self {
        match pane {
            Pane::Center => PaneStyle::Center(CenterPaneStyle::new(scroll)),
            Pane::Left => PaneStyle::Pinned(PinnedPaneStyle::new(Pin::Left, scroll, widths)),
            Pane::Right => PaneStyle::Pinned(PinnedPaneStyle::new(Pin::Right, scroll, widths)),
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            PaneStyle::Center(style) => style.to_css(),
            PaneStyle::Pinned(style) => style.to_css(),
        }
    }
}

/// Visibility of one header or body cell within one pane.
///
/// Hidden cells keep their space so the three panes line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub visible: bool,
    pub z_index: ZIndex,
}

impl CellStyle {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            z_index: if visible { ZIndex::High } else { ZIndex::Low },
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "position: relative; z-index: {}; visibility: {}",
            self.z_index as i8,
            if self.visible { "visible" } else { "hidden" }
        )
    }
}
