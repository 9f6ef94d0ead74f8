//! Table configuration.
//!
//! [`TableOptions`] is the JSON surface (camelCase, as a JavaScript host
//! would write it). It converts into a typed [`TableConfig`], which is where
//! cell and title renderers are attached.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnSpec};
use crate::error::{GridError, Result};
use crate::layout::StyleOverrides;

/// Default scrollbar width subtracted from pinned panes.
pub const DEFAULT_SCROLLBAR_WIDTH: f32 = 17.0;

/// Page sizes offered by the size changer.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [u32; 6] = [10, 20, 30, 40, 50, 100];

/// Initial pagination values and pagination control options.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
    pub show_size_changer: bool,
    pub page_size_options: Vec<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: 10,
            total: 0,
            show_size_changer: true,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

/// Scroll hints for the center pane.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollConfig {
    /// Horizontal scrolling in the center pane.
    pub x: bool,
    /// Fixed body height in pixels; enables vertical scrolling.
    pub y: Option<f32>,
    pub scrollbar_width: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            x: false,
            y: None,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
        }
    }
}

/// Explicit widths for the pinned panes, overriding the computed ones.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaneWidths {
    pub left: Option<f32>,
    pub right: Option<f32>,
}

/// User-facing strings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalText {
    /// Shown in the body when a loaded page has no rows.
    pub empty_text: String,
    /// Footer label; `{total}` is replaced by the row count.
    pub total_text: String,
}

impl Default for LocalText {
    fn default() -> Self {
        Self {
            empty_text: "No Data".to_string(),
            total_text: "{total} items".to_string(),
        }
    }
}

impl LocalText {
    pub fn total_label(&self, total: u64) -> String {
        self.total_text.replace("{total}", &total.to_string())
    }
}

/// JSON table options.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    #[serde(default)]
    pub row_key: String,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalText>,
    #[serde(default)]
    pub bordered: bool,
    /// `None` disables the pagination control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationConfig>,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub pane_widths: PaneWidths,
    /// CSS declarations merged into every pane container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,
    /// CSS declarations merged into the header and every row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_style: Option<String>,
}

impl TableOptions {
    /// Parse options from JSON.
    ///
    /// # Errors
    /// Returns an error if the JSON does not describe table options.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into a typed configuration.
    ///
    /// # Errors
    /// Returns [`GridError::Config`] when `rowKey` is missing.
    pub fn into_config<T>(self) -> Result<TableConfig<T>> {
        let mut styles = StyleOverrides::default();
        if let Some(css) = &self.table_style {
            styles = styles.table(css);
        }
        if let Some(css) = &self.body_style {
            styles = styles.body(css);
        }
        if let Some(css) = &self.row_style {
            styles = styles.row(css);
        }
        let config = TableConfig {
            columns: self.columns.into_iter().map(Column::from).collect(),
            row_key: self.row_key,
            local: self.local.unwrap_or_default(),
            bordered: self.bordered,
            pagination: self.pagination,
            scroll: self.scroll,
            pane_widths: self.pane_widths,
            styles,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Typed table configuration.
#[derive(Debug)]
pub struct TableConfig<T> {
    pub columns: Vec<Column<T>>,
    /// Record field that identifies a row.
    pub row_key: String,
    pub local: LocalText,
    pub bordered: bool,
    pub pagination: Option<PaginationConfig>,
    pub scroll: ScrollConfig,
    pub pane_widths: PaneWidths,
    pub styles: StyleOverrides,
}

impl<T> TableConfig<T> {
    pub fn new(row_key: impl Into<String>, columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            row_key: row_key.into(),
            local: LocalText::default(),
            bordered: false,
            pagination: None,
            scroll: ScrollConfig::default(),
            pane_widths: PaneWidths::default(),
            styles: StyleOverrides::default(),
        }
    }

    pub fn local(mut self, local: LocalText) -> Self {
        self.local = local;
        self
    }

    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn scroll(mut self, scroll: ScrollConfig) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn pane_widths(mut self, widths: PaneWidths) -> Self {
        self.pane_widths = widths;
        self
    }

    pub fn styles(mut self, styles: StyleOverrides) -> Self {
        self.styles = styles;
        self
    }

    /// Starting page, size and total for the fetch machine.
    pub fn initial_pagination(&self) -> PaginationConfig {
        self.pagination.clone().unwrap_or_default()
    }

    /// # Errors
    /// Returns [`GridError::Config`] when the row key is empty.
    pub fn validate(&self) -> Result<()> {
        if self.row_key.trim().is_empty() {
            return Err(GridError::Config("rowKey is required".to_string()));
        }
        Ok(())
    }
}

impl<T> Clone for TableConfig<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            row_key: self.row_key.clone(),
            local: self.local.clone(),
            bordered: self.bordered,
            pagination: self.pagination.clone(),
            scroll: self.scroll,
            pane_widths: self.pane_widths,
            styles: self.styles.clone(),
        }
    }
}
