//! Serializable column descriptions.
//!
//! `ColumnSpec` is the JSON shape of a column tree. It carries everything
//! except closures; renderers are attached afterwards through the typed
//! builder API on [`Leaf`].

use serde::{Deserialize, Serialize};

use super::{Column, ColumnWidth, Group, Leaf};
use crate::types::Pin;

/// Width as written in JSON: a bare number is a flex width, `{"exact": n}`
/// is a rigid one.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum WidthSpec {
    Flex(f32),
    Exact { exact: f32 },
}

impl From<WidthSpec> for ColumnWidth {
    fn from(spec: WidthSpec) -> Self {
        match spec {
            WidthSpec::Flex(px) => ColumnWidth::Flex(px),
            WidthSpec::Exact { exact } => ColumnWidth::Fixed(exact),
        }
    }
}

/// A column tree node; a node with children is a group.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<WidthSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Pin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ColumnSpec>,
}

impl ColumnSpec {
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Build the typed column. Width and pin on a group node are dropped;
    /// groups derive both from their leaves.
    pub fn into_column<T>(self) -> Column<T> {
        if self.is_group() {
            let children = self.children.into_iter().map(Self::into_column).collect();
            let mut group = Group::new(self.title, children);
            group.key = self.key;
            Column::Group(group)
        } else {
            let mut leaf = Leaf::new(self.title);
            leaf.data_index = self.data_index;
            leaf.key = self.key;
            leaf.width = self.width.map(ColumnWidth::from);
            leaf.fixed = self.fixed;
            Column::Leaf(leaf)
        }
    }
}

impl<T> From<ColumnSpec> for Column<T> {
    fn from(spec: ColumnSpec) -> Self {
        spec.into_column()
    }
}
