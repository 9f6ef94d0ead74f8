//! Footer: total label and the props handed to the pagination control.

use serde::Serialize;

use crate::config::{LocalText, PaginationConfig};
use crate::fetch::FetchState;

use super::{Element, Node};

/// Props for an external pagination control.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationProps {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
    pub disabled: bool,
    pub show_size_changer: bool,
    pub page_size_options: Vec<u32>,
}

impl PaginationProps {
    /// Props reflecting the live fetch state; disabled while loading.
    pub fn from_state<T>(config: &PaginationConfig, state: &FetchState<T>) -> Self {
        Self {
            current: state.page,
            page_size: state.size,
            total: state.total,
            disabled: state.loading,
            show_size_changer: config.show_size_changer,
            page_size_options: config.page_size_options.clone(),
        }
    }
}

/// Render `div.footer`. The total label is blank while loading; the
/// pagination placeholder is present only when pagination is configured.
pub fn render_footer<T>(
    local: &LocalText,
    state: &FetchState<T>,
    pagination: Option<&PaginationProps>,
) -> Node {
    let label = if state.loading {
        String::new()
    } else {
        local.total_label(state.total)
    };
    let mut footer = Element::div()
        .class("footer")
        .child(Element::div().class("total").child(label));

    if let Some(props) = pagination {
        let options = props
            .page_size_options
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut control = Element::div()
            .class("pagination")
            .attr("data-current", props.current.to_string())
            .attr("data-page-size", props.page_size.to_string())
            .attr("data-total", props.total.to_string());
        if props.show_size_changer {
            control = control.attr("data-size-options", options);
        }
        if props.disabled {
            control = control.attr("data-disabled", "true");
        }
        footer = footer.child(control);
    }
    footer.into()
}
