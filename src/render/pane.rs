//! One pane of the table.
//!
//! Every pane renders every column; cells of leaves living in another pane
//! are hidden but keep their grid space, so the panes stay aligned when laid
//! over each other.

use crate::column::{self, Column, Leaf};
use crate::layout::{HeaderSpan, TableLayout};
use crate::types::{Pane, Record};
use crate::viewer::Reload;

use super::{Element, Node};

/// Inputs for rendering one pane.
pub struct PaneContext<'a, T> {
    pub pane: Pane,
    pub layout: &'a TableLayout,
    pub columns: &'a [Column<T>],
    pub rows: &'a [T],
    /// Record field used as the row key.
    pub row_key: &'a str,
    pub loading: bool,
    pub empty_text: &'a str,
    pub reload: &'a Reload,
}

/// Render `div.table-container.<pane>` with its header and body.
pub fn render_pane<T: Record>(ctx: &PaneContext<'_, T>) -> Node {
    let pane = ctx.pane;
    let container = Element::div()
        .class("table-container")
        .class(pane.as_str())
        .key(pane.as_str())
        .attr("data-pane", pane.as_str())
        .style(ctx.layout.pane_css(pane))
        .child(render_header(ctx));

    let body = if ctx.rows.is_empty() {
        let text = if ctx.loading { "" } else { ctx.empty_text };
        Element::div().class("empty-text").child(text)
    } else {
        render_body(ctx)
    };
    container.child(body).into()
}

fn render_header<T>(ctx: &PaneContext<'_, T>) -> Element {
    Element::div()
        .class("header")
        .style(ctx.layout.header_css())
        .children(
            ctx.layout
                .headers
                .iter()
                .filter(|span| span.span > 0)
                .map(|span| render_header_span(ctx, span)),
        )
}

fn render_header_span<T>(ctx: &PaneContext<'_, T>, span: &HeaderSpan) -> Element {
    let cell = ctx.layout.header_style(ctx.pane, span).to_css();
    let placement = format!("grid-column: span {}; grid-row: span {}", span.span, span.row_span);

    if span.is_leaf {
        return Element::div()
            .class("column-header")
            .key(span.key.as_str())
            .style(format!("{cell}; {placement}"))
            .child(span.title.node());
    }

    let title = Element::div()
        .class("column-header")
        .class("group-title")
        .style("grid-column: 1 / -1")
        .child(span.title.node());
    Element::div()
        .class("column-group")
        .key(span.key.as_str())
        .style(format!(
            "{cell}; {placement}; display: grid; \
             grid-template-columns: subgrid; grid-template-rows: subgrid"
        ))
        .child(title)
        .children(
            span.children
                .iter()
                .filter(|child| child.span > 0)
                .map(|child| render_header_span(ctx, child)),
        )
}

fn render_body<T: Record>(ctx: &PaneContext<'_, T>) -> Element {
    let leaves = column::leaves(ctx.columns);
    let row_css = ctx.layout.row_css();
    let rows = ctx.rows.iter().enumerate().map(|(index, record)| {
        let key = record
            .field(ctx.row_key)
            .unwrap_or_else(|| format!("row-{index}"));
        Element::div()
            .class("row")
            .key(key)
            .style(row_css.as_str())
            .children(
                leaves
                    .iter()
                    .enumerate()
                    .map(|(position, leaf)| render_cell(ctx, leaf, position, record, index)),
            )
    });
    Element::div()
        .class("body")
        .style(ctx.layout.body_css())
        .children(rows)
}

fn render_cell<T: Record>(
    ctx: &PaneContext<'_, T>,
    leaf: &Leaf<T>,
    position: usize,
    record: &T,
    row_index: usize,
) -> Element {
    let key = ctx
        .layout
        .leaves
        .get(position)
        .map_or_else(|| leaf.render_key(position), |track| track.key.clone());

    let lookup = || {
        leaf.data_index
            .as_deref()
            .map(|field| record.field(field).unwrap_or_default())
    };

    let content = match &leaf.render {
        Some(render) => render(record, row_index, ctx.reload),
        None => lookup().map_or(Node::Empty, Node::from),
    };
    let tooltip = match &leaf.title_render {
        Some(render) => render(record, row_index),
        None => lookup().unwrap_or_default(),
    };

    let mut cell = Element::div()
        .class("column-item")
        .key(key)
        .style(ctx.layout.cell_style(ctx.pane, position).to_css());
    if !tooltip.is_empty() {
        cell = cell.attr("title", tooltip);
    }
    cell.child(content)
}
