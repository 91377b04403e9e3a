//! Tables become one HTML `<table>` built from their row children.

use crate::error::AppError;
use crate::formatting::block_renderer::BlockRenderer;
use crate::formatting::escape::Grammar;
use crate::formatting::rich_text::render_cell;
use crate::model::{Block, TableBlock};
use crate::types::RichTextItem;
use futures::future::BoxFuture;
use futures::FutureExt;

/// One row: a sequence of cells, each a run sequence.
pub type TableRowCells = Vec<Vec<RichTextItem>>;

pub fn transform_table<'a>(
    renderer: &'a BlockRenderer,
    block: &'a Block,
) -> BoxFuture<'a, Result<String, AppError>> {
    async move {
        let Block::Table(table) = block else {
            return Ok(String::new());
        };
        if !table.common.has_children {
            log::debug!("Table {} has no rows", table.common.id.short());
            return Ok(String::new());
        }

        let rows: Vec<TableRowCells> = renderer
            .source()
            .all_children(&table.common.id)
            .await?
            .into_iter()
            .filter_map(|child| match child {
                Block::TableRow(row) => Some(row.cells),
                _ => None,
            })
            .collect();
        Ok(render_table_html(table, &rows))
    }
    .boxed()
}

/// Renders rows as a table, right-padding ragged rows with empty cells.
///
/// With a column header the first row goes into `<thead>`; with a row
/// header the first cell of every body row is a `<th>`.
pub fn render_table_html(table: &TableBlock, rows: &[TableRowCells]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || columns == 0 {
        return String::new();
    }

    let (header, body) = match rows.split_first() {
        Some((first, rest)) if table.has_column_header => (Some(first), rest),
        _ => (None, rows),
    };

    let mut html = String::from("<table>\n");
    if let Some(header) = header {
        html.push_str("<thead>\n");
        html.push_str(&render_row(header, columns, |_| true));
        html.push_str("</thead>\n");
    }
    if !body.is_empty() {
        html.push_str("<tbody>\n");
        for row in body {
            html.push_str(&render_row(row, columns, |index| {
                table.has_row_header && index == 0
            }));
        }
        html.push_str("</tbody>\n");
    }
    html.push_str("</table>");
    html
}

fn render_row(cells: &[Vec<RichTextItem>], columns: usize, is_header: impl Fn(usize) -> bool) -> String {
    let mut row = String::from("<tr>");
    for index in 0..columns {
        let content = cells
            .get(index)
            .map(|cell| render_cell(cell, Grammar::Html))
            .unwrap_or_default();
        let tag = if is_header(index) { "th" } else { "td" };
        row.push_str(&format!("<{tag}>{}</{tag}>", content));
    }
    row.push_str("</tr>\n");
    row
}
