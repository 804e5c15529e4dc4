//! Non-interactive output targets: plain text and HTML.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Row, Table, Widget};
use tracing::trace;

use crate::domain::TableStyle;
use crate::table::{BodyRow, HeaderRow, TableArtifact};

/// Display width of every column, capped at `max_width` and at `u16::MAX`.
pub fn column_widths(header: &HeaderRow, body: &[BodyRow], max_width: usize) -> Vec<u16> {
    header
        .cells
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let content_width = body
                .iter()
                .filter_map(|r| r.cells.get(idx))
                .map(|c| Span::raw(c.text()).width())
                .max()
                .unwrap_or(0);
            let width = std::cmp::max(Span::raw(h.label.as_str()).width(), content_width);
            u16::try_from(std::cmp::min(width, max_width)).unwrap_or(u16::MAX)
        })
        .collect()
}

pub fn header_row<'a>(header: &'a HeaderRow, style: &TableStyle) -> Row<'a> {
    Row::new(header.labels().map(Cell::from)).style(style.header)
}

pub fn build_table<'a>(header: &'a HeaderRow, body: &'a [BodyRow], style: &TableStyle) -> Table<'a> {
    let widths = column_widths(header, body, style.max_column_width);
    let rows = body
        .iter()
        .map(|r| Row::new(r.cells.iter().map(|c| Cell::from(c.text()))).style(style.row));

    Table::new(rows, widths.into_iter().map(Constraint::Length))
        .header(header_row(header, style))
        .column_spacing(style.column_spacing)
}

/// Draw the artifact as plain lines: header, a `─` separator, one line per body row.
///
/// Each cell is drawn into a one-line off-screen buffer of its column width, so
/// neither the row count nor the total table width is bounded by the buffer size.
pub fn to_text(artifact: &TableArtifact, style: &TableStyle) -> Vec<String> {
    let TableArtifact::Table { header, body } = artifact else {
        return Vec::new();
    };

    let widths = column_widths(header, body, style.max_column_width);
    let spacing = " ".repeat(style.column_spacing as usize);
    let total_width = widths.iter().map(|&w| w as usize).sum::<usize>()
        + spacing.len() * widths.len().saturating_sub(1);
    trace!("Text table {} columns, {total_width} wide, {} rows", widths.len(), body.len());

    let mut buffers: Vec<Buffer> = widths
        .iter()
        .map(|&w| Buffer::empty(Rect::new(0, 0, w, 1)))
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(text_line(&mut buffers, header.labels(), &spacing, style.header));
    lines.push("─".repeat(total_width));
    for row in body.iter() {
        let texts = row.cells.iter().map(|c| c.text());
        lines.push(text_line(&mut buffers, texts, &spacing, style.row));
    }
    lines
}

fn text_line<T: AsRef<str>>(
    buffers: &mut [Buffer],
    texts: impl Iterator<Item = T>,
    spacing: &str,
    style: Style,
) -> String {
    let cells = buffers
        .iter_mut()
        .zip(texts)
        .map(|(buf, text)| {
            buf.reset();
            let area = buf.area;
            Span::styled(text.as_ref(), style).render(area, buf);
            buffer_line(buf)
        })
        .collect::<Vec<String>>();
    cells.join(spacing).trim_end().to_string()
}

/// The first line of `buf`, one symbol per display column.
fn buffer_line(buf: &Buffer) -> String {
    let mut line = String::new();
    let mut skip = 0;
    for x in 0..buf.area.width {
        let symbol = buf[(x, 0)].symbol();
        if skip == 0 {
            line.push_str(symbol);
        }
        skip = std::cmp::max(skip, Span::raw(symbol).width()).saturating_sub(1);
    }
    line
}

pub fn to_html(artifact: &TableArtifact, style: &TableStyle) -> String {
    let TableArtifact::Table { header, body } = artifact else {
        return String::new();
    };

    let mut html = String::new();
    match &style.html_class {
        Some(class) => html.push_str(&format!("<table class=\"{}\">\n", escape_html_attr(class))),
        None => html.push_str("<table>\n"),
    }

    html.push_str("  <thead>\n    <tr>\n");
    for h in header.cells.iter() {
        html.push_str(&format!("      <th>{}</th>\n", escape_html(&h.label)));
    }
    html.push_str("    </tr>\n  </thead>\n");

    html.push_str("  <tbody>\n");
    for row in body.iter() {
        html.push_str("    <tr>\n");
        for cell in row.cells.iter() {
            html.push_str(&format!(
                "      <td data-field=\"{}\">{}</td>\n",
                escape_html_attr(&cell.key),
                escape_html(&cell.text())
            ));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_html_attr(s: &str) -> String {
    escape_html(s)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}
