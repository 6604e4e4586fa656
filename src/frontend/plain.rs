//! Plain-text table output for the `print` subcommand.

use crate::core::table::FilterTable;

/// Render header titles and the currently visible rows as aligned text
pub fn render_plain(table: &FilterTable) -> String {
    let titles: Vec<&str> = table.columns().iter().map(|c| c.title()).collect();
    let rows = table.visible_rows();

    let widths: Vec<usize> = titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            rows.iter()
                .filter_map(|r| r.cells.get(idx))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format_line(titles.iter().copied(), &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &rows {
        out.push_str(&format_line(row.cells.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
