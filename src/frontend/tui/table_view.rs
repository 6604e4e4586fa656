//! Renders the filter table and the open dropdown list.
//!
//! Rendering also records where every interactive element landed so mouse
//! clicks can be resolved to a `ClickTarget` against the frame the user saw.

use crate::core::observer::{ClickTarget, DropdownId};
use crate::core::AppCore;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Search box height including its border
const SEARCH_HEIGHT: u16 = 3;
/// Narrowest list that still fits the search placeholder
const MIN_SEARCH_WIDTH: u16 = 16;

/// Screen geometry of an open dropdown list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLayout {
    pub id: DropdownId,
    pub area: Rect,
    pub search: Option<Rect>,
    /// (item index, row rect) for each rendered entry
    pub items: Vec<(usize, Rect)>,
}

/// Where the last frame put each clickable element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    pub toggles: Vec<(DropdownId, Rect)>,
    pub popup: Option<PopupLayout>,
}

impl TableLayout {
    /// Resolve a click position. The open list sits above the header, so it wins.
    pub fn hit_test(&self, x: u16, y: u16) -> ClickTarget {
        let pos = Position::new(x, y);

        if let Some(popup) = &self.popup {
            if let Some((index, _)) = popup.items.iter().find(|(_, rect)| rect.contains(pos)) {
                return ClickTarget::ListItem(popup.id, *index);
            }
            if popup.search.map(|rect| rect.contains(pos)).unwrap_or(false) {
                return ClickTarget::SearchBox(popup.id);
            }
            if popup.area.contains(pos) {
                return ClickTarget::List(popup.id);
            }
        }

        self.toggles
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(id, _)| ClickTarget::Toggle(*id))
            .unwrap_or(ClickTarget::Outside)
    }
}

/// Draw the whole table into `buf` and return its click map
pub fn render_table(app: &AppCore, area: Rect, buf: &mut Buffer) -> TableLayout {
    let mut layout = TableLayout::default();

    let block = Block::default()
        .title(" Filter Table ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width == 0 || inner.height == 0 {
        return layout;
    }

    let [header_area, separator_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let headers = app.table.headers();
    let column_count = headers.len().max(1) as u32;
    let cells = Layout::horizontal(
        (0..column_count).map(|_| Constraint::Ratio(1, column_count)),
    )
    .split(header_area);

    // Header row: centered title plus a toggle at the right edge of each cell
    for (idx, header) in headers.iter().enumerate() {
        let Some(&cell) = cells.get(idx) else {
            continue;
        };
        let dropdown = &header.dropdown;

        let mut title_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        if idx == app.focused {
            title_style = title_style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
        }
        Paragraph::new(dropdown.title())
            .style(title_style)
            .alignment(Alignment::Center)
            .render(cell, buf);

        let toggle_width = cell.width.min(3);
        let toggle = Rect {
            x: cell.right().saturating_sub(toggle_width),
            y: cell.y,
            width: toggle_width,
            height: 1,
        };
        let arrow = if dropdown.is_open() { " ▲ " } else { " ▼ " };
        buf.set_stringn(
            toggle.x,
            toggle.y,
            arrow,
            toggle.width as usize,
            Style::default().fg(Color::Cyan),
        );
        layout.toggles.push((dropdown.id(), toggle));
    }

    buf.set_stringn(
        separator_area.x,
        separator_area.y,
        "─".repeat(separator_area.width as usize),
        separator_area.width as usize,
        Style::default().fg(Color::DarkGray),
    );

    // Body: hidden rows are skipped entirely
    let visible = app.table.visible_rows();
    for (row, y) in visible.iter().zip(body_area.top()..body_area.bottom()) {
        for (idx, text) in row.cells.iter().enumerate() {
            let Some(&cell) = cells.get(idx) else {
                continue;
            };
            buf.set_stringn(cell.x + 1, y, text, cell.width.saturating_sub(1) as usize, Style::default());
        }
    }

    let footer = Line::from(vec![
        Span::styled(app.status_line(), Style::default().fg(Color::Green)),
        Span::styled(
            "  Tab: column  Enter: open/select  Ctrl+R: reset  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    Paragraph::new(footer).render(footer_area, buf);

    if let Some(id) = app.table.open_dropdown() {
        if let Some(&cell) = cells.get(id) {
            layout.popup = render_popup(app, id, cell, inner, buf);
        }
    }

    layout
}

/// Draw the open list under its header cell, right-aligned to the cell
fn render_popup(
    app: &AppCore,
    id: DropdownId,
    cell: Rect,
    bounds: Rect,
    buf: &mut Buffer,
) -> Option<PopupLayout> {
    let dropdown = app.table.dropdown(id)?;
    let visible = dropdown.visible_items();
    let state = dropdown.state();
    let search_height = if dropdown.search_enabled() { SEARCH_HEIGHT } else { 0 };

    let widest = visible
        .iter()
        .map(|(_, item)| u16::try_from(item.chars().count()).unwrap_or(u16::MAX))
        .max()
        .unwrap_or(0);
    let mut width = widest.saturating_add(4);
    if dropdown.search_enabled() {
        width = width.max(MIN_SEARCH_WIDTH);
    }
    let width = width.min(bounds.width);

    let y = cell.y + 1;
    let room = bounds.bottom().saturating_sub(y);
    let max_rows = (app.config.ui.max_list_height as usize).max(1);
    let list_rows = visible
        .len()
        .min(max_rows)
        .min(room.saturating_sub(2 + search_height) as usize);
    let height = (list_rows as u16 + 2 + search_height).min(room);
    if height < 3 {
        return None;
    }

    let x = cell.right().saturating_sub(width).max(bounds.x);
    let area = Rect { x, y, width, height };

    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    block.render(area, buf);

    let mut search = None;
    if search_height > 0 && inner.height >= search_height {
        let search_area = Rect {
            height: search_height,
            ..inner
        };
        let search_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let field_area = search_block.inner(search_area);
        search_block.render(search_area, buf);
        Widget::render(state.search_field(), field_area, buf);
        search = Some(search_area);
    }

    // Keep the highlighted entry in view
    let highlighted_pos = visible
        .iter()
        .position(|(idx, _)| *idx == state.highlighted())
        .unwrap_or(0);
    let offset = (highlighted_pos + 1).saturating_sub(list_rows);

    let list_top = inner.y + if search.is_some() { search_height } else { 0 };
    let mut items = Vec::with_capacity(list_rows);
    for (row, (index, text)) in visible.iter().skip(offset).take(list_rows).enumerate() {
        let rect = Rect {
            x: inner.x,
            y: list_top + row as u16,
            width: inner.width,
            height: 1,
        };

        let style = if *index == state.highlighted() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(255, 215, 0))
                .add_modifier(Modifier::BOLD)
        } else if *index == 0 {
            Style::default().fg(Color::Gray).bg(Color::Black).add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Color::Cyan).bg(Color::Black)
        };

        // Pad the text to fill the entire width
        let text = format!(" {:<width$}", text, width = rect.width.saturating_sub(1) as usize);
        buf.set_stringn(rect.x, rect.y, text, rect.width as usize, style);
        items.push((*index, rect));
    }

    Some(PopupLayout {
        id,
        area,
        search,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::{default_dataset, Column};

    fn app() -> AppCore {
        AppCore::new(Config::default(), &default_dataset())
    }

    fn render(app: &AppCore) -> (Buffer, TableLayout) {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let layout = render_table(app, area, &mut buf);
        (buf, layout)
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn screen_text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| row_text(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_header_and_rows_rendered() {
        let app = app();
        let (buf, layout) = render(&app);

        let header = row_text(&buf, 1);
        assert!(header.contains("Name"));
        assert!(header.contains("Type"));
        assert!(header.contains('▼'));
        assert_eq!(layout.toggles.len(), 2);
        assert!(layout.popup.is_none());

        let screen = screen_text(&buf);
        assert_eq!(screen.matches("Coin").count(), 2);
        assert_eq!(screen.matches("Note").count(), 2);
        assert!(screen.contains("Showing 4 of 4 rows"));
    }

    #[test]
    fn test_filtered_rows_not_rendered() {
        let app = app();
        app.table.filter(Column::Type, Some("Coin"));
        let (buf, _) = render(&app);

        let screen = screen_text(&buf);
        assert!(!screen.contains("Note"));
        assert!(row_text(&buf, 3).contains('A'));
        assert!(row_text(&buf, 4).contains('B'));
        assert!(screen.contains("Showing 2 of 4 rows"));
    }

    #[test]
    fn test_open_popup_lists_items() {
        let mut app = app();
        app.handle_click(ClickTarget::Toggle(1));
        let (buf, layout) = render(&app);

        let popup = layout.popup.expect("popup rendered");
        assert_eq!(popup.id, 1);
        assert!(popup.search.is_some());
        let indices: Vec<usize> = popup.items.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let first = popup.items[0].1;
        assert!(row_text(&buf, first.y).contains("Clear"));
        assert!(row_text(&buf, popup.items[2].1.y).contains("Note"));
        assert!(popup.area.right() <= 59);
    }

    #[test]
    fn test_popup_without_search_box() {
        let mut config = Config::default();
        config.ui.search_enabled = false;
        let mut app = AppCore::new(config, &default_dataset());
        app.handle_click(ClickTarget::Toggle(0));

        let (_, layout) = render(&app);
        let popup = layout.popup.expect("popup rendered");
        assert!(popup.search.is_none());
        assert_eq!(popup.items.len(), 5);
    }

    #[test]
    fn test_list_height_capped() {
        let mut config = Config::default();
        config.ui.max_list_height = 2;
        let mut app = AppCore::new(config, &default_dataset());
        app.handle_click(ClickTarget::Toggle(0));

        let (_, layout) = render(&app);
        assert_eq!(layout.popup.expect("popup rendered").items.len(), 2);
    }

    #[test]
    fn test_popup_width_clamped_for_huge_value() {
        use crate::data::{Datum, DatumType};

        let huge = "x".repeat(usize::from(u16::MAX) + 10);
        let mut app = AppCore::new(Config::default(), &[Datum::new(huge, DatumType::Coin)]);
        app.handle_click(ClickTarget::Toggle(0));

        let (_, layout) = render(&app);
        let popup = layout.popup.expect("popup rendered");
        assert_eq!(popup.area.width, 58);
    }

    #[test]
    fn test_hit_test_regions() {
        let mut app = app();
        let (_, layout) = render(&app);
        let (id, toggle) = layout.toggles[1];
        assert_eq!(layout.hit_test(toggle.x + 1, toggle.y), ClickTarget::Toggle(id));
        assert_eq!(layout.hit_test(0, 0), ClickTarget::Outside);

        app.handle_click(ClickTarget::Toggle(1));
        let (_, layout) = render(&app);
        let popup = layout.popup.clone().expect("popup rendered");
        let (index, rect) = popup.items[2];
        assert_eq!(layout.hit_test(rect.x, rect.y), ClickTarget::ListItem(1, index));
        let search = popup.search.expect("search box");
        assert_eq!(layout.hit_test(search.x + 1, search.y + 1), ClickTarget::SearchBox(1));
        assert_eq!(layout.hit_test(popup.area.x, popup.area.y), ClickTarget::List(1));
    }

    #[test]
    fn test_click_through_rendered_frame() {
        let mut app = app();
        let (_, layout) = render(&app);
        let (_, toggle) = layout.toggles[1];
        app.handle_click(layout.hit_test(toggle.x + 1, toggle.y));

        let (_, layout) = render(&app);
        let popup = layout.popup.clone().expect("popup rendered");
        let (_, coin) = popup.items[1];
        app.handle_click(layout.hit_test(coin.x + 2, coin.y));

        assert_eq!(app.table.open_dropdown(), None);
        assert_eq!(app.table.visible_rows().len(), 2);
    }
}
