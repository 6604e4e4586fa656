use crate::config::Config;
use crate::core::dropdown::SharedObserver;
use crate::core::input_router::{route_key, RouteContext, TableAction};
use crate::core::observer::{ClickDispatcher, ClickTarget};
use crate::core::table::FilterTable;
use crate::data::Datum;
use crossterm::event::KeyEvent;
use std::cell::RefCell;
use std::rc::Rc;

/// Core application state (frontend-agnostic)
///
/// AppCore owns the table, the outside-click dispatcher every dropdown
/// subscribes to, and the header focus used for keyboard control. Frontends
/// translate raw input into key events and resolved `ClickTarget`s and read
/// the table back to render it.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Table with its header dropdowns and body rows
    pub table: FilterTable,

    /// Outside-click observer shared with every dropdown
    pub dispatcher: Rc<RefCell<ClickDispatcher>>,

    /// Header that receives keyboard input
    pub focused: usize,

    /// Application running flag
    pub running: bool,
}

impl AppCore {
    pub fn new(config: Config, data: &[Datum]) -> Self {
        let dispatcher = Rc::new(RefCell::new(ClickDispatcher::new()));
        let observer: SharedObserver = dispatcher.clone();
        let table = FilterTable::build(data, config.dropdown_options(), observer);

        Self {
            config,
            table,
            dispatcher,
            focused: 0,
            running: true,
        }
    }

    /// Deliver a click: the owning dropdown reacts first, then every
    /// subscribed dropdown sees it as a potential outside click.
    pub fn handle_click(&mut self, target: ClickTarget) {
        if let Some(owner) = target.owner() {
            self.focused = owner;
            if let Some(dropdown) = self.table.dropdown_mut(owner) {
                dropdown.handle_click(&target);
            }
        }

        self.dispatcher.borrow().dispatch(&target);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = route_key(key, self.route_context());
        self.apply(action);
    }

    /// Pasted text goes to the focused dropdown's search box
    pub fn handle_paste(&mut self, text: &str) {
        if let Some(d) = self.table.dropdown_mut(self.focused) {
            d.search_paste(text);
        }
    }

    fn route_context(&self) -> RouteContext {
        self.table
            .dropdown(self.focused)
            .map(|d| RouteContext {
                dropdown_open: d.is_open(),
                search_enabled: d.search_enabled(),
            })
            .unwrap_or_default()
    }

    pub fn apply(&mut self, action: TableAction) {
        let focused = self.focused;
        match action {
            TableAction::FocusNext => self.move_focus(1),
            TableAction::FocusPrevious => self.move_focus(-1),
            // Keyboard activation behaves like clicking the toggle
            TableAction::Toggle => self.handle_click(ClickTarget::Toggle(focused)),
            TableAction::HighlightUp => {
                if let Some(d) = self.table.dropdown_mut(focused) {
                    d.highlight_previous();
                }
            }
            TableAction::HighlightDown => {
                if let Some(d) = self.table.dropdown_mut(focused) {
                    d.highlight_next();
                }
            }
            TableAction::Select => {
                if let Some(d) = self.table.dropdown_mut(focused) {
                    d.select_highlighted();
                }
            }
            TableAction::Close => {
                if let Some(d) = self.table.dropdown_mut(focused) {
                    d.close();
                }
            }
            TableAction::SearchInput(key) => {
                if let Some(d) = self.table.dropdown_mut(focused) {
                    d.search_input(key);
                }
            }
            TableAction::Reset => {
                self.close_all();
                self.table.reset();
            }
            TableAction::Quit => {
                tracing::info!("Quit requested");
                self.running = false;
            }
            TableAction::None => {}
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let count = self.table.headers().len();
        if count == 0 {
            return;
        }
        self.close_all();
        self.focused = (self.focused as isize + delta).rem_euclid(count as isize) as usize;
    }

    fn close_all(&mut self) {
        for id in 0..self.table.headers().len() {
            if let Some(d) = self.table.dropdown_mut(id) {
                d.close();
            }
        }
    }

    /// Footer text: how many rows are shown
    pub fn status_line(&self) -> String {
        let rows = self.table.rows();
        let shown = rows.iter().filter(|r| r.visible).count();
        format!("Showing {} of {} rows", shown, rows.len())
    }

    /// Detach listeners and drop the table
    pub fn shutdown(&mut self) {
        self.table.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{default_dataset, Column};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> AppCore {
        AppCore::new(Config::default(), &default_dataset())
    }

    fn press(app: &mut AppCore, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn visible_names(app: &AppCore) -> Vec<String> {
        app.table
            .visible_rows()
            .into_iter()
            .map(|r| r.cells[Column::Name.index()].clone())
            .collect()
    }

    #[test]
    fn test_click_toggle_then_item_filters() {
        let mut app = app();
        app.handle_click(ClickTarget::Toggle(1));
        assert_eq!(app.table.open_dropdown(), Some(1));
        assert_eq!(app.focused, 1);

        app.handle_click(ClickTarget::ListItem(1, 1));
        assert_eq!(app.table.open_dropdown(), None);
        assert_eq!(visible_names(&app), vec!["A", "B"]);
        assert_eq!(app.status_line(), "Showing 2 of 4 rows");
    }

    #[test]
    fn test_opening_one_header_closes_other() {
        let mut app = app();
        app.handle_click(ClickTarget::Toggle(0));
        app.handle_click(ClickTarget::Toggle(1));
        assert_eq!(app.table.open_dropdown(), Some(1));
        assert!(!app.table.dropdown(0).unwrap().is_open());
    }

    #[test]
    fn test_outside_click_closes() {
        let mut app = app();
        app.handle_click(ClickTarget::Toggle(0));
        app.handle_click(ClickTarget::Outside);
        assert_eq!(app.table.open_dropdown(), None);
    }

    #[test]
    fn test_click_in_list_padding_keeps_open() {
        let mut app = app();
        app.handle_click(ClickTarget::Toggle(0));
        app.handle_click(ClickTarget::List(0));
        app.handle_click(ClickTarget::SearchBox(0));
        assert_eq!(app.table.open_dropdown(), Some(0));
    }

    #[test]
    fn test_keyboard_search_and_select() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused, 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.table.open_dropdown(), Some(1));

        for c in "note".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.table.open_dropdown(), None);
        assert_eq!(visible_names(&app), vec!["C", "D"]);
    }

    #[test]
    fn test_keyboard_clear_resets() {
        let mut app = app();
        app.table.filter(Column::Name, Some("A"));

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter); // "Clear" is highlighted on open
        assert_eq!(visible_names(&app).len(), 4);
    }

    #[test]
    fn test_paste_into_open_search() {
        let mut app = app();
        app.handle_paste("B");
        assert_eq!(app.table.dropdown(0).unwrap().state().search_text(), "");

        press(&mut app, KeyCode::Enter);
        app.handle_paste("B");
        let visible: Vec<usize> = app
            .table
            .dropdown(0)
            .unwrap()
            .visible_items()
            .into_iter()
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(visible, vec![0, 2]);
    }

    #[test]
    fn test_reset_shortcut() {
        let mut app = app();
        app.table.filter(Column::Type, Some("Note"));
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(visible_names(&app).len(), 4);
    }

    #[test]
    fn test_focus_wraps_and_closes() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused, 1);
        assert_eq!(app.table.open_dropdown(), None);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_item_click_on_closed_list_ignored() {
        let mut app = app();
        app.handle_click(ClickTarget::ListItem(1, 1));
        assert_eq!(app.table.visible_rows().len(), 4);
        assert_eq!(app.table.open_dropdown(), None);
    }

    #[test]
    fn test_shutdown_detaches_listeners() {
        let mut app = app();
        assert_eq!(app.dispatcher.borrow().listener_count(), 2);
        app.shutdown();
        assert_eq!(app.dispatcher.borrow().listener_count(), 0);
    }

    #[test]
    fn test_search_disabled_config() {
        let mut config = Config::default();
        config.ui.search_enabled = false;
        let mut app = AppCore::new(config, &default_dataset());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.table.open_dropdown(), None);
        assert!(app.running);
    }
}
