//! Input routing for the table view
//!
//! Routes keyboard input to a `TableAction` based on whether a dropdown list
//! is open and whether it carries a search box.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything a key press can ask the table to do
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    // Header focus
    FocusNext,
    FocusPrevious,

    // Dropdown
    Toggle,
    HighlightUp,
    HighlightDown,
    Select,
    Close,
    SearchInput(KeyEvent),

    // Table
    Reset,
    Quit,

    // No action (key not bound or not applicable in this context)
    None,
}

/// State of the focused dropdown when a key arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteContext {
    pub dropdown_open: bool,
    pub search_enabled: bool,
}

/// Route a key event to a TableAction
pub fn route_key(key: KeyEvent, ctx: RouteContext) -> TableAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => TableAction::Quit,
            KeyCode::Char('r') => TableAction::Reset,
            // Ctrl+W, Ctrl+H etc. are line editing in the search box
            _ if ctx.dropdown_open && ctx.search_enabled => TableAction::SearchInput(key),
            _ => TableAction::None,
        };
    }

    match key.code {
        KeyCode::Tab => return TableAction::FocusNext,
        KeyCode::BackTab => return TableAction::FocusPrevious,
        _ => {}
    }

    if ctx.dropdown_open {
        route_open(key, ctx)
    } else {
        route_closed(key)
    }
}

fn route_open(key: KeyEvent, ctx: RouteContext) -> TableAction {
    match key.code {
        KeyCode::Up => TableAction::HighlightUp,
        KeyCode::Down => TableAction::HighlightDown,
        KeyCode::Enter => TableAction::Select,
        KeyCode::Esc => TableAction::Close,
        KeyCode::Char(_)
        | KeyCode::Backspace
        | KeyCode::Delete
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Home
        | KeyCode::End
            if ctx.search_enabled =>
        {
            TableAction::SearchInput(key)
        }
        KeyCode::Char(' ') => TableAction::Select,
        KeyCode::Char('q') => TableAction::Close,
        _ => TableAction::None,
    }
}

fn route_closed(key: KeyEvent) -> TableAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => TableAction::Toggle,
        KeyCode::Left => TableAction::FocusPrevious,
        KeyCode::Right => TableAction::FocusNext,
        KeyCode::Char('r') => TableAction::Reset,
        KeyCode::Char('q') => TableAction::Quit,
        _ => TableAction::None,
    }
}
