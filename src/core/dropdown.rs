//! Column header filter dropdown
//!
//! A `FilterDropdown` owns a toggle, a hidden list made of "Clear" plus the
//! distinct candidate values of a column, and (optionally) a search box that
//! narrows the list. The host supplies a filter callback and a reset callback;
//! the dropdown invokes them when an entry is chosen and then closes.
//!
//! Visibility is a two-state machine:
//!
//! ```text
//! closed --toggle--> open --toggle|outside_click|item_selected--> closed
//! ```
//!
//! Clicks outside the dropdown arrive through the injected
//! [`OutsideClickObserver`]; the dropdown subscribes on [`FilterDropdown::mount`]
//! and unsubscribes on [`FilterDropdown::unmount`] (or when dropped).

use crate::core::observer::{ClickHandler, ClickTarget, DropdownId, OutsideClickObserver};
use crate::core::search::FuzzyMatcher;
use crossterm::event::KeyEvent;
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};
use tui_textarea::TextArea;

/// Label of the first list entry, which clears the filter
pub const CLEAR_LABEL: &str = "Clear";

/// Invoked with the selected value
pub type FilterCallback = Box<dyn FnMut(Option<&str>)>;
/// Invoked when "Clear" is selected
pub type ResetCallback = Box<dyn FnMut()>;

/// Shared handle to the host's outside-click observer
pub type SharedObserver = Rc<RefCell<dyn OutsideClickObserver>>;

/// Per-dropdown configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropdownOptions {
    /// Show a search box above the list
    pub search_enabled: bool,
    pub matcher: FuzzyMatcher,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            search_enabled: true,
            matcher: FuzzyMatcher::default(),
        }
    }
}

/// Mutable interaction state, shared with the outside-click handler
pub struct DropdownState {
    is_open: bool,
    search: TextArea<'static>,
    /// Parallel to `FilterDropdown::items`; entry 0 ("Clear") is always visible
    visible: Vec<bool>,
    highlighted: usize,
}

impl DropdownState {
    fn new(item_count: usize) -> Self {
        Self {
            is_open: false,
            search: search_field(),
            visible: vec![true; item_count],
            highlighted: 0,
        }
    }

    pub fn search_text(&self) -> &str {
        self.search.lines().first().map(String::as_str).unwrap_or("")
    }

    pub fn search_field(&self) -> &TextArea<'static> {
        &self.search
    }

    pub fn is_item_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    fn open(&mut self) {
        self.is_open = true;
        self.highlighted = 0;
    }

    /// Close and forget the search query. Closing a closed list does nothing.
    fn close(&mut self) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        self.search = search_field();
        self.visible.iter_mut().for_each(|v| *v = true);
        self.highlighted = 0;
    }
}

fn search_field() -> TextArea<'static> {
    let mut field = TextArea::default();
    field.set_placeholder_text("Search...");
    field
}

/// Header dropdown for one column
pub struct FilterDropdown {
    id: DropdownId,
    title: String,
    /// "Clear" followed by distinct values in order of first occurrence
    items: Vec<String>,
    options: DropdownOptions,
    state: Rc<RefCell<DropdownState>>,
    on_filter: FilterCallback,
    on_reset: ResetCallback,
    observer: SharedObserver,
    /// Bound outside-click handler; `Some` while mounted
    outside_handler: Option<ClickHandler>,
}

impl FilterDropdown {
    pub fn new<I, S>(
        id: DropdownId,
        title: impl Into<String>,
        values: I,
        on_filter: FilterCallback,
        on_reset: ResetCallback,
        options: DropdownOptions,
        observer: SharedObserver,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = build_items(values);
        let state = Rc::new(RefCell::new(DropdownState::new(items.len())));

        Self {
            id,
            title: title.into(),
            items,
            options,
            state,
            on_filter,
            on_reset,
            observer,
            outside_handler: None,
        }
    }

    pub fn id(&self) -> DropdownId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn search_enabled(&self) -> bool {
        self.options.search_enabled
    }

    /// Borrow the interaction state for rendering
    pub fn state(&self) -> Ref<'_, DropdownState> {
        self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open
    }

    pub fn is_mounted(&self) -> bool {
        self.outside_handler.is_some()
    }

    /// Items currently shown in the list, with their indices
    pub fn visible_items(&self) -> Vec<(usize, &str)> {
        let state = self.state.borrow();
        self.items
            .iter()
            .enumerate()
            .filter(|(idx, _)| state.is_item_visible(*idx))
            .map(|(idx, item)| (idx, item.as_str()))
            .collect()
    }

    /// Attach the outside-click listener. Mounting twice registers once.
    pub fn mount(&mut self) {
        if self.outside_handler.is_some() {
            return;
        }

        let id = self.id;
        let state: Weak<RefCell<DropdownState>> = Rc::downgrade(&self.state);
        let handler: ClickHandler = Rc::new(move |target: &ClickTarget| {
            if target.is_inside(id) {
                return;
            }
            if let Some(state) = state.upgrade() {
                state.borrow_mut().close();
            }
        });

        if self.observer.borrow_mut().subscribe(id, Rc::clone(&handler)) {
            tracing::debug!(id, title = %self.title, "Dropdown mounted");
        }
        self.outside_handler = Some(handler);
    }

    /// Detach the outside-click listener and close the list
    pub fn unmount(&mut self) {
        if self.outside_handler.take().is_none() {
            return;
        }
        self.observer.borrow_mut().unsubscribe(self.id);
        self.state.borrow_mut().close();
        tracing::debug!(id = self.id, title = %self.title, "Dropdown unmounted");
    }

    /// Flip between open and closed
    pub fn toggle(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let mut state = self.state.borrow_mut();
        if state.is_open {
            state.close();
        } else {
            state.open();
        }
        true
    }

    pub fn close(&mut self) {
        self.state.borrow_mut().close();
    }

    /// Close if `target` is not within this dropdown's toggle or list
    pub fn handle_outside_click(&mut self, target: &ClickTarget) {
        if !target.is_inside(self.id) {
            self.close();
        }
    }

    /// Handle a click that hit this dropdown
    pub fn handle_click(&mut self, target: &ClickTarget) -> bool {
        match *target {
            ClickTarget::Toggle(id) if id == self.id => self.toggle(),
            ClickTarget::ListItem(id, index) if id == self.id => self.select(index),
            ClickTarget::SearchBox(id) | ClickTarget::List(id) if id == self.id => {
                self.is_mounted()
            }
            _ => false,
        }
    }

    /// Choose a list entry: 0 resets, anything else filters. Closes the list.
    ///
    /// Entries of a closed list are hidden and cannot be chosen.
    pub fn select(&mut self, index: usize) -> bool {
        if !self.is_mounted() || !self.is_open() || index >= self.items.len() {
            return false;
        }

        if index == 0 {
            tracing::debug!(title = %self.title, "Clear selected");
            (self.on_reset)();
        } else {
            let value = self.items[index].as_str();
            tracing::debug!(title = %self.title, value, "Filter selected");
            (self.on_filter)(Some(value));
        }

        self.state.borrow_mut().close();
        true
    }

    /// Replace the search query and recompute visible items
    pub fn set_search(&mut self, text: &str) -> bool {
        if !self.is_mounted() || !self.options.search_enabled {
            return false;
        }
        {
            let mut state = self.state.borrow_mut();
            state.search = search_field();
            state.search.insert_str(text);
        }
        self.apply_search();
        true
    }

    /// Feed a key press to the search box
    pub fn search_input(&mut self, key: KeyEvent) -> bool {
        if !self.is_mounted() || !self.options.search_enabled || !self.is_open() {
            return false;
        }
        let changed = self.state.borrow_mut().search.input(key);
        if changed {
            self.apply_search();
        }
        changed
    }

    /// Insert pasted text at the search cursor (first line only)
    pub fn search_paste(&mut self, text: &str) -> bool {
        if !self.is_mounted() || !self.options.search_enabled || !self.is_open() {
            return false;
        }
        let line = text.lines().next().unwrap_or("");
        let changed = self.state.borrow_mut().search.insert_str(line);
        if changed {
            self.apply_search();
        }
        changed
    }

    fn apply_search(&mut self) {
        let mut state = self.state.borrow_mut();
        let query = state.search_text().to_string();
        let matches = self
            .options
            .matcher
            .filter(&query, self.items.iter().skip(1).map(String::as_str));

        state.visible = vec![false; self.items.len()];
        state.visible[0] = true;
        for idx in matches {
            state.visible[idx + 1] = true;
        }

        if !state.is_item_visible(state.highlighted) {
            state.highlighted = 0;
        }
    }

    /// Move the keyboard highlight to the next visible entry
    pub fn highlight_next(&mut self) {
        let mut state = self.state.borrow_mut();
        let start = state.highlighted;
        if let Some(next) = (start + 1..self.items.len()).find(|&i| state.is_item_visible(i)) {
            state.highlighted = next;
        }
    }

    /// Move the keyboard highlight to the previous visible entry
    pub fn highlight_previous(&mut self) {
        let mut state = self.state.borrow_mut();
        let start = state.highlighted;
        if let Some(prev) = (0..start).rev().find(|&i| state.is_item_visible(i)) {
            state.highlighted = prev;
        }
    }

    pub fn select_highlighted(&mut self) -> bool {
        let index = self.state.borrow().highlighted;
        self.select(index)
    }
}

impl Drop for FilterDropdown {
    fn drop(&mut self) {
        if self.outside_handler.take().is_some() {
            if let Ok(mut observer) = self.observer.try_borrow_mut() {
                observer.unsubscribe(self.id);
            }
        }
    }
}

/// "Clear" followed by each distinct value once, first occurrence wins
///
/// Values are only compared with each other, so a value spelled "Clear" still
/// gets its own filtering entry after the reset entry.
fn build_items<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        let value = value.into();
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    std::iter::once(CLEAR_LABEL.to_string()).chain(distinct).collect()
}
