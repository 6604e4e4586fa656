//! Table orchestrator
//!
//! Builds a header cell per filterable column, each hosting a
//! [`FilterDropdown`], and a body row per datum. Selecting a value in a header
//! hides every row whose cell in that column differs from it; "Clear" shows
//! every row again. Each action recomputes visibility over the whole body, so
//! the most recent filter or reset fully determines what is shown.

use crate::core::dropdown::{DropdownOptions, FilterDropdown, SharedObserver};
use crate::data::{Column, Datum};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// A body row: one text cell per column plus its display state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub visible: bool,
}

impl Row {
    pub fn cell(&self, column: Column) -> Option<&str> {
        self.cells.get(column.index()).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBody {
    pub rows: Vec<Row>,
}

/// Body slot shared with the header callbacks; `None` once torn down
pub type BodyHandle = Rc<RefCell<Option<TableBody>>>;

/// Header cell hosting the dropdown for one column
pub struct HeaderCell {
    pub column: Column,
    pub dropdown: FilterDropdown,
}

/// Show only rows whose `column` text equals `value`
///
/// An empty or missing value leaves visibility untouched, as does a missing body.
pub fn filter_rows(body: &BodyHandle, column: Column, value: Option<&str>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        tracing::debug!(?column, "Ignoring empty filter value");
        return;
    };

    let mut slot = body.borrow_mut();
    let Some(body) = slot.as_mut() else {
        tracing::debug!(?column, "No table body to filter");
        return;
    };

    for row in &mut body.rows {
        row.visible = row.cell(column) == Some(value);
    }

    let shown = body.rows.iter().filter(|r| r.visible).count();
    tracing::info!(column = column.title(), value, shown, "Applied filter");
}

/// Show every row
pub fn reset_rows(body: &BodyHandle) {
    let mut slot = body.borrow_mut();
    let Some(body) = slot.as_mut() else {
        tracing::debug!("No table body to reset");
        return;
    };

    for row in &mut body.rows {
        row.visible = true;
    }
    tracing::info!(rows = body.rows.len(), "Reset filters");
}

pub struct FilterTable {
    columns: Vec<Column>,
    headers: Vec<HeaderCell>,
    body: BodyHandle,
}

impl FilterTable {
    /// Build head and body for `data`, mounting one dropdown per column
    pub fn build(data: &[Datum], options: DropdownOptions, observer: SharedObserver) -> Self {
        let columns = Column::ALL.to_vec();

        let body = TableBody {
            rows: data
                .iter()
                .map(|datum| Row {
                    cells: columns.iter().map(|&c| datum.field(c)).collect(),
                    visible: true,
                })
                .collect(),
        };
        let body: BodyHandle = Rc::new(RefCell::new(Some(body)));

        let headers = columns
            .iter()
            .enumerate()
            .map(|(id, &column)| {
                let filter_body = Rc::clone(&body);
                let reset_body = Rc::clone(&body);
                let mut dropdown = FilterDropdown::new(
                    id,
                    column.title(),
                    data.iter().map(|d| d.field(column)),
                    Box::new(move |value: Option<&str>| filter_rows(&filter_body, column, value)),
                    Box::new(move || reset_rows(&reset_body)),
                    options,
                    Rc::clone(&observer),
                );
                dropdown.mount();
                HeaderCell { column, dropdown }
            })
            .collect();

        tracing::info!(rows = data.len(), columns = columns.len(), "Built table");

        Self {
            columns,
            headers,
            body,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> &[HeaderCell] {
        &self.headers
    }

    pub fn dropdown(&self, id: usize) -> Option<&FilterDropdown> {
        self.headers.get(id).map(|h| &h.dropdown)
    }

    pub fn dropdown_mut(&mut self, id: usize) -> Option<&mut FilterDropdown> {
        self.headers.get_mut(id).map(|h| &mut h.dropdown)
    }

    pub fn dropdown_for(&mut self, column: Column) -> Option<&mut FilterDropdown> {
        self.headers
            .iter_mut()
            .find(|h| h.column == column)
            .map(|h| &mut h.dropdown)
    }

    /// Id of the dropdown whose list is open, if any
    pub fn open_dropdown(&self) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.dropdown.is_open())
    }

    pub fn body(&self) -> Ref<'_, Option<TableBody>> {
        self.body.borrow()
    }

    /// Snapshot of every row
    pub fn rows(&self) -> Vec<Row> {
        self.body
            .borrow()
            .as_ref()
            .map(|b| b.rows.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the rows currently shown
    pub fn visible_rows(&self) -> Vec<Row> {
        self.rows().into_iter().filter(|r| r.visible).collect()
    }

    pub fn filter(&self, column: Column, value: Option<&str>) {
        filter_rows(&self.body, column, value);
    }

    pub fn reset(&self) {
        reset_rows(&self.body);
    }

    /// Unmount every dropdown and drop head and body
    pub fn teardown(&mut self) {
        for header in &mut self.headers {
            header.dropdown.unmount();
        }
        self.headers.clear();
        self.body.borrow_mut().take();
        tracing::info!("Table torn down");
    }
}
