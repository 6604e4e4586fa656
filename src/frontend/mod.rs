//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait implemented by the terminal
//! frontend, plus a plain-text renderer for non-interactive output.

pub mod events;
pub mod plain;
pub mod tui;

use crate::core::observer::ClickTarget;
use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// Separates rendering and input capture from the table logic in `AppCore`.
pub trait Frontend {
    /// Poll for user input events
    ///
    /// # Returns
    /// - `Ok(Vec<FrontendEvent>)` - List of events (empty if no events)
    /// - `Err(...)` - If event polling failed
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state and remember where each
    /// interactive element landed
    fn render(&mut self, app: &AppCore) -> Result<()>;

    /// Resolve a screen position against the last rendered frame
    fn hit_test(&self, x: u16, y: u16) -> ClickTarget;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size
    fn size(&self) -> (u16, u16);
}
