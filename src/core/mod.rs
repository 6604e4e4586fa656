//! Core logic layer
//!
//! This module contains the table, its dropdown widgets, and input routing.
//! NO imports from frontend/.
//! Core updates data structures, frontends read and render.

pub mod app_core;
pub mod dropdown;
pub mod input_router;
pub mod observer;
pub mod search;
pub mod table;

pub use app_core::AppCore;
