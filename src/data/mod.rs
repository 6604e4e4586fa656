//! Data layer - Pure records without UI coupling
//!
//! This module contains the rows shown by the table as plain data structures.
//! NO imports from frontend/ or any rendering code.

pub mod datum;

pub use datum::*;
