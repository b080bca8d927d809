//! Test fixtures for relief-planner.
//!
//! Provides realistic test data including:
//! - Sundarbans / South 24 Parganas villages and relief hubs
//! - Record builders for villages and relief centers

pub mod sundarbans_locations;

pub use sundarbans_locations::*;
