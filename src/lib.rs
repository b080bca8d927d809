//! relief-planner core
//!
//! Assigns villages to their nearest relief center over a weighted graph,
//! with a small registry and HTTP surface around it.

pub mod traits;
pub mod error;
pub mod records;
pub mod distance;
pub mod graph;
pub mod planner;
pub mod store;
pub mod service;
pub mod client;
