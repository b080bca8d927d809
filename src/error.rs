//! Error types for planning, graph search, and storage.

use std::path::PathBuf;

/// Planning failed as a whole.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Malformed record or node-identity collision. Nothing is planned.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Structural graph defects. Distinct from "no path", which is not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

/// Registry read/write failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error on {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} does not hold a JSON array", .0.display())]
    Malformed(PathBuf),
    #[error("registry lock poisoned")]
    Poisoned,
}

/// Why a single village could not be routed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// No relief center is reachable. Skipped, never fatal.
    #[error("no relief center reachable from `{0}`")]
    NoRoute(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
