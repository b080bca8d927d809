//! Core seams for the relief planner.
//!
//! These are intentionally small. The planner only needs to know where a
//! site is, how far apart two coordinates are, and where records live.

use serde_json::Value;

use crate::error::StorageError;

/// Anything placed on the map by name.
pub trait Site {
    /// Name, used as graph node identity.
    fn name(&self) -> &str;

    /// Location coordinates (lat, lon) in degrees.
    fn location(&self) -> (f64, f64);
}

/// Distance between two coordinates, in kilometers.
///
/// Implementations must be symmetric and non-negative.
pub trait DistanceMetric: Sync {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}

/// The two registry collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Villages,
    ReliefCenters,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Villages, Collection::ReliefCenters];

    /// File name used by file-backed stores.
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Villages => "villages.json",
            Collection::ReliefCenters => "relief_centers.json",
        }
    }
}

/// Durable, append-only storage of raw registry records.
///
/// Records are stored verbatim; validation happens at plan time.
pub trait RegistryStore: Send + Sync {
    /// Read the full collection.
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StorageError>;

    /// Append one record to the collection.
    fn append(&self, collection: Collection, record: Value) -> Result<(), StorageError>;
}
