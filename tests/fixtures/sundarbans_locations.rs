//! Village and relief hub locations in the Sundarbans delta, West Bengal.
//!
//! Coordinates are approximate town centers, good enough for regional-scale
//! planning with the planar metric.

#![allow(dead_code)]

use relief_planner::records::{ReliefCenter, Village};
use serde_json::json;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Village at this location needing `food` kits and `medkits`.
    pub fn village(&self, food: u32, medkits: u32) -> Village {
        Village::new(self.name, self.lat, self.lon, json!({"food": food, "medkits": medkits}))
    }

    pub fn center(&self) -> ReliefCenter {
        ReliefCenter::new(self.name, self.lat, self.lon)
    }
}

// ============================================================================
// Island and delta villages (cyclone-exposed)
// ============================================================================

pub const DELTA_VILLAGES: &[Location] = &[
    Location::new("Gosaba", 22.1650, 88.8070),
    Location::new("Bali Island", 22.0830, 88.7540),
    Location::new("Satjelia", 22.1010, 88.8820),
    Location::new("Kumirmari", 22.1830, 88.9170),
    Location::new("Patharpratima", 21.7900, 88.3540),
    Location::new("Mousuni", 21.6670, 88.2000),
    Location::new("Ghoramara", 21.9150, 88.1250),
    Location::new("Sagar", 21.6530, 88.0750),
];

// ============================================================================
// Mainland villages
// ============================================================================

pub const MAINLAND_VILLAGES: &[Location] = &[
    Location::new("Basanti", 22.1900, 88.6700),
    Location::new("Kultali", 22.0500, 88.5500),
    Location::new("Mathurapur", 22.1240, 88.3760),
    Location::new("Raidighi", 22.0500, 88.4380),
    Location::new("Namkhana", 21.7700, 88.2330),
    Location::new("Hingalganj", 22.4670, 88.9670),
];

// ============================================================================
// Relief hubs
// ============================================================================

pub const RELIEF_HUBS: &[Location] = &[
    Location::new("Canning Hub", 22.3100, 88.6600),
    Location::new("Diamond Harbour Hub", 22.1900, 88.1900),
    Location::new("Kakdwip Hub", 21.8700, 88.1800),
    Location::new("Baruipur Hub", 22.3500, 88.4300),
];

/// All fixture villages with modest default needs.
pub fn all_villages() -> Vec<Village> {
    DELTA_VILLAGES
        .iter()
        .chain(MAINLAND_VILLAGES)
        .map(|location| location.village(100, 20))
        .collect()
}

/// All fixture relief hubs with stock levels attached.
pub fn all_hubs() -> Vec<ReliefCenter> {
    RELIEF_HUBS
        .iter()
        .map(|location| {
            location
                .center()
                .with_attribute("foodKitsAvailable", json!(2000))
                .with_attribute("medkitsAvailable", json!(400))
        })
        .collect()
}
