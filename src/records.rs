//! Registry record types.
//!
//! Registries hold arbitrary JSON objects. At plan time each one is parsed
//! into a typed record with a small required set (`name`, `lat`, `lon`) and
//! an open `attributes` map that carries every other key through unmodified.
//!
//! A parsed record remembers the object it came from. Serializing it writes
//! that object back with its key order and number forms intact; only fields
//! changed since parsing are written from the typed values.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::PlanError;
use crate::traits::Site;

/// A village awaiting deliveries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Village {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Delivery requirement payload, opaque to the planner. `Null` when the
    /// record has none.
    pub needs: Value,
    pub attributes: Map<String, Value>,
    source: Option<Map<String, Value>>,
}

/// A relief center that supplies villages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ReliefCenter {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub attributes: Map<String, Value>,
    source: Option<Map<String, Value>>,
}

/// One village bound to its nearest reachable relief center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub village: Village,
    #[serde(rename = "reliefCenter")]
    pub relief_center: ReliefCenter,
    pub distance: f64,
    pub deliveries: Value,
}

impl Village {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, needs: Value) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            needs,
            attributes: Map::new(),
            source: None,
        }
    }

    /// Parse a raw registry record. `index` is only used in error messages.
    pub fn from_record(index: usize, record: &Value) -> Result<Self, PlanError> {
        let object = as_object("village", index, record)?;
        let (name, lat, lon) = required_fields("village", index, object)?;
        let needs = object.get("needs").cloned().unwrap_or(Value::Null);
        let attributes = extra_fields(object, &["name", "lat", "lon", "needs"]);

        Ok(Self {
            name,
            lat,
            lon,
            needs,
            attributes,
            source: Some(object.clone()),
        })
    }

    /// The record as it goes back on the wire.
    pub fn to_record(&self) -> Map<String, Value> {
        let needs = (!self.needs.is_null()).then(|| self.needs.clone());
        let known = [
            ("name", Some(Value::from(self.name.as_str()))),
            ("lat", Some(Value::from(self.lat))),
            ("lon", Some(Value::from(self.lon))),
            ("needs", needs),
        ];
        write_record(self.source.as_ref(), &known, &self.attributes)
    }
}

impl ReliefCenter {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            attributes: Map::new(),
            source: None,
        }
    }

    /// Attach an extra field, e.g. stock levels.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Parse a raw registry record. `index` is only used in error messages.
    pub fn from_record(index: usize, record: &Value) -> Result<Self, PlanError> {
        let object = as_object("relief center", index, record)?;
        let (name, lat, lon) = required_fields("relief center", index, object)?;
        let attributes = extra_fields(object, &["name", "lat", "lon"]);

        Ok(Self {
            name,
            lat,
            lon,
            attributes,
            source: Some(object.clone()),
        })
    }

    /// The record as it goes back on the wire.
    pub fn to_record(&self) -> Map<String, Value> {
        let known = [
            ("name", Some(Value::from(self.name.as_str()))),
            ("lat", Some(Value::from(self.lat))),
            ("lon", Some(Value::from(self.lon))),
        ];
        write_record(self.source.as_ref(), &known, &self.attributes)
    }
}

impl TryFrom<Value> for Village {
    type Error = PlanError;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        Self::from_record(0, &record)
    }
}

impl TryFrom<Value> for ReliefCenter {
    type Error = PlanError;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        Self::from_record(0, &record)
    }
}

impl Serialize for Village {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl Serialize for ReliefCenter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl Site for Village {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl Site for ReliefCenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Parse every village record, failing on the first malformed one.
pub fn villages_from_records(records: &[Value]) -> Result<Vec<Village>, PlanError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| Village::from_record(index, record))
        .collect()
}

/// Parse every relief center record, failing on the first malformed one.
pub fn centers_from_records(records: &[Value]) -> Result<Vec<ReliefCenter>, PlanError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| ReliefCenter::from_record(index, record))
        .collect()
}

fn as_object<'a>(kind: &str, index: usize, record: &'a Value) -> Result<&'a Map<String, Value>, PlanError> {
    record
        .as_object()
        .ok_or_else(|| PlanError::InvalidInput(format!("{} record {} is not a JSON object", kind, index)))
}

fn required_fields(
    kind: &str,
    index: usize,
    object: &Map<String, Value>,
) -> Result<(String, f64, f64), PlanError> {
    let name = match object.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(PlanError::InvalidInput(format!(
                "{} record {}: `name` must be a string",
                kind, index
            )));
        }
        None => {
            return Err(PlanError::InvalidInput(format!(
                "{} record {}: missing `name`",
                kind, index
            )));
        }
    };

    let coordinate = |field: &str| -> Result<f64, PlanError> {
        match object.get(field) {
            Some(value) => value.as_f64().ok_or_else(|| {
                PlanError::InvalidInput(format!("{} `{}`: `{}` must be a number", kind, name, field))
            }),
            None => Err(PlanError::InvalidInput(format!("{} `{}`: missing `{}`", kind, name, field))),
        }
    };

    let lat = coordinate("lat")?;
    let lon = coordinate("lon")?;
    Ok((name, lat, lon))
}

fn extra_fields(object: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Lay out a record for output.
///
/// Keys of `source` keep their position, and a source value is kept as is
/// while it still agrees with the typed value (so `0` stays `0`, not `0.0`).
/// A `None` known field is left out unless the source held an explicit `null`.
/// Keys new since parsing follow, known fields first.
fn write_record(
    source: Option<&Map<String, Value>>,
    known: &[(&str, Option<Value>)],
    attributes: &Map<String, Value>,
) -> Map<String, Value> {
    let mut out = Map::new();

    if let Some(source) = source {
        for (key, original) in source {
            match known.iter().find(|(name, _)| *name == key.as_str()) {
                Some((_, Some(current))) => {
                    let value = if same_value(original, current) { original } else { current };
                    out.insert(key.clone(), value.clone());
                }
                Some((_, None)) => {
                    if original.is_null() {
                        out.insert(key.clone(), Value::Null);
                    }
                }
                None => {
                    if let Some(value) = attributes.get(key) {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }

    for (key, value) in known {
        if let Some(value) = value {
            if !out.contains_key(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
    }
    for (key, value) in attributes {
        if !out.contains_key(key) {
            out.insert(key.clone(), value.clone());
        }
    }

    out
}

fn same_value(original: &Value, current: &Value) -> bool {
    match (original, current) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => original == current,
    }
}
