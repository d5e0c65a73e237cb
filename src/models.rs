//! Data types and associated functions and methods

use crate::time_codec::{self, Timestamp};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Separator between the fields of a composite key.
pub const KEY_SEPARATOR: &str = "+";

/// A leaderboard event.
///
/// Only the fields used for identity and filtering are named. They accept any JSON value, and
/// every other field is kept in `extra`, so that records round-trip unchanged. A field present as
/// `null` is `Some(Value::Null)`; an absent field is `None`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EventRecord {
    /// Start of the event, in any layout accepted by [crate::time_codec::parse]
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Value>,
    /// Name of the athlete
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub athlete_name: Option<Value>,
    /// Position on the leaderboard
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub rank: Option<Value>,
    /// All remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventRecord {
    /// Returns the composite key identifying this event.
    ///
    /// The key joins the string forms of `start_date`, `athlete_name` and `rank` with `+`.
    /// Missing fields contribute an empty string, `null` contributes `None` and booleans
    /// contribute `True` or `False`, as in keys of existing leaderboard files.
    pub fn composite_key(&self) -> String {
        [
            key_part(self.start_date.as_ref()),
            key_part(self.athlete_name.as_ref()),
            key_part(self.rank.as_ref()),
        ]
        .join(KEY_SEPARATOR)
    }
}

/// String form of a single composite key field.
fn key_part(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::Null) => "None".to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Deserialise a field that is present in the input, keeping an explicit `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// The leaderboard dataset: composite key to event, iterated in key order.
pub type Leaderboard = BTreeMap<String, EventRecord>;

/// A batch of incoming leaderboard events.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct Batch {
    /// Events in the batch, in the order they should be applied
    pub entries: Vec<EventRecord>,
}

/// A weather observation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Observation {
    /// Time of the observation. Kept as raw JSON; only strings are ever parsed.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    /// All remaining fields, including `temperature`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Observation {
    /// Returns the observation time, if it is a string in an accepted layout.
    pub fn observed_at(&self) -> Option<Timestamp> {
        self.timestamp
            .as_ref()
            .and_then(Value::as_str)
            .and_then(time_codec::parse)
    }

    /// Returns the observed temperature (`temperature.value`), if present and numeric.
    pub fn temperature(&self) -> Option<f64> {
        self.extra.get("temperature")?.get("value")?.as_f64()
    }
}

/// A single element of a [FeatureCollection].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Feature {
    /// The observation itself
    pub properties: Observation,
    /// Geometry, identifiers and other fields not used by the server
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The weather dataset, in GeoJSON-like feature collection form.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FeatureCollection {
    /// Observations in file order
    pub features: Vec<Feature>,
    /// Other top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    /// Consume the collection, returning the observations in file order.
    pub fn into_observations(self) -> Vec<Observation> {
        self.features
            .into_iter()
            .map(|feature| feature.properties)
            .collect()
    }
}
