use crate::models::{FeatureCollection, Leaderboard, Observation};

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Leaderboard with three events on 2024-01-01, at 00:00, 06:00 and 12:00.
pub(crate) fn leaderboard_json() -> Value {
    json!({
        "2024-01-01T00:00:00Z+alice+1": {
            "start_date": "2024-01-01T00:00:00Z",
            "athlete_name": "alice",
            "rank": 1,
            "elapsed_time": 1200
        },
        "2024-01-01T06:00:00Z+bob+2": {
            "start_date": "2024-01-01T06:00:00Z",
            "athlete_name": "bob",
            "rank": 2,
            "elapsed_time": 1260
        },
        "2024-01-01T12:00:00Z+carol+3": {
            "start_date": "2024-01-01T12:00:00Z",
            "athlete_name": "carol",
            "rank": 3,
            "elapsed_time": 1300
        }
    })
}

/// Weather observations, out of order, with one invalid timestamp.
///
/// The nearest temperatures to the [leaderboard_json] events are -2.0 (alice), 4.5 (bob) and
/// 10.0 (carol).
pub(crate) fn weather_json() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "id": "obs-3",
                "properties": {
                    "timestamp": "2024-01-01T12:00:00+00:00",
                    "temperature": {"unitCode": "wmoUnit:degC", "value": 10.0}
                }
            },
            {
                "id": "obs-1",
                "properties": {
                    "timestamp": "2024-01-01T00:00:00+00:00",
                    "temperature": {"unitCode": "wmoUnit:degC", "value": -2.0}
                }
            },
            {
                "id": "obs-2",
                "properties": {
                    "timestamp": "2024-01-01T06:00:00Z",
                    "temperature": {"unitCode": "wmoUnit:degC", "value": 4.5}
                }
            },
            {
                "id": "obs-bad",
                "properties": {
                    "timestamp": "sometime",
                    "temperature": {"unitCode": "wmoUnit:degC", "value": 99.0}
                }
            }
        ]
    })
}

/// The [leaderboard_json] fixture as a [Leaderboard].
pub(crate) fn leaderboard() -> Leaderboard {
    serde_json::from_value(leaderboard_json()).unwrap()
}

/// The [weather_json] fixture as observations.
pub(crate) fn weather() -> Vec<Observation> {
    serde_json::from_value::<FeatureCollection>(weather_json())
        .unwrap()
        .into_observations()
}

/// Write a JSON value to `name` in `dir`, returning the path.
pub(crate) fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}
