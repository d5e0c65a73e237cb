//! Leaderboard queries.
//!
//! Both filters visit the dataset in composite key order, so results are always sorted by key.

use crate::error::{LeaderboardError, Result};
use crate::models::{EventRecord, Leaderboard, Observation};
use crate::time_codec::{self, Timestamp};
use crate::weather;

use serde_json::Value;

/// Parse the `start_date` of a record, failing the query if it is absent, not a string, or
/// invalid.
fn start_date(key: &str, record: &EventRecord) -> Result<Timestamp> {
    record
        .start_date
        .as_ref()
        .and_then(Value::as_str)
        .and_then(time_codec::parse)
        .ok_or_else(|| LeaderboardError::MalformedRecord {
            key: key.to_string(),
        })
}

/// Return the events with `lo <= start_date <= hi`.
///
/// # Arguments
///
/// * `lo`: Inclusive lower bound
/// * `hi`: Inclusive upper bound
/// * `dataset`: Leaderboard to filter
///
/// # Errors
///
/// * [LeaderboardError::InvalidRange] if `hi < lo`
/// * [LeaderboardError::MalformedRecord] if any record has no parseable `start_date`
pub fn filter_by_time_range(
    lo: Timestamp,
    hi: Timestamp,
    dataset: &Leaderboard,
) -> Result<Vec<EventRecord>> {
    if hi < lo {
        return Err(LeaderboardError::InvalidRange);
    }
    let mut events = Vec::new();
    for (key, record) in dataset {
        let start = start_date(key, record)?;
        if lo <= start && start <= hi {
            events.push(record.clone());
        }
    }
    Ok(events)
}

/// Return the events whose nearest weather observation has `lo <= temperature <= hi`.
///
/// Each event triggers a full scan of `observations`.
///
/// # Arguments
///
/// * `lo`: Inclusive lower bound
/// * `hi`: Inclusive upper bound
/// * `dataset`: Leaderboard to filter
/// * `observations`: Weather observations in any order
///
/// # Errors
///
/// * [LeaderboardError::InvalidRange] if `hi < lo` or either bound is NaN
/// * [LeaderboardError::MalformedRecord] if any record has no parseable `start_date`
/// * [LeaderboardError::MissingWeather] if no observation, or no temperature, is found for a
///   record
pub fn filter_by_temperature_range(
    lo: f64,
    hi: f64,
    dataset: &Leaderboard,
    observations: &[Observation],
) -> Result<Vec<EventRecord>> {
    if lo.is_nan() || hi.is_nan() || hi < lo {
        return Err(LeaderboardError::InvalidRange);
    }
    let mut events = Vec::new();
    for (key, record) in dataset {
        let start = start_date(key, record)?;
        let temperature = weather::find_nearest(start, observations)
            .and_then(Observation::temperature)
            .ok_or_else(|| LeaderboardError::MissingWeather {
                key: key.to_string(),
            })?;
        if lo <= temperature && temperature <= hi {
            events.push(record.clone());
        }
    }
    Ok(events)
}
