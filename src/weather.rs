//! Nearest weather observation lookup.

use crate::models::Observation;
use crate::time_codec::{self, Timestamp};

use time::Duration;
use tracing::{event, Level};

/// Find the observation closest in time to `target`.
///
/// Performs a linear scan. When two observations are equally close the first one encountered
/// wins. Observations whose `timestamp` is missing, not a string, or not in an accepted layout
/// are skipped.
///
/// Returns `None` if there are no observations with a parseable timestamp.
///
/// # Arguments
///
/// * `target`: Time to search for
/// * `observations`: Observations in any order
pub fn find_nearest(target: Timestamp, observations: &[Observation]) -> Option<&Observation> {
    let mut nearest: Option<(Duration, &Observation)> = None;
    for observation in observations {
        let Some(observed_at) = observation.observed_at() else {
            event!(
                Level::WARN,
                "skipping weather observation with invalid timestamp {:?}",
                observation.timestamp
            );
            continue;
        };
        let distance = time_codec::distance(target, observed_at);
        match nearest {
            Some((best, _)) if distance >= best => (),
            _ => nearest = Some((distance, observation)),
        }
    }
    nearest.map(|(_, observation)| observation)
}
