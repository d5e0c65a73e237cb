//! Dataset loading.
//!
//! Both datasets are read from disk on every call. Nothing is cached, so a leaderboard file that
//! was atomically replaced by `update_leaderboard` is visible to the very next request.

use crate::cli::CommandLineArgs;
use crate::error::{LeaderboardError, Result};
use crate::metrics::record_dataset_load;
use crate::models::{FeatureCollection, Leaderboard, Observation};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Source of the leaderboard and weather datasets.
///
/// This forms the contract between the API layer and dataset storage.
#[async_trait]
pub trait Datasets: Send + Sync {
    /// Load the full leaderboard dataset.
    async fn leaderboard(&self) -> Result<Leaderboard>;

    /// Load the weather observations, in file order.
    async fn weather(&self) -> Result<Vec<Observation>>;
}

/// Datasets stored as JSON files on the local filesystem.
#[derive(Clone, Debug)]
pub struct FileDatasets {
    /// Path to the leaderboard file
    leaderboard_file: PathBuf,
    /// Path to the weather feature collection file
    weather_file: PathBuf,
}

impl FileDatasets {
    /// Returns a new FileDatasets object.
    pub fn new(leaderboard_file: impl Into<PathBuf>, weather_file: impl Into<PathBuf>) -> Self {
        Self {
            leaderboard_file: leaderboard_file.into(),
            weather_file: weather_file.into(),
        }
    }

    /// Returns a FileDatasets object using the paths given on the command line.
    pub fn from_args(args: &CommandLineArgs) -> Self {
        Self::new(&args.leaderboard_file, &args.weather_file)
    }
}

#[async_trait]
impl Datasets for FileDatasets {
    async fn leaderboard(&self) -> Result<Leaderboard> {
        let result = load_leaderboard(&self.leaderboard_file).await;
        record_dataset_load("leaderboard", &result);
        result
    }

    async fn weather(&self) -> Result<Vec<Observation>> {
        let result = load_weather(&self.weather_file).await;
        record_dataset_load("weather", &result);
        result
    }
}

/// Read and deserialise a JSON file.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|err| LeaderboardError::io(path, err))?;
    serde_json::from_slice(&data).map_err(|err| LeaderboardError::json(path, err))
}

/// Load the leaderboard dataset from a JSON file.
///
/// A missing or invalid file is an error; there is no fallback to an empty dataset.
#[tracing::instrument(level = "DEBUG")]
pub async fn load_leaderboard(path: &Path) -> Result<Leaderboard> {
    read_json(path).await
}

/// Load weather observations from a JSON feature collection file.
#[tracing::instrument(level = "DEBUG")]
pub async fn load_weather(path: &Path) -> Result<Vec<Observation>> {
    let collection: FeatureCollection = read_json(path).await?;
    Ok(collection.into_observations())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    use serde_json::json;

    #[tokio::test]
    async fn leaderboard_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_json(
            dir.path(),
            "leaderboard.json",
            &test_utils::leaderboard_json(),
        );
        let leaderboard = load_leaderboard(&path).await.unwrap();
        assert_eq!(3, leaderboard.len());
        let keys: Vec<&String> = leaderboard.keys().collect();
        assert_eq!(
            vec![
                "2024-01-01T00:00:00Z+alice+1",
                "2024-01-01T06:00:00Z+bob+2",
                "2024-01-01T12:00:00Z+carol+3",
            ],
            keys
        );
    }

    #[tokio::test]
    async fn leaderboard_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let error = load_leaderboard(&path).await.unwrap_err();
        assert!(matches!(error, LeaderboardError::Io { .. }), "{error:?}");
    }

    #[tokio::test]
    async fn leaderboard_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(&path, "{\"key\": [").unwrap();
        let error = load_leaderboard(&path).await.unwrap_err();
        assert!(matches!(error, LeaderboardError::Json { .. }), "{error:?}");
    }

    #[tokio::test]
    async fn weather_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path =
            test_utils::write_json(dir.path(), "weather.json", &test_utils::weather_json());
        let observations = load_weather(&path).await.unwrap();
        assert_eq!(4, observations.len());
        assert_eq!(
            Some(json!("2024-01-01T12:00:00+00:00")),
            observations[0].timestamp
        );
    }

    #[tokio::test]
    async fn weather_non_string_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_json(
            dir.path(),
            "weather.json",
            &json!({"features": [
                {"properties": {"timestamp": 12345}},
                {"properties": {"timestamp": "2024-01-01T00:00:00Z"}}
            ]}),
        );
        let observations = load_weather(&path).await.unwrap();
        assert_eq!(2, observations.len());
        assert_eq!(Some(json!(12345)), observations[0].timestamp);
    }

    #[tokio::test]
    async fn weather_not_a_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_json(dir.path(), "weather.json", &json!([1, 2, 3]));
        let error = load_weather(&path).await.unwrap_err();
        assert!(matches!(error, LeaderboardError::Json { .. }), "{error:?}");
    }

    #[tokio::test]
    async fn file_datasets_reread_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let leaderboard_path = test_utils::write_json(
            dir.path(),
            "leaderboard.json",
            &test_utils::leaderboard_json(),
        );
        let weather_path =
            test_utils::write_json(dir.path(), "weather.json", &test_utils::weather_json());
        let datasets = FileDatasets::new(&leaderboard_path, &weather_path);
        assert_eq!(3, datasets.leaderboard().await.unwrap().len());
        test_utils::write_json(dir.path(), "leaderboard.json", &json!({}));
        assert!(datasets.leaderboard().await.unwrap().is_empty());
        assert_eq!(4, datasets.weather().await.unwrap().len());
    }
}
