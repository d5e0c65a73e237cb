//! Error handling.

use axum::{
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Leaderboard server error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Error reading or writing a dataset file
    #[error("failed to access dataset file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error deserialising or serialising JSON data
    #[error("failed to parse JSON data in {path}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A timestamp parameter did not match any accepted format
    #[error("Error parsing timestamp parameter {value}")]
    InvalidTimestamp { value: String },

    /// A temperature parameter was not a number
    #[error("Invalid temperature parameter {value}")]
    InvalidTemperature { value: String },

    /// Range bounds are reversed
    #[error("invalid range: lower bound must be less than or equal to upper bound")]
    InvalidRange,

    /// A leaderboard record lacks a parseable start_date
    #[error("leaderboard record {key} has no parseable start_date")]
    MalformedRecord { key: String },

    /// No weather observation or temperature is available for a record
    #[error("no weather temperature available for leaderboard record {key}")]
    MissingWeather { key: String },
}

impl LeaderboardError {
    /// Return an `Io` error for the given path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Return a `Json` error for the given path.
    pub fn json(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type alias for leaderboard operations.
pub type Result<T> = std::result::Result<T, LeaderboardError>;

impl IntoResponse for LeaderboardError {
    /// Convert from a `LeaderboardError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut causes = Vec::new();
        let mut current = error.source();
        while let Some(source) = current {
            causes.push(source.to_string());
            current = source.source();
        }
        causes.dedup();
        let caused_by = if causes.is_empty() {
            None
        } else {
            Some(causes)
        };
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
struct ErrorResponse {
    /// HTTP status of the response
    status: StatusCode,

    /// Response body
    body: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            body: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<LeaderboardError> for ErrorResponse {
    /// Convert from a `LeaderboardError` into an `ErrorResponse`.
    fn from(error: LeaderboardError) -> Self {
        let response = match &error {
            // Bad request
            LeaderboardError::InvalidTimestamp { value: _ }
            | LeaderboardError::InvalidTemperature { value: _ }
            | LeaderboardError::InvalidRange
            | LeaderboardError::MalformedRecord { key: _ }
            | LeaderboardError::MissingWeather { key: _ } => Self::bad_request(&error),

            // Internal server error
            LeaderboardError::Io { .. } | LeaderboardError::Json { .. } => {
                Self::internal_server_error(&error)
            }
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error);
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source);
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self.body);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use hyper::HeaderMap;

    // Jump through the hoops to get the body as a string.
    async fn body_string(response: Response) -> String {
        String::from_utf8(
            hyper::body::to_bytes(response.into_body())
                .await
                .unwrap()
                .to_vec(),
        )
        .unwrap()
    }

    async fn test_leaderboard_error(
        error: LeaderboardError,
        status: StatusCode,
        message: &str,
        caused_by: Option<Vec<&'static str>>,
    ) {
        let response = error.into_response();
        assert_eq!(status, response.status());
        let mut headers = HeaderMap::new();
        headers.insert(&header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(headers, *response.headers());
        let body: ErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(message.to_string(), body.message);
        // Map Vec items from str to String
        let caused_by = caused_by.map(|cb| cb.iter().map(|s| s.to_string()).collect());
        assert_eq!(caused_by, body.caused_by);
    }

    #[tokio::test]
    async fn io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = LeaderboardError::io("data/leaderboard.json", io_error);
        let message = "failed to access dataset file data/leaderboard.json";
        let caused_by = Some(vec!["no such file"]);
        test_leaderboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, caused_by)
            .await;
    }

    #[tokio::test]
    async fn json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = LeaderboardError::json("weather.json", json_error);
        let message = "failed to parse JSON data in weather.json";
        let caused_by = Some(vec!["EOF while parsing an object at line 1 column 1"]);
        test_leaderboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, caused_by)
            .await;
    }

    #[tokio::test]
    async fn invalid_timestamp() {
        let error = LeaderboardError::InvalidTimestamp {
            value: "yesterday".to_string(),
        };
        let message = "Error parsing timestamp parameter yesterday";
        test_leaderboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }

    #[tokio::test]
    async fn invalid_temperature() {
        let error = LeaderboardError::InvalidTemperature {
            value: "warm".to_string(),
        };
        let message = "Invalid temperature parameter warm";
        test_leaderboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }

    #[tokio::test]
    async fn invalid_range() {
        let error = LeaderboardError::InvalidRange;
        let message = "invalid range: lower bound must be less than or equal to upper bound";
        test_leaderboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }

    #[tokio::test]
    async fn malformed_record() {
        let error = LeaderboardError::MalformedRecord {
            key: "++".to_string(),
        };
        let message = "leaderboard record ++ has no parseable start_date";
        test_leaderboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }

    #[tokio::test]
    async fn missing_weather() {
        let error = LeaderboardError::MissingWeather {
            key: "2024-01-01T00:00:00Z+alice+1".to_string(),
        };
        let message =
            "no weather temperature available for leaderboard record 2024-01-01T00:00:00Z+alice+1";
        test_leaderboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }
}
