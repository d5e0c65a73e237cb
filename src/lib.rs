//! This crate provides a read-only HTTP API over a leaderboard of timestamped events and a log of
//! weather observations, plus the `update_leaderboard` tool that merges new event batches into
//! the leaderboard file.
//!
//! Leaderboard events can be queried by start time range, or by the temperature of the weather
//! observation nearest to their start time. Weather observations can be looked up by time.
//!
//! Both datasets are plain JSON files read afresh on every request. The merge tool replaces the
//! leaderboard file atomically, so it can be run against a live server.
//!
//! The server is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [Serde](serde) performs (de)serialisation of the JSON datasets and responses.
//! * [time] parses event and observation timestamps.

pub mod app;
pub mod app_state;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod metrics;
pub mod models;
pub mod query;
pub mod server;
#[cfg(test)]
pub mod test_utils;
pub mod time_codec;
pub mod tracing;
pub mod weather;
