//! Leaderboard merging.
//!
//! Merging runs in three steps: load the existing leaderboard, fold each incoming batch into it
//! by composite key, then atomically replace the leaderboard file. Later batches, and later
//! entries within a batch, overwrite earlier events with the same key.
//!
//! The replacement is written to a temporary file in the same directory as the leaderboard and
//! then renamed over it, so a concurrent reader sees either the old or the new file in full.
//! Concurrent merges against the same file are not coordinated; the last rename wins.

use crate::error::{LeaderboardError, Result};
use crate::models::{Batch, Leaderboard};

use serde::Serialize;
use serde_json::error::Category;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{event, Level};

/// Outcome of a merge run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of batch files merged
    pub batches: usize,
    /// Number of entries read across all batches
    pub entries: usize,
    /// Number of entries whose key was not already present
    pub inserted: usize,
    /// Number of events in the persisted leaderboard
    pub total: usize,
}

/// Load the existing leaderboard.
///
/// A missing file, or one that is not valid JSON, yields an empty leaderboard, as on a first run.
///
/// # Errors
///
/// * [LeaderboardError::Json] if the file is valid JSON but not a leaderboard
pub fn load_existing(path: &Path) -> Result<Leaderboard> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            event!(
                Level::INFO,
                "starting from an empty leaderboard, cannot read {}: {}",
                path.display(),
                err
            );
            return Ok(Leaderboard::new());
        }
    };
    match serde_json::from_slice(&data) {
        Ok(leaderboard) => Ok(leaderboard),
        Err(err) if err.classify() == Category::Data => Err(LeaderboardError::json(path, err)),
        Err(err) => {
            event!(
                Level::WARN,
                "starting from an empty leaderboard, cannot parse {}: {}",
                path.display(),
                err
            );
            Ok(Leaderboard::new())
        }
    }
}

/// Read a batch file.
pub fn read_batch(path: &Path) -> Result<Batch> {
    let data = std::fs::read(path).map_err(|err| LeaderboardError::io(path, err))?;
    serde_json::from_slice(&data).map_err(|err| LeaderboardError::json(path, err))
}

/// Fold a batch into the leaderboard, keyed by composite key.
///
/// Returns the number of entries whose key was not already present.
pub fn merge_batch(leaderboard: &mut Leaderboard, batch: Batch) -> usize {
    let mut inserted = 0;
    for entry in batch.entries {
        if leaderboard.insert(entry.composite_key(), entry).is_none() {
            inserted += 1;
        }
    }
    inserted
}

/// Directory in which to create the temporary file for `path`.
fn temp_dir_for(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Serialise with sorted keys and four space indentation.
fn write_pretty<W: Write>(writer: W, leaderboard: &Leaderboard) -> serde_json::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    leaderboard.serialize(&mut serializer)
}

/// Write the leaderboard to a synced temporary file next to `path`.
///
/// The temporary file is deleted when dropped unless it is committed.
fn stage(path: &Path, leaderboard: &Leaderboard) -> Result<NamedTempFile> {
    let mut temp =
        NamedTempFile::new_in(temp_dir_for(path)).map_err(|err| LeaderboardError::io(path, err))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_pretty(&mut writer, leaderboard)
            .map_err(|err| LeaderboardError::json(path, err))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|err| LeaderboardError::io(path, err))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|err| LeaderboardError::io(path, err))?;
    Ok(temp)
}

/// Atomically rename a staged file onto `path`.
fn commit(temp: NamedTempFile, path: &Path) -> Result<File> {
    temp.persist(path)
        .map_err(|err| LeaderboardError::io(path, err.error))
}

/// Atomically replace the leaderboard file.
///
/// On failure the existing file is left untouched.
pub fn persist(path: &Path, leaderboard: &Leaderboard) -> Result<()> {
    let temp = stage(path, leaderboard)?;
    commit(temp, path)?;
    Ok(())
}

/// Merge batch files into the leaderboard file.
///
/// All batches are read and merged in memory before anything is written, so an invalid batch
/// leaves the leaderboard file unchanged.
///
/// # Arguments
///
/// * `leaderboard_file`: Leaderboard file to update
/// * `batch_files`: Batch files, applied in order
#[tracing::instrument(level = "DEBUG", skip(batch_files))]
pub fn run<P: AsRef<Path>>(leaderboard_file: &Path, batch_files: &[P]) -> Result<MergeSummary> {
    let mut leaderboard = load_existing(leaderboard_file)?;
    let mut summary = MergeSummary::default();
    for batch_file in batch_files {
        let batch_file = batch_file.as_ref();
        let batch = read_batch(batch_file)?;
        let entries = batch.entries.len();
        let inserted = merge_batch(&mut leaderboard, batch);
        event!(
            Level::DEBUG,
            "merged {} entries ({} new) from {}",
            entries,
            inserted,
            batch_file.display()
        );
        summary.batches += 1;
        summary.entries += entries;
        summary.inserted += inserted;
    }
    persist(leaderboard_file, &leaderboard)?;
    summary.total = leaderboard.len();
    Ok(summary)
}
