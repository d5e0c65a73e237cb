//! This file defines the leaderboard merge tool entry point.
//!
//! Usage: `update_leaderboard [--leaderboard-file <FILE>] <BATCH_FILE>...`

use leaderboard::cli::MergeArgs;
use leaderboard::merge;
use leaderboard::tracing;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

fn run(args: &MergeArgs) -> anyhow::Result<()> {
    let summary = merge::run(&args.leaderboard_file, &args.batch_files).with_context(|| {
        format!(
            "failed to update leaderboard {}",
            args.leaderboard_file.display()
        )
    })?;
    ::tracing::info!(
        "merged {} entries ({} new) from {} batches, {} events in {}",
        summary.entries,
        summary.inserted,
        summary.batches,
        summary.total,
        args.leaderboard_file.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = MergeArgs::parse();
    tracing::init_tracing();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
