//! Command Line Interface (CLI) arguments.

use clap::Parser;
use std::path::PathBuf;

/// Leaderboard server command line interface
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "LEADERBOARD_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 5000, env = "LEADERBOARD_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "LEADERBOARD_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/leaderboard/certs/cert.pem",
        env = "LEADERBOARD_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/leaderboard/certs/key.pem",
        env = "LEADERBOARD_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "LEADERBOARD_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Path to the leaderboard JSON file
    #[arg(
        long,
        default_value = "data/leaderboard.json",
        env = "LEADERBOARD_FILE"
    )]
    pub leaderboard_file: PathBuf,
    /// Path to the weather observations JSON file
    #[arg(
        long,
        default_value = "data/station_observations.json",
        env = "LEADERBOARD_WEATHER_FILE"
    )]
    pub weather_file: PathBuf,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}

/// Leaderboard merge tool command line interface
///
/// Merges batches of leaderboard events into the leaderboard file, replacing events that share
/// a start date, athlete name and rank. The file is replaced atomically, so it is safe to run
/// against a live server.
#[derive(Clone, Debug, Parser)]
#[command(name = "update_leaderboard", version, about)]
pub struct MergeArgs {
    /// Path to the leaderboard JSON file to update
    #[arg(long, default_value = "leaderboard.json", env = "LEADERBOARD_FILE")]
    pub leaderboard_file: PathBuf,
    /// Batch files, each a JSON object with an `entries` list, applied in order
    #[arg(required = true)]
    pub batch_files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        CommandLineArgs::command().debug_assert();
        MergeArgs::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = CommandLineArgs::try_parse_from(["leaderboard"]).unwrap();
        assert_eq!(5000, args.port);
        assert_eq!(PathBuf::from("data/leaderboard.json"), args.leaderboard_file);
        assert_eq!(
            PathBuf::from("data/station_observations.json"),
            args.weather_file
        );
    }

    #[test]
    fn merge_requires_batch_files() {
        assert!(MergeArgs::try_parse_from(["update_leaderboard"]).is_err());
        let args =
            MergeArgs::try_parse_from(["update_leaderboard", "a.json", "b.json"]).unwrap();
        assert_eq!(PathBuf::from("leaderboard.json"), args.leaderboard_file);
        assert_eq!(
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
            args.batch_files
        );
    }
}
