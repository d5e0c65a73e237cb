//! Application state

use crate::cli::CommandLineArgs;
use crate::dataset::{Datasets, FileDatasets};

use std::sync::Arc;

/// Shared application state passed to each request handler.
///
/// The state is immutable; every request reads the datasets afresh.
pub struct AppState {
    /// Command line arguments.
    pub args: CommandLineArgs,

    /// Dataset source.
    pub datasets: Box<dyn Datasets>,
}

impl AppState {
    /// Create and return an [AppState] reading datasets from the configured files.
    pub fn new(args: &CommandLineArgs) -> Self {
        Self::with_datasets(args, Box::new(FileDatasets::from_args(args)))
    }

    /// Create and return an [AppState] with an explicit dataset source.
    pub fn with_datasets(args: &CommandLineArgs, datasets: Box<dyn Datasets>) -> Self {
        Self {
            args: args.clone(),
            datasets,
        }
    }
}

/// [AppState] wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
