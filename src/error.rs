use std::io;

use thiserror::Error;

/// Everything that can go wrong while configuring or running a genetic algorithm.
#[derive(Debug, Error)]
pub enum GaError {
    /// The parameters, the strategy's declared bounds, or the organisms it spawned cannot
    /// drive a run without indexing out of bounds or looping forever.
    #[error("InvalidConfiguration: {0}")]
    InvalidConfiguration(String),

    #[error("unable to read parameter file {path}: {source}")]
    ReadParameters {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse parameters: {0}")]
    ParseParameters(#[from] serde_yml::Error),
}

impl GaError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
