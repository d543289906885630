//! Brain Search - search a phrase across audio and video files
//!
//! This library uploads local media files or remote links to the Brain transcription
//! service, waits for processing to finish, searches the transcripts and renders the
//! hits as an HTML page with time-seeked audio players.

pub mod assets;
pub mod brain;
pub mod cli;
pub mod config;
pub mod inputs;
pub mod output;
pub mod pipeline;
pub mod utils;

pub use assets::{AssetRecord, KnownAssets};
pub use brain::{Asset, AssetMetadata, BrainApi, BrainClient, Hit, SearchResult};
pub use cli::{Cli, RunOptions};
pub use config::Config;
pub use inputs::MediaInput;
pub use output::ResultsPage;
pub use pipeline::{AssetPoller, SearchPipeline};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to brain search
#[derive(thiserror::Error, Debug)]
pub enum BrainSearchError {
    #[error("API request failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Missing {0}: pass it on the command line, via the environment or in the config file")]
    MissingCredential(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid file pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Timed out waiting for assets to process: {}", .0.join(", "))]
    PollTimeout(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),
}
