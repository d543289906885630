use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::pipeline::PipelineOptions;
use crate::{BrainSearchError, Result};

#[derive(Parser, Debug)]
#[command(
    name = "brainsearch",
    about = "Brain Search - find a phrase in audio and video files",
    version,
    long_about = "Uploads local media files or links to the Brain API, waits for them to be transcribed, searches the transcripts for a phrase and writes an HTML page with audio players positioned at every hit."
)]
pub struct Cli {
    /// Phrase to search for
    #[arg(required = true, value_name = "QUERY")]
    pub query: Vec<String>,

    /// API user id
    #[arg(short, long, env = "BRAIN_USER")]
    pub user: Option<String>,

    /// API user token
    #[arg(short, long, env = "BRAIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// URL of the API server to use
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Reload all data files to the server, ignoring earlier uploads
    #[arg(short, long)]
    pub reload: bool,

    /// Minimum hit quality to show (0.0 to 1.0)
    #[arg(short, long, value_name = "SCORE")]
    pub quality: Option<f64>,

    /// Files to search in (glob patterns; `.links` files list one URL per line)
    #[arg(short, long, value_name = "PATTERN")]
    pub file: Vec<String>,

    /// Media URL to search in
    #[arg(short, long, value_name = "URL")]
    pub link: Vec<String>,

    /// Also search every asset previously indexed on the server
    #[arg(short, long)]
    pub brain_assets: bool,

    /// Results page path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seconds between checks while waiting for uploads to process
    #[arg(long, value_name = "SECONDS")]
    pub poll_interval: Option<f64>,

    /// Give up waiting for uploads after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Do not open the results page in a browser
    #[arg(long)]
    pub no_browser: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings for one run, command line taking precedence over the config file
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub query: Vec<String>,
    pub server_url: String,
    pub user_id: String,
    pub token: String,
    pub file_patterns: Vec<String>,
    pub links: Vec<String>,
    pub quality_threshold: f64,
    pub results_path: PathBuf,
    pub open_browser: bool,
    pub pipeline: PipelineOptions,
}

impl Cli {
    /// Merge the command line with the config file
    pub fn resolve(&self, config: &Config) -> Result<RunOptions> {
        let user_id = self
            .user
            .clone()
            .or_else(|| config.server.user_id.clone())
            .ok_or(BrainSearchError::MissingCredential("API user id"))?;
        let token = self
            .token
            .clone()
            .or_else(|| config.server.token.clone())
            .ok_or(BrainSearchError::MissingCredential("API token"))?;

        let mut resolved = config.clone();
        if let Some(server) = &self.server {
            resolved.server.url = server.clone();
        }
        if let Some(quality) = self.quality {
            resolved.search.quality_threshold = quality;
        }
        if let Some(interval) = self.poll_interval {
            resolved.search.poll_interval_secs = interval;
        }
        if self.timeout.is_some() {
            resolved.search.poll_timeout_secs = self.timeout;
        }
        if let Some(output) = &self.output {
            resolved.output.results_path = output.clone();
        }
        resolved.validate()?;
        let poll_interval = resolved.search.poll_interval()?;

        Ok(RunOptions {
            query: self.query.clone(),
            server_url: resolved.server.url,
            user_id,
            token,
            file_patterns: self.file.clone(),
            links: self.link.clone(),
            quality_threshold: resolved.search.quality_threshold,
            results_path: resolved.output.results_path,
            open_browser: resolved.output.open_browser && !self.no_browser,
            pipeline: PipelineOptions {
                reload: self.reload,
                brain_assets: self.brain_assets,
                poll_interval,
                poll_timeout: resolved.search.poll_timeout_secs.map(Duration::from_secs),
            },
        })
    }
}
