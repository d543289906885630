use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod client;

pub use client::BrainClient;

use crate::Result;

/// Default Brain API endpoint
pub const DEFAULT_SERVER_URL: &str = "https://brain.deepgram.com";

/// A media asset stored by the Brain service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Opaque asset identifier
    pub asset_id: String,

    /// Processing status reported by the service (e.g. "processing", "failed")
    #[serde(default)]
    pub status: Option<String>,

    /// Listing responses carry this flag instead of the transcript body
    #[serde(default)]
    pub transcript_exists: Option<bool>,

    /// Transcript body, present once processing completed
    #[serde(default)]
    pub transcript: Option<serde_json::Value>,

    /// Metadata attached at upload time
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,

    /// Playback URL of the stored media
    #[serde(default, rename = "url", alias = "playback_url")]
    pub playback_url: Option<String>,

    /// Media duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Asset {
    pub fn is_failed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("failed"))
    }

    /// Whether the transcript is ready to be searched
    pub fn has_transcript(&self) -> bool {
        if self.transcript_exists == Some(true) {
            return true;
        }

        match &self.transcript {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(text)) => !text.is_empty(),
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::Object(fields)) => !fields.is_empty(),
            Some(_) => true,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.filename.as_deref())
    }
}

/// Metadata stored alongside an asset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssetMetadata {
    #[serde(default)]
    pub filename: Option<String>,
}

impl AssetMetadata {
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
        }
    }
}

/// Hits for a single asset returned by a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub asset_id: String,

    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One timestamped match of the search phrase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Hit {
    /// Confidence score (0.0 to 1.0)
    pub quality: f64,

    /// Offset into the media in seconds
    pub time: f64,
}

/// Operations the search workflow needs from the Brain service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrainApi: Send + Sync {
    /// List every asset owned by the user
    async fn list_assets(&self) -> Result<Vec<Asset>>;

    /// Fetch the current state of one asset
    async fn get_asset(&self, asset_id: &str) -> Result<Asset>;

    /// Upload a local file for asynchronous processing, returning its asset id
    async fn upload_file(&self, path: &Path, metadata: &AssetMetadata) -> Result<String>;

    /// Submit a remote media link for asynchronous processing, returning its asset id
    async fn upload_link(&self, link: &str, metadata: &AssetMetadata) -> Result<String>;

    /// Search a phrase across the given assets
    async fn search(&self, query: &str, asset_ids: &[String]) -> Result<Vec<SearchResult>>;
}
