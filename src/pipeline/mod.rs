use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use crate::assets::{self, AssetRecord, KnownAssets};
use crate::brain::{AssetMetadata, BrainApi, SearchResult};
use crate::inputs::MediaInput;
use crate::{utils, Result};

pub mod poller;

pub use poller::{AssetPoller, DEFAULT_POLL_INTERVAL};

/// Knobs controlling how inputs become searchable assets
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Upload every input even if an asset with the same name exists
    pub reload: bool,

    /// Search every previously indexed asset, not only the given inputs
    pub brain_assets: bool,

    pub poll_interval: Duration,

    pub poll_timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            reload: false,
            brain_assets: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: None,
        }
    }
}

/// Assets ready to be searched
#[derive(Debug, Clone)]
pub struct PreparedAssets {
    /// Ids to search, without duplicates, in input order
    pub asset_ids: Vec<String>,

    /// Every asset we know a name and playback url for
    pub known: KnownAssets,
}

/// Main search pipeline
pub struct SearchPipeline {
    api: Box<dyn BrainApi>,
    options: PipelineOptions,
}

impl SearchPipeline {
    pub fn new(api: Box<dyn BrainApi>, options: PipelineOptions) -> Self {
        Self { api, options }
    }

    /// Make every input searchable, reusing earlier uploads with the same name
    pub async fn prepare(&self, inputs: &[MediaInput]) -> Result<PreparedAssets> {
        let mut known = if self.options.reload && !self.options.brain_assets {
            tracing::info!("Reload requested, skipping previously uploaded assets");
            KnownAssets::new()
        } else {
            assets::reconcile(self.api.as_ref()).await?
        };

        let mut asset_ids = Vec::with_capacity(inputs.len());
        // asset id -> name it was uploaded under
        let mut loading = BTreeMap::new();

        for input in inputs {
            let key = input.cache_key();

            if !self.options.reload {
                if let Some(record) = known.get(&key) {
                    utils::print_status("Reusing", &input.display_name());
                    asset_ids.push(record.id.clone());
                    continue;
                }
            }

            utils::print_status("Loading", &input.display_name());
            let asset_id = self.upload(input, &key).await?;
            tracing::debug!("Uploaded {} as asset {}", key, asset_id);

            asset_ids.push(asset_id.clone());
            loading.insert(asset_id, key);
        }

        let pending: BTreeSet<String> = loading.keys().cloned().collect();
        let ready = AssetPoller::new(self.api.as_ref())
            .with_interval(self.options.poll_interval)
            .with_timeout(self.options.poll_timeout)
            .wait_for(pending)
            .await?;

        for asset in &ready {
            if let Some(key) = loading.get(&asset.asset_id) {
                known.insert(key.clone(), AssetRecord::from(asset));
            }
        }

        if self.options.brain_assets {
            asset_ids.extend(known.ids());
        }

        let mut seen = HashSet::new();
        asset_ids.retain(|id| seen.insert(id.clone()));

        Ok(PreparedAssets { asset_ids, known })
    }

    async fn upload(&self, input: &MediaInput, key: &str) -> Result<String> {
        let metadata = AssetMetadata::with_filename(key);

        match input {
            MediaInput::File(path) => self.api.upload_file(path, &metadata).await,
            MediaInput::Link(link) => self.api.upload_link(link, &metadata).await,
        }
    }

    /// Search the phrase formed by the query words across the given assets
    pub async fn search(&self, query_words: &[String], asset_ids: &[String]) -> Result<Vec<SearchResult>> {
        let query = join_query(query_words);

        if asset_ids.is_empty() {
            tracing::warn!("No assets to search");
            return Ok(Vec::new());
        }

        tracing::info!("Searching {} assets for \"{}\"", asset_ids.len(), query);
        self.api.search(&query, asset_ids).await
    }
}

/// Join query words into a single phrase
pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}
