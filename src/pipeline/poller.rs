use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::brain::{Asset, BrainApi};
use crate::{utils, BrainSearchError, Result};

/// Interval between status checks unless configured otherwise
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Waits for asynchronously uploaded assets to finish processing
pub struct AssetPoller<'a> {
    api: &'a dyn BrainApi,
    interval: Duration,
    timeout: Option<Duration>,
}

impl<'a> AssetPoller<'a> {
    pub fn new(api: &'a dyn BrainApi) -> Self {
        Self {
            api,
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Give up after this long. Without a timeout an asset that never
    /// finishes processing blocks forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Poll every pending asset until all of them report a transcript.
    ///
    /// Status checks run one asset at a time. Returns the final state of each
    /// asset in the order they became ready.
    pub async fn wait_for(&self, mut pending: BTreeSet<String>) -> Result<Vec<Asset>> {
        let mut ready = Vec::with_capacity(pending.len());
        if pending.is_empty() {
            return Ok(ready);
        }

        let progress = utils::spinner("Waiting for assets to process...")?;
        let start_time = Instant::now();
        let mut check_count = 0;

        loop {
            check_count += 1;
            progress.set_message(format!(
                "Waiting for {} assets to process... ({}s elapsed, check #{})",
                pending.len(),
                start_time.elapsed().as_secs(),
                check_count
            ));

            for asset_id in pending.clone() {
                let asset = self.api.get_asset(&asset_id).await?;

                if asset.has_transcript() {
                    tracing::debug!("Asset {} is ready", asset_id);
                    pending.remove(&asset_id);
                    ready.push(asset);
                }
            }

            if pending.is_empty() {
                break;
            }

            if let Some(timeout) = self.timeout {
                if start_time.elapsed() >= timeout {
                    progress.finish_with_message("Timed out waiting for assets");
                    return Err(BrainSearchError::PollTimeout(pending.into_iter().collect()).into());
                }
            }

            sleep(self.interval).await;
        }

        progress.finish_with_message("All assets processed");
        Ok(ready)
    }
}
