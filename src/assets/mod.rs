use std::collections::{BTreeMap, HashMap};

use crate::brain::{Asset, BrainApi};
use crate::Result;

/// What we need to know about an uploaded asset to search and play it back
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub id: String,
    pub playback_url: Option<String>,
    pub duration: Option<f64>,
}

impl From<&Asset> for AssetRecord {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.asset_id.clone(),
            playback_url: asset.playback_url.clone(),
            duration: asset.duration,
        }
    }
}

/// Searchable assets indexed by the filename they were uploaded under.
///
/// Matching is by name only: a file that changed on disk but kept its name is
/// treated as already uploaded. Records replaced under a name stay reachable
/// by id, since two inputs sharing a basename are both searched.
#[derive(Debug, Clone, Default)]
pub struct KnownAssets {
    by_filename: BTreeMap<String, AssetRecord>,
    by_id: HashMap<String, (String, AssetRecord)>,
}

impl KnownAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a remote asset listing, skipping failed, untranscribed and unnamed assets
    pub fn from_catalog(assets: &[Asset]) -> Self {
        let mut known = Self::new();

        for asset in assets {
            if asset.is_failed() || !asset.has_transcript() {
                continue;
            }
            if let Some(filename) = asset.filename() {
                known.insert(filename, AssetRecord::from(asset));
            }
        }

        known
    }

    pub fn get(&self, filename: &str) -> Option<&AssetRecord> {
        self.by_filename.get(filename)
    }

    pub fn insert(&mut self, filename: impl Into<String>, record: AssetRecord) {
        let filename = filename.into();
        self.by_id
            .insert(record.id.clone(), (filename.clone(), record.clone()));
        self.by_filename.insert(filename, record);
    }

    /// Find an asset and the filename it was uploaded under
    pub fn by_id(&self, asset_id: &str) -> Option<(&str, &AssetRecord)> {
        self.by_id
            .get(asset_id)
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Every known asset id, in filename order
    pub fn ids(&self) -> Vec<String> {
        self.by_filename.values().map(|record| record.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.by_filename.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_filename.is_empty()
    }
}

/// Fetch all previously uploaded assets once and index the searchable ones
pub async fn reconcile(api: &dyn BrainApi) -> Result<KnownAssets> {
    let catalog = api.list_assets().await?;
    let known = KnownAssets::from_catalog(&catalog);

    tracing::info!(
        "Found {} reusable assets out of {} on the server",
        known.len(),
        catalog.len()
    );

    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{AssetMetadata, MockBrainApi};

    fn asset(id: &str, filename: Option<&str>) -> Asset {
        Asset {
            asset_id: id.to_string(),
            transcript_exists: Some(true),
            metadata: filename.map(AssetMetadata::with_filename),
            playback_url: Some(format!("https://cdn.example.com/{}.mp3", id)),
            duration: Some(30.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_skips_unusable_assets() {
        let mut failed = asset("failed", Some("failed.mp3"));
        failed.status = Some("failed".to_string());

        let mut pending = asset("pending", Some("pending.mp3"));
        pending.transcript_exists = Some(false);

        let mut no_metadata = asset("bare", None);
        no_metadata.metadata = None;

        let nameless = Asset {
            metadata: Some(AssetMetadata::default()),
            ..asset("nameless", None)
        };

        let catalog = vec![asset("ok", Some("talk.mp3")), failed, pending, no_metadata, nameless];
        let known = KnownAssets::from_catalog(&catalog);

        assert_eq!(known.len(), 1);
        let record = known.get("talk.mp3").unwrap();
        assert_eq!(record.id, "ok");
        assert_eq!(record.playback_url.as_deref(), Some("https://cdn.example.com/ok.mp3"));
        assert_eq!(record.duration, Some(30.0));
    }

    #[test]
    fn test_lookup_by_id() {
        let known = KnownAssets::from_catalog(&[asset("a1", Some("one.mp3")), asset("a2", Some("two.mp3"))]);

        let (name, record) = known.by_id("a2").unwrap();
        assert_eq!(name, "two.mp3");
        assert_eq!(record.id, "a2");
        assert!(known.by_id("missing").is_none());
        assert_eq!(known.ids(), vec!["a1".to_string(), "a2".to_string()]);
    }

    #[test]
    fn test_replaced_record_stays_reachable_by_id() {
        let mut known = KnownAssets::new();
        known.insert("talk.mp3", AssetRecord::from(&asset("first", Some("talk.mp3"))));
        known.insert("talk.mp3", AssetRecord::from(&asset("second", Some("talk.mp3"))));

        assert_eq!(known.get("talk.mp3").map(|r| r.id.as_str()), Some("second"));
        assert_eq!(known.len(), 1);

        let (name, record) = known.by_id("first").unwrap();
        assert_eq!(name, "talk.mp3");
        assert_eq!(record.playback_url.as_deref(), Some("https://cdn.example.com/first.mp3"));
        assert!(known.by_id("second").is_some());
    }

    #[tokio::test]
    async fn test_reconcile_lists_assets_once() {
        let mut api = MockBrainApi::new();
        api.expect_list_assets()
            .times(1)
            .returning(|| Ok(vec![asset("a1", Some("one.mp3"))]));

        let known = reconcile(&api).await.unwrap();
        assert_eq!(known.get("one.mp3").map(|r| r.id.as_str()), Some("a1"));
    }
}
