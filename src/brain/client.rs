use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use url::Url;

use super::{Asset, AssetMetadata, BrainApi, SearchResult};
use crate::{BrainSearchError, Result};

/// HTTP client for the Brain asset and search API
pub struct BrainClient {
    client: Client,
    base_url: Url,
    user_id: String,
    token: String,
}

/// Asset listings come either wrapped or as a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssetListing {
    Wrapped { results: Vec<Asset> },
    Bare(Vec<Asset>),
}

#[derive(Debug, Deserialize)]
struct CreatedAsset {
    asset_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl BrainClient {
    pub fn new(server_url: &str, user_id: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(server_url)
            .map_err(|_| BrainSearchError::InvalidUrl(server_url.to_string()))?;

        // Keep any path prefix when joining endpoint paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            user_id: user_id.into(),
            token: token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Failed to build endpoint URL for {}", path))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.user_id, Some(&self.token))
    }

    /// Turn non-success responses into API errors carrying the body
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BrainSearchError::Api {
            status: status.as_u16(),
            body,
        }
        .into())
    }
}

#[async_trait]
impl BrainApi for BrainClient {
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let url = self.endpoint("assets")?;
        tracing::debug!("Listing assets: {}", url);

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .context("Failed to list assets")?;

        let listing: AssetListing = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse asset listing")?;

        Ok(match listing {
            AssetListing::Wrapped { results } => results,
            AssetListing::Bare(assets) => assets,
        })
    }

    async fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        let url = self.endpoint(&format!("assets/{}", urlencoding::encode(asset_id)))?;

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .with_context(|| format!("Failed to fetch asset {}", asset_id))?;

        let asset = Self::check(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse asset {}", asset_id))?;

        Ok(asset)
    }

    async fn upload_file(&self, path: &Path, metadata: &AssetMetadata) -> Result<String> {
        let url = self.endpoint("assets")?;
        let content = fs_err::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!("Uploading {} ({} bytes)", path.display(), content.len());

        let metadata_part = Part::text(serde_json::to_string(metadata)?)
            .mime_str("application/json")
            .context("Failed to build metadata part")?;
        let form = Form::new()
            .part("file", Part::bytes(content).file_name(filename))
            .part("metadata", metadata_part);

        let response = self
            .authorized(self.client.post(url))
            .query(&[("async", "true")])
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to upload {}", path.display()))?;

        let created: CreatedAsset = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse upload response")?;

        Ok(created.asset_id)
    }

    async fn upload_link(&self, link: &str, metadata: &AssetMetadata) -> Result<String> {
        let url = self.endpoint("assets")?;
        tracing::debug!("Submitting link {}", link);

        let response = self
            .authorized(self.client.post(url))
            .query(&[("async", "true")])
            .json(&json!({
                "data_url": link,
                "metadata": metadata,
            }))
            .send()
            .await
            .with_context(|| format!("Failed to submit link {}", link))?;

        let created: CreatedAsset = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse link submission response")?;

        Ok(created.asset_id)
    }

    async fn search(&self, query: &str, asset_ids: &[String]) -> Result<Vec<SearchResult>> {
        let url = self.endpoint("search")?;
        tracing::debug!("Searching {} assets for {:?}", asset_ids.len(), query);

        let response = self
            .authorized(self.client.post(url))
            .json(&json!({
                "query": query,
                "asset_ids": asset_ids,
            }))
            .send()
            .await
            .context("Failed to search assets")?;

        let results: SearchResponse = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse search response")?;

        Ok(results.results)
    }
}
