use async_trait::async_trait;
use engine::selector::StockVideo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

pub mod query;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    pub orientation: String,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, per_page: u32) -> Self {
        SearchParams {
            query: query.into(),
            page: 1,
            per_page,
            orientation: "landscape".to_string(),
        }
    }
}

/// One page of stock-video search results. Videos are kept exactly as the
/// provider sent them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub videos: Vec<Value>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl SearchPage {
    /// The videos that parse as [`StockVideo`], in result order.
    pub fn stock_videos(&self) -> Vec<StockVideo> {
        self.videos
            .iter()
            .filter_map(|video| match StockVideo::deserialize(video) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable video entry");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Pexels API error: {status} - {body}")]
    Rejected { status: u16, body: String },
    #[error("Pexels request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<SearchPage, SearchError>;
}

pub struct PexelsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PexelsClient {
    pub fn new(config: &AppConfig, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.search_timeout)
            .build()?;
        Ok(PexelsClient {
            http,
            base_url: config.pexels_base_url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl VideoSearch for PexelsClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchPage, SearchError> {
        let response = self
            .http
            .get(format!("{}/videos/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", params.query.as_str()),
                ("orientation", params.orientation.as_str()),
            ])
            .query(&[("per_page", params.per_page), ("page", params.page)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(SearchError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
