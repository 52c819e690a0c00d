use axum::Router;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::pexels::{PexelsClient, VideoSearch};
use crate::shotstack::{RenderService, ShotstackClient};

pub mod generate;
pub mod search;

/// Services shared by every handler. A `None` service means its API key was
/// not configured.
#[derive(Clone)]
pub struct AppState {
    pub search: Option<Arc<dyn VideoSearch>>,
    pub renderer: Option<Arc<dyn RenderService>>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let search = match &config.pexels_api_key {
            Some(key) => Some(Arc::new(PexelsClient::new(config, key.clone())?) as Arc<dyn VideoSearch>),
            None => None,
        };
        let renderer = match &config.shotstack_api_key {
            Some(key) => Some(Arc::new(ShotstackClient::new(config, key.clone())?) as Arc<dyn RenderService>),
            None => None,
        };
        Ok(AppState { search, renderer })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/video", generate::router(state.clone()))
        .nest("/pexels", search::router(state))
}
