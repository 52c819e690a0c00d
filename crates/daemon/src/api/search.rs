use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::error::ApiError;
use crate::pexels::{query, SearchError, SearchParams};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 80;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
    orientation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    success: bool,
    videos: Vec<Value>,
    total_results: u64,
    page: u32,
    per_page: u32,
    next_page: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(state)
}

async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let raw = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;
    let search = state
        .search
        .clone()
        .ok_or_else(|| ApiError::missing_key("PEXELS_API_KEY"))?;

    let enhanced = query::enhance(raw);
    info!(query = raw, %enhanced, "stock search");

    let mut request = SearchParams::new(enhanced, params.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE));
    request.page = params.page.unwrap_or(1).max(1);
    if let Some(orientation) = params.orientation.filter(|o| !o.is_empty()) {
        request.orientation = orientation;
    }

    let page = search.search(&request).await.map_err(|e| match e {
        SearchError::Rejected { status, body } => ApiError::Upstream {
            service: "Pexels",
            status,
            body,
        },
        other => ApiError::internal("Search failed", other),
    })?;
    info!(total = page.total_results, "stock search results");

    Ok(Json(SearchResponse {
        success: true,
        videos: page.videos,
        total_results: page.total_results,
        page: if page.page == 0 { request.page } else { page.page },
        per_page: if page.per_page == 0 { request.per_page } else { page.per_page },
        next_page: page.next_page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::clips::tests::FakeSearch;

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = crate::api::router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn enhances_city_queries() {
        let search = Arc::new(FakeSearch::with_videos(2));
        let state = AppState {
            search: Some(search.clone()),
            renderer: None,
        };
        let (status, body) = get_json(state, "/pexels/search?query=dublin%20harbour&per_page=5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["videos"].as_array().unwrap().len(), 2);
        assert_eq!(body["per_page"], 5);
        assert_eq!(body["videos"][0]["user"]["name"], "Stock Author");
        assert_eq!(body["videos"][0]["video_files"][0]["file_type"], "video/mp4");
        assert_eq!(body["videos"][0]["url"], "https://stock.example/video/dublin-0");
        let calls = search.calls.lock().unwrap();
        assert_eq!(calls[0].query, "Dublin Ireland harbour");
        assert_eq!(calls[0].orientation, "landscape");
    }

    #[tokio::test]
    async fn missing_query_is_rejected() {
        let search = Arc::new(FakeSearch::with_videos(2));
        let state = AppState {
            search: Some(search.clone()),
            renderer: None,
        };
        let (status, body) = get_json(state, "/pexels/search").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query parameter is required");
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn upstream_rejection_is_forwarded() {
        let search = Arc::new(FakeSearch {
            failing: vec!["Paris".to_string()],
            ..Default::default()
        });
        let state = AppState {
            search: Some(search),
            renderer: None,
        };
        let (status, body) = get_json(state, "/pexels/search?query=paris").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Pexels rejected the request");
        assert_eq!(body["detail"], "unavailable");
    }
}
