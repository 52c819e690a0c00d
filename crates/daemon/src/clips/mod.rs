use engine::selector::{self, ClipDescriptor};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::pexels::{SearchError, SearchParams, VideoSearch};

/// Searches one destination and keeps its best clips.
pub async fn search_destination(
    search: &dyn VideoSearch,
    destination: &str,
    max_count: usize,
) -> Result<Vec<ClipDescriptor>, SearchError> {
    let params = SearchParams::new(
        selector::search_query(destination),
        selector::candidate_count(max_count) as u32,
    );
    let page = search.search(&params).await?;
    Ok(selector::select_clips(destination, &page.stock_videos(), max_count))
}

/// Runs one search task per destination and waits for all of them.
///
/// A failed or empty search only removes that destination; clips come back in
/// destination order.
pub async fn collect_clips(
    search: Arc<dyn VideoSearch>,
    destinations: &[String],
    per_destination: usize,
) -> Vec<ClipDescriptor> {
    let tasks = destinations.iter().cloned().map(|destination| {
        let search = search.clone();
        tokio::spawn(async move {
            let result = search_destination(search.as_ref(), &destination, per_destination).await;
            (destination, result)
        })
    });

    let mut clips = Vec::new();
    for outcome in join_all(tasks).await {
        match outcome {
            Ok((destination, Ok(found))) if found.is_empty() => {
                warn!(%destination, "no clips found");
            }
            Ok((destination, Ok(found))) => {
                info!(%destination, count = found.len(), "found clips");
                clips.extend(found);
            }
            Ok((destination, Err(e))) => {
                warn!(%destination, error = %e, "clip search failed");
            }
            Err(e) => {
                error!(error = %e, "clip search task aborted");
            }
        }
    }
    clips
}
