use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use engine::budget::DEFAULT_OVERLAY_FRACTION;
use engine::selector::{self, ClipDescriptor};
use engine::trip::TripMetadata;
use engine::{compile_timeline, CompositionRequest, OverlayToggles};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::AppState;
use crate::clips::collect_clips;
use crate::error::ApiError;
use crate::shotstack::SubmitError;

const DEFAULT_TITLE: &str = "Your Trip";
const DEFAULT_CLIP_SECONDS: f64 = 7.0;
const DEFAULT_CLIPS_PER_DESTINATION: f64 = 2.0;
const PENDING_MESSAGE: &str = "Video is being generated. This can take 1-2 minutes.";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DestinationInput {
    Name(String),
    Record { name: String },
}

impl DestinationInput {
    fn name(&self) -> &str {
        match self {
            DestinationInput::Name(name) | DestinationInput::Record { name } => name.trim(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    destinations: Vec<DestinationInput>,
    #[serde(default)]
    clips: Vec<ClipDescriptor>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    voiceover_url: Option<String>,
    #[serde(default = "default_clip_seconds")]
    clip_duration: f64,
    #[serde(default = "default_clips_per_destination")]
    clips_per_destination: f64,
    #[serde(default)]
    travel_data: Option<TripMetadata>,
    #[serde(default = "default_true")]
    show_hotel_overlay: bool,
    #[serde(default = "default_true")]
    show_flight_overlay: bool,
    #[serde(default = "default_overlay_fraction")]
    overlay_duration: f64,
}

fn default_clip_seconds() -> f64 {
    DEFAULT_CLIP_SECONDS
}

fn default_clips_per_destination() -> f64 {
    DEFAULT_CLIPS_PER_DESTINATION
}

/// Any JSON number is accepted; fractions truncate and the result is clamped
/// into the supported range.
fn clips_per_destination(requested: f64) -> usize {
    selector::clamp_clip_count(requested as usize)
}

fn default_true() -> bool {
    true
}

fn default_overlay_fraction() -> f64 {
    DEFAULT_OVERLAY_FRACTION
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClipSummary {
    destination: String,
    url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    success: bool,
    render_id: String,
    status: String,
    message: String,
    clips: Vec<ClipSummary>,
    status_url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .with_state(state)
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let renderer = state
        .renderer
        .clone()
        .ok_or_else(|| ApiError::missing_key("SHOTSTACK_API_KEY"))?;
    let Json(req) = payload?;

    let destinations: Vec<String> = req
        .destinations
        .iter()
        .map(DestinationInput::name)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if destinations.is_empty() {
        return Err(ApiError::BadRequest("No destinations supplied".to_string()));
    }
    if !req.clip_duration.is_finite() || req.clip_duration <= 0.0 {
        return Err(ApiError::BadRequest(
            "clipDuration must be a positive number of seconds".to_string(),
        ));
    }
    if req.clips.iter().any(|c| c.source_url.trim().is_empty()) {
        return Err(ApiError::BadRequest("Every supplied clip needs a url".to_string()));
    }

    let composition_id = Uuid::new_v4();
    let span = info_span!("composition", %composition_id);
    async move {
        info!(
            title = req.title.as_deref().unwrap_or(DEFAULT_TITLE),
            destinations = destinations.len(),
            "generating video"
        );

        let clips = if req.clips.is_empty() {
            let search = state
                .search
                .clone()
                .ok_or_else(|| ApiError::missing_key("PEXELS_API_KEY"))?;
            collect_clips(search, &destinations, clips_per_destination(req.clips_per_destination)).await
        } else {
            info!(count = req.clips.len(), "using supplied clips");
            req.clips
        };
        if clips.is_empty() {
            return Err(ApiError::NoClips);
        }
        info!(count = clips.len(), "clips ready");

        let request = CompositionRequest {
            clips,
            title: req
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            clip_length: req.clip_duration,
            voiceover_url: req.voiceover_url,
            trip: req.travel_data.unwrap_or_default(),
            toggles: OverlayToggles {
                hotel: req.show_hotel_overlay,
                flight: req.show_flight_overlay,
                fraction: req.overlay_duration,
            },
        };
        let timeline = compile_timeline(&request)?;

        let receipt = renderer.submit(&timeline).await.map_err(|e| match e {
            SubmitError::Rejected { status, body } => ApiError::Upstream {
                service: "Shotstack",
                status,
                body,
            },
            other => ApiError::internal("Video generation failed", other),
        })?;
        info!(render_id = %receipt.id, message = %receipt.message, "render queued");

        Ok(Json(GenerateResponse {
            success: true,
            status_url: format!("/api/video/status/{}", receipt.id),
            render_id: receipt.id,
            status: receipt.status,
            message: PENDING_MESSAGE.to_string(),
            clips: request
                .clips
                .into_iter()
                .map(|c| ClipSummary {
                    destination: c.destination_name,
                    url: c.source_url,
                })
                .collect(),
        }))
    }
    .instrument(span)
    .await
}
