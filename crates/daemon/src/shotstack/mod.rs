use async_trait::async_trait;
use engine::Timeline;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;

/// What the render service hands back for an accepted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReceipt {
    pub id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Shotstack API error: {status} - {body}")]
    Rejected { status: u16, body: String },
    #[error("Shotstack request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Shotstack response was malformed: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait RenderService: Send + Sync {
    /// Starts one render job. Not idempotent: every call creates a new job.
    async fn submit(&self, timeline: &Timeline) -> Result<RenderReceipt, SubmitError>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Option<EnvelopeBody>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeBody {
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct ShotstackClient {
    http: reqwest::Client,
    render_url: String,
    api_key: String,
}

impl ShotstackClient {
    pub fn new(config: &AppConfig, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.render_timeout)
            .build()?;
        Ok(ShotstackClient {
            http,
            render_url: config.shotstack_render_url(),
            api_key,
        })
    }

    async fn post(&self, timeline: &Timeline) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(&self.render_url)
            .header("x-api-key", &self.api_key)
            .json(&timeline.render_document())
            .send()
            .await
    }
}

/// Failures before any response arrived: timeouts, refused connects and
/// connections closed mid-request.
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[async_trait]
impl RenderService for ShotstackClient {
    async fn submit(&self, timeline: &Timeline) -> Result<RenderReceipt, SubmitError> {
        let response = match self.post(timeline).await {
            Ok(response) => response,
            Err(e) if is_transient(&e) => {
                warn!(error = %e, "render submission failed, retrying once");
                self.post(timeline).await?
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt = parse_receipt(response.json().await?)?;
        info!(render_id = %receipt.id, status = %receipt.status, "render submitted");
        Ok(receipt)
    }
}

fn parse_receipt(envelope: Envelope) -> Result<RenderReceipt, SubmitError> {
    let body = envelope
        .response
        .ok_or_else(|| SubmitError::MalformedResponse("missing response object".to_string()))?;
    let id = body
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SubmitError::MalformedResponse("missing render id".to_string()))?;
    Ok(RenderReceipt {
        id,
        status: body.status.unwrap_or_else(|| "queued".to_string()),
        message: body.message.unwrap_or_default(),
    })
}
