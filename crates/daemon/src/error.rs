use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use engine::CompositionError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing {key}")]
    Config { key: &'static str, hint: String },
    #[error("{0}")]
    BadRequest(String),
    #[error("No video clips found")]
    NoClips,
    #[error("{service} rejected the request")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn missing_key(key: &'static str) -> Self {
        ApiError::Config {
            key,
            hint: format!("Set {key} in the daemon's environment and restart it"),
        }
    }

    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            context,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config { .. } | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) | ApiError::Composition(_) => StatusCode::BAD_REQUEST,
            ApiError::NoClips => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Config { hint, .. } => Some(hint.clone()),
            ApiError::Upstream { body, .. } => Some(body.clone()),
            ApiError::Composition(e) => Some(e.to_string()),
            ApiError::Internal { source, .. } => {
                error!(error = ?source, "request failed");
                Some(source.to_string())
            }
            ApiError::BadRequest(_) | ApiError::NoClips => None,
        };
        let error = match &self {
            ApiError::Composition(_) => "Invalid composition".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error, detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::missing_key("PEXELS_API_KEY").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NoClips.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Composition(CompositionError::NoClips).status(), StatusCode::BAD_REQUEST);
        let upstream = ApiError::Upstream {
            service: "Shotstack",
            status: 402,
            body: "{}".into(),
        };
        assert_eq!(upstream.status(), StatusCode::PAYMENT_REQUIRED);
        let bogus = ApiError::Upstream {
            service: "Shotstack",
            status: 42,
            body: String::new(),
        };
        assert_eq!(bogus.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn config_error_body_carries_hint() {
        let response = ApiError::missing_key("SHOTSTACK_API_KEY").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Missing SHOTSTACK_API_KEY");
        assert!(body["detail"].as_str().unwrap().contains("SHOTSTACK_API_KEY"));
    }
}
