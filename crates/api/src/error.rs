use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bankdesk_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value '{value}': expected a port number between 1 and 65535")]
    InvalidPort { key: &'static str, value: String },

    #[error("invalid {key} value '{value}': expected a positive byte count")]
    InvalidBodyLimit { key: &'static str, value: String },

    #[error("invalid {key} entry '{value}': not usable as an Origin header value")]
    InvalidOrigin { key: &'static str, value: String },

    #[error("invalid {key} value: {source}")]
    BillPolicy {
        key: &'static str,
        #[source]
        source: CoreError,
    },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedJson(_) => "malformed_json",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.code(),
                "message": self.to_string()
            })),
        )
            .into_response()
    }
}
