use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// One rejected field of an incoming payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("webhook store lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("invalid webhook payload: {} field(s) rejected", .0.len())]
    Validation(Vec<FieldError>),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("invalid host '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    detail: Vec<FieldError>,
}

impl ReceiverError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReceiverError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::MalformedBody(reason) => ErrorBody {
                status: "error",
                message: format!("Malformed request body: {reason}"),
                detail: Vec::new(),
            },
            Self::Validation(detail) => ErrorBody {
                status: "error",
                message: "Invalid webhook payload".to_string(),
                detail,
            },
            // Internal causes stay in the server log.
            Self::Store(_) => ErrorBody {
                status: "error",
                message: "Failed to process webhook".to_string(),
                detail: Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}
