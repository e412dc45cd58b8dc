use anyhow::Error as AnyError;
use thiserror::Error;

use crate::http::{Response, StatusCode};
use crate::response::{text_response, IntoResponse};

/// Gateway-level error carrying an HTTP status. Only `Upstream` is part of
/// the external contract; the others exist so adapters and the router stay
/// total (callers always receive a well-formed response).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A backend forward failed at the transport layer (DNS, refused
    /// connection, timeout, TLS).
    #[error("API request failed: {message}")]
    Upstream { message: String },
    #[error("no route for path: {path}")]
    NotFound { path: String },
    #[error("internal error: {source}")]
    Internal {
        #[from]
        source: AnyError,
    },
}

impl GatewayError {
    pub fn upstream(message: impl Into<String>) -> Self {
        GatewayError::Upstream {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        GatewayError::NotFound { path: path.into() }
    }

    pub fn internal<E>(error: E) -> Self
    where
        E: Into<AnyError>,
    {
        GatewayError::Internal {
            source: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The bare failure message, without the variant's framing text.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Upstream { message } => message.clone(),
            GatewayError::NotFound { path } => format!("no route for path: {path}"),
            GatewayError::Internal { source } => source.to_string(),
        }
    }

    fn body_text(&self) -> String {
        match self {
            GatewayError::Upstream { message } => format!("API request failed: {message}"),
            GatewayError::NotFound { .. } => "Not Found".to_string(),
            GatewayError::Internal { source } => format!("internal error: {source}"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        text_response(self.status(), self.body_text())
    }
}
