//! HTTP error mapping. Every rejection leaves the gateway through [`ApiError`]
//! with the body `{"error": {"code", "message"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

use lp_04_webhook_ingress::IngressError;
use lp_06_eligibility_gate::EligibilityError;

use super::pipeline::DeliveryError;
use super::session::SessionError;

/// Machine-readable error codes.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const STALE_EVENT: &str = "STALE_EVENT";
    pub const INVALID_PAYLOAD: &str = "INVALID_PAYLOAD";
    pub const INVALID_CONTENT_ID: &str = "INVALID_CONTENT_ID";
    pub const INVALID_PURCHASE_ID: &str = "INVALID_PURCHASE_ID";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, details)
    }

    pub fn bad_request(code: &'static str, details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, details)
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, details)
    }

    pub fn storage_unavailable(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::STORAGE_UNAVAILABLE,
            details,
        )
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            details,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<IngressError> for ApiError {
    fn from(err: IngressError) -> Self {
        match &err {
            IngressError::Authentication(_) => Self::unauthorized(err.to_string()),
            IngressError::StaleEvent { .. } => {
                Self::bad_request(codes::STALE_EVENT, err.to_string())
            }
            IngressError::Validation(_) => {
                Self::bad_request(codes::INVALID_PAYLOAD, err.to_string())
            }
        }
    }
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::Ingress(e) => e.into(),
            DeliveryError::Storage(e) if e.is_retryable() => {
                Self::storage_unavailable(e.to_string())
            }
            DeliveryError::Storage(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<EligibilityError> for ApiError {
    fn from(err: EligibilityError) -> Self {
        let status = match err {
            EligibilityError::NotFound(_) => StatusCode::NOT_FOUND,
            EligibilityError::Unavailable(_) => StatusCode::CONFLICT,
            EligibilityError::SelfPurchaseForbidden | EligibilityError::SellerRevoked => {
                StatusCode::FORBIDDEN
            }
            EligibilityError::Storage(ref e) if !e.is_retryable() => {
                return Self::internal(err.to_string());
            }
            EligibilityError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::unauthorized(err.to_string())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, not per request).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
