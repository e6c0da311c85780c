//! Shared HTTP plumbing: the response envelope and error mapping

mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Response envelope used by every JSON endpoint.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "...", "code": "NO_SLOTS_AVAILABLE"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) | DomainError::InvalidCode(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. }
        | DomainError::UnknownVehicle(_)
        | DomainError::NoActiveSession(_) => StatusCode::NOT_FOUND,
        DomainError::DuplicateVehicle(_)
        | DomainError::AlreadyParked(_)
        | DomainError::NoSlotsAvailable
        | DomainError::HasActiveSession(_)
        | DomainError::AlreadyActive(_)
        | DomainError::AlreadyCompleted(_)
        | DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: DomainError) -> ApiError {
    let status = status_for(&err);
    let message = if err.is_infrastructure() {
        error!(error = %err, "Request failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (
        status,
        Json(ApiResponse::error(message).with_code(err.kind())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScanCodeError;

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidCode(ScanCodeError::Empty), StatusCode::BAD_REQUEST),
            (DomainError::UnknownVehicle("A".into()), StatusCode::NOT_FOUND),
            (DomainError::NoActiveSession("A".into()), StatusCode::NOT_FOUND),
            (DomainError::not_found("Vehicle", "id", 1), StatusCode::NOT_FOUND),
            (DomainError::DuplicateVehicle("A".into()), StatusCode::CONFLICT),
            (DomainError::AlreadyParked("A".into()), StatusCode::CONFLICT),
            (DomainError::NoSlotsAvailable, StatusCode::CONFLICT),
            (DomainError::HasActiveSession("A".into()), StatusCode::CONFLICT),
            (DomainError::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{err}");
        }
    }

    #[test]
    fn error_body_carries_kind() {
        let (status, Json(body)) = error_response(DomainError::NoSlotsAvailable);
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!body.success);
        assert_eq!(body.code.as_deref(), Some("NO_SLOTS_AVAILABLE"));
        assert_eq!(body.error.as_deref(), Some("No slots available"));
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (_, Json(body)) = error_response(DomainError::Storage("database is locked".into()));
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
        assert_eq!(body.code.as_deref(), Some("STORAGE_ERROR"));
    }

    #[test]
    fn success_envelope_omits_error_fields() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }
}
