use thiserror::Error;

use crate::domain::scan_code::ScanCodeError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Vehicle {0} is already registered")]
    DuplicateVehicle(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Vehicle {0} is not registered")]
    UnknownVehicle(String),

    #[error("Vehicle {0} is already parked")]
    AlreadyParked(String),

    #[error("No active parking found for vehicle {0}")]
    NoActiveSession(String),

    #[error("No slots available")]
    NoSlotsAvailable,

    #[error("Invalid QR code: {0}")]
    InvalidCode(#[from] ScanCodeError),

    #[error("Vehicle {0} has an active parking session, process the exit first")]
    HasActiveSession(String),

    #[error("Vehicle {0} already has an active session in the ledger")]
    AlreadyActive(String),

    #[error("Parking session {0} is already completed")]
    AlreadyCompleted(i32),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Stable machine-readable code reported to API callers next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateVehicle(_) => "DUPLICATE_VEHICLE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnknownVehicle(_) => "UNKNOWN_VEHICLE",
            Self::AlreadyParked(_) => "ALREADY_PARKED",
            Self::NoActiveSession(_) => "NO_ACTIVE_SESSION",
            Self::NoSlotsAvailable => "NO_SLOTS_AVAILABLE",
            Self::InvalidCode(_) => "INVALID_CODE",
            Self::HasActiveSession(_) => "HAS_ACTIVE_SESSION",
            Self::AlreadyActive(_) => "ALREADY_ACTIVE",
            Self::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the failure came from the storage layer rather than a business rule.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(DomainError::NoSlotsAvailable.kind(), "NO_SLOTS_AVAILABLE");
        assert_eq!(
            DomainError::AlreadyParked("KA-01".into()).kind(),
            "ALREADY_PARKED"
        );
        assert_eq!(
            DomainError::not_found("Vehicle", "id", 7).kind(),
            "NOT_FOUND"
        );
        assert_eq!(
            DomainError::from(ScanCodeError::Empty).kind(),
            "INVALID_CODE"
        );
    }

    #[test]
    fn not_found_message_names_the_lookup() {
        let err = DomainError::not_found("Slot", "id", 3);
        assert_eq!(err.to_string(), "Not found: Slot with id=3");
    }

    #[test]
    fn only_storage_errors_are_infrastructure() {
        assert!(DomainError::Storage("disk I/O".into()).is_infrastructure());
        assert!(!DomainError::NoSlotsAvailable.is_infrastructure());
    }
}
