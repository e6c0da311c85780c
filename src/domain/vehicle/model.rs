//! Vehicle domain entity

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Registered vehicle. Immutable once created; only deletion is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i32,
    /// Owner name
    pub name: String,
    /// Licence plate, unique across the registry
    pub vehicle_no: String,
    /// Opaque code bound to the vehicle at registration, unique
    pub issued_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Vehicle about to be inserted (id assigned by storage)
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub name: String,
    pub vehicle_no: String,
    pub issued_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Derive an issued code from the plate and registration instant.
///
/// `attempt` salts the digest so a caller can regenerate after a collision.
pub fn issue_code(vehicle_no: &str, issued_at: DateTime<Utc>, attempt: u32, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(vehicle_no.as_bytes());
    hasher.update(b":");
    hasher.update(
        issued_at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| issued_at.timestamp_micros())
            .to_be_bytes(),
    );
    hasher.update(b":");
    hasher.update(attempt.to_be_bytes());

    let mut code = hex::encode_upper(hasher.finalize());
    code.truncate(length);
    code
}
