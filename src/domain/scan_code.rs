//! Scannable gate code
//!
//! Format: `<PREFIX>:<vehicle_no>:<issued-at unix timestamp>`. Only the
//! prefix and the vehicle number are required; anything after the second
//! separator is carried along but never interpreted.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub const DEFAULT_CODE_PREFIX: &str = "PARKING";

const SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanCodeError {
    #[error("scan code is empty")]
    Empty,
    #[error("unrecognised prefix '{0}'")]
    UnknownPrefix(String),
    #[error("scan code carries no vehicle number")]
    MissingVehicle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCode {
    vehicle_no: String,
    issued_at: Option<String>,
}

impl ScanCode {
    pub fn parse(raw: &str, prefix: &str) -> Result<Self, ScanCodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScanCodeError::Empty);
        }

        let mut fields = raw.splitn(3, SEPARATOR);
        let tag = fields.next().unwrap_or_default();
        if tag != prefix {
            return Err(ScanCodeError::UnknownPrefix(tag.to_string()));
        }

        let vehicle_no = fields
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ScanCodeError::MissingVehicle)?;

        Ok(Self {
            vehicle_no: vehicle_no.to_string(),
            issued_at: fields.next().map(str::to_string),
        })
    }

    /// Build the payload handed to the external code renderer at registration.
    pub fn payload(prefix: &str, vehicle_no: &str, issued_at: DateTime<Utc>) -> String {
        format!(
            "{prefix}{SEPARATOR}{vehicle_no}{SEPARATOR}{}.{:06}",
            issued_at.timestamp(),
            issued_at.timestamp_subsec_micros()
        )
    }

    /// Vehicle numbers may not contain the field separator.
    pub fn is_encodable(vehicle_no: &str) -> bool {
        !vehicle_no.contains(SEPARATOR)
    }

    pub fn vehicle_no(&self) -> &str {
        &self.vehicle_no
    }

    pub fn issued_at(&self) -> Option<&str> {
        self.issued_at.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_full_payload() {
        let code = ScanCode::parse("PARKING:KA-01-1234:1700000000.123456", "PARKING").unwrap();
        assert_eq!(code.vehicle_no(), "KA-01-1234");
        assert_eq!(code.issued_at(), Some("1700000000.123456"));
    }

    #[test]
    fn timestamp_is_optional() {
        let code = ScanCode::parse("  PARKING:MH-12-0001 ", "PARKING").unwrap();
        assert_eq!(code.vehicle_no(), "MH-12-0001");
        assert_eq!(code.issued_at(), None);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(ScanCode::parse("", "PARKING"), Err(ScanCodeError::Empty));
        assert_eq!(ScanCode::parse("   ", "PARKING"), Err(ScanCodeError::Empty));
        assert_eq!(
            ScanCode::parse("TICKET:KA-01:1", "PARKING"),
            Err(ScanCodeError::UnknownPrefix("TICKET".into()))
        );
        assert_eq!(
            ScanCode::parse("KA-01-1234", "PARKING"),
            Err(ScanCodeError::UnknownPrefix("KA-01-1234".into()))
        );
        assert_eq!(
            ScanCode::parse("PARKING", "PARKING"),
            Err(ScanCodeError::MissingVehicle)
        );
        assert_eq!(
            ScanCode::parse("PARKING::1700000000", "PARKING"),
            Err(ScanCodeError::MissingVehicle)
        );
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert!(ScanCode::parse("parking:KA-01", "PARKING").is_err());
    }

    #[test]
    fn payload_parses_back_to_the_same_vehicle() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let payload = ScanCode::payload("PARKING", "KA-01-1234", at);
        assert_eq!(payload, "PARKING:KA-01-1234:1709285400.000000");
        let code = ScanCode::parse(&payload, "PARKING").unwrap();
        assert_eq!(code.vehicle_no(), "KA-01-1234");
    }

    #[test]
    fn separator_is_not_encodable() {
        assert!(ScanCode::is_encodable("KA-01-1234"));
        assert!(!ScanCode::is_encodable("KA:01"));
    }
}
