//! Parking session domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occupancy interval of a slot by a vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSession {
    pub id: i32,
    /// Registry id at entry time; cleared if the vehicle is later deleted
    pub vehicle_id: Option<i32>,
    pub vehicle_no: String,
    pub slot_id: i32,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub fee: Option<f64>,
    pub status: SessionStatus,
}

impl ParkingSession {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// active → completed. Terminal; a completed session is never reopened.
    pub fn complete(
        &mut self,
        exit_time: DateTime<Utc>,
        duration_minutes: i64,
        fee: f64,
    ) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::AlreadyCompleted(self.id));
        }
        self.exit_time = Some(exit_time);
        self.duration_minutes = Some(duration_minutes);
        self.fee = Some(fee);
        self.status = SessionStatus::Completed;
        Ok(())
    }
}

/// Session about to be opened
#[derive(Debug, Clone)]
pub struct NewSession {
    pub vehicle_id: Option<i32>,
    pub vehicle_no: String,
    pub slot_id: i32,
    pub entry_time: DateTime<Utc>,
}

/// Session joined with the owner name and slot label, for logs and export
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: i32,
    pub vehicle_name: Option<String>,
    pub vehicle_no: String,
    pub slot_id: i32,
    pub slot_number: Option<String>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub fee: Option<f64>,
    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn active_session() -> ParkingSession {
        ParkingSession {
            id: 1,
            vehicle_id: Some(1),
            vehicle_no: "KA-01-1234".into(),
            slot_id: 3,
            entry_time: Utc::now(),
            exit_time: None,
            duration_minutes: None,
            fee: None,
            status: SessionStatus::Active,
        }
    }

    #[test]
    fn complete_records_exit_details() {
        let mut session = active_session();
        let exit = session.entry_time + Duration::minutes(45);
        session.complete(exit, 45, 30.0).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.exit_time, Some(exit));
        assert_eq!(session.duration_minutes, Some(45));
        assert_eq!(session.fee, Some(30.0));
        assert!(!session.is_active());
    }

    #[test]
    fn completing_twice_fails() {
        let mut session = active_session();
        session.complete(Utc::now(), 1, 20.0).unwrap();
        let err = session.complete(Utc::now(), 2, 20.0).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCompleted(1)));
        assert_eq!(session.duration_minutes, Some(1));
    }
}
