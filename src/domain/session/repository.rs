//! Parking session repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewSession, ParkingSession, SessionRecord};
use crate::domain::DomainResult;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open an active session. Re-validates the one-active-session-per-vehicle
    /// invariant and fails with `AlreadyActive` when it would be broken.
    async fn open(&self, session: NewSession) -> DomainResult<ParkingSession>;

    /// Complete a session. Fails with `NotFound` or `AlreadyCompleted`.
    async fn close(
        &self,
        session_id: i32,
        exit_time: DateTime<Utc>,
        duration_minutes: i64,
        fee: f64,
    ) -> DomainResult<ParkingSession>;

    async fn find_active_by_vehicle(&self, vehicle_no: &str) -> DomainResult<Option<ParkingSession>>;

    /// Latest sessions first, joined with owner name and slot label.
    async fn recent(&self, limit: u64) -> DomainResult<Vec<SessionRecord>>;

    /// Every session, latest first, joined like [`recent`](Self::recent).
    async fn all_records(&self) -> DomainResult<Vec<SessionRecord>>;

    async fn count_active(&self) -> DomainResult<u64>;

    /// Sum of fees of completed sessions, optionally restricted to exits in
    /// `[from, to)`.
    async fn completed_revenue(
        &self,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DomainResult<f64>;
}
