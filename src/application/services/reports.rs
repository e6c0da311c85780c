//! Read-side reporting: slot overview, session logs, statistics and export

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{DomainResult, RepositoryProvider, SessionRecord, Slot, SlotCounts};
use crate::shared::validate_limit;

pub const DEFAULT_LOG_LIMIT: u64 = 100;
pub const MAX_LOG_LIMIT: u64 = 1000;

/// Every slot plus pool counts
#[derive(Debug, Clone)]
pub struct SlotOverview {
    pub slots: Vec<Slot>,
    pub stats: SlotCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingStats {
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub active_sessions: u64,
    pub total_vehicles: u64,
    pub available_slots: u64,
}

pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
}

/// `[midnight, next midnight)` of the UTC day containing `now`
fn utc_day(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .unwrap_or(now);
    (start, start + Duration::days(1))
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_slots(&self) -> DomainResult<SlotOverview> {
        let slots = self.repos.slots().list().await?;
        let stats = self.repos.slots().counts().await?;
        Ok(SlotOverview { slots, stats })
    }

    /// Latest sessions first; `limit` defaults to 100 and is clamped to 1..=1000.
    pub async fn recent_sessions(&self, limit: Option<u64>) -> DomainResult<Vec<SessionRecord>> {
        let limit = validate_limit(limit, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT);
        self.repos.sessions().recent(limit).await
    }

    pub async fn stats(&self) -> DomainResult<ParkingStats> {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> DomainResult<ParkingStats> {
        let sessions = self.repos.sessions();
        Ok(ParkingStats {
            total_revenue: sessions.completed_revenue(None).await?,
            today_revenue: sessions.completed_revenue(Some(utc_day(now))).await?,
            active_sessions: sessions.count_active().await?,
            total_vehicles: self.repos.vehicles().count().await?,
            available_slots: self.repos.slots().counts().await?.available,
        })
    }

    /// All sessions as rows for tabular export
    pub async fn export_sessions(&self) -> DomainResult<Vec<SessionRecord>> {
        self.repos.sessions().all_records().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{harness, vehicle};
    use crate::domain::SessionStatus;

    #[test]
    fn utc_day_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        let (start, end) = utc_day(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn slot_overview_counts() {
        let h = harness(4).await;
        let code = h.registry.register(vehicle("A", "P-1")).await.unwrap().scan_payload;
        h.gate.enter(&code).await.unwrap();

        let overview = h.reports.list_slots().await.unwrap();
        assert_eq!(overview.slots.len(), 4);
        assert_eq!(overview.slots[0].vehicle_no.as_deref(), Some("P-1"));
        assert_eq!(overview.stats.total, 4);
        assert_eq!(overview.stats.available, 3);
        assert_eq!(overview.stats.occupied, 1);
    }

    #[tokio::test]
    async fn stats_split_today_from_total() {
        let h = harness(5).await;
        let day1 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();

        let a = h.registry.register(vehicle("A", "P-1")).await.unwrap().scan_payload;
        let b = h.registry.register(vehicle("B", "P-2")).await.unwrap().scan_payload;
        let c = h.registry.register(vehicle("C", "P-3")).await.unwrap().scan_payload;

        h.gate.enter_at(&a, day1).await.unwrap();
        h.gate.exit_at(&a, day1 + Duration::minutes(45)).await.unwrap();
        h.gate.enter_at(&b, day2).await.unwrap();
        h.gate.exit_at(&b, day2 + Duration::minutes(61)).await.unwrap();
        h.gate.enter_at(&c, day2).await.unwrap();

        let stats = h.reports.stats_at(day2 + Duration::hours(3)).await.unwrap();
        assert_eq!(
            stats,
            ParkingStats {
                total_revenue: 70.0,
                today_revenue: 40.0,
                active_sessions: 1,
                total_vehicles: 3,
                available_slots: 4,
            }
        );
    }

    #[tokio::test]
    async fn recent_sessions_respects_limit() {
        let h = harness(5).await;
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        for i in 0..3 {
            let code = h
                .registry
                .register(vehicle("Driver", &format!("P-{i}")))
                .await
                .unwrap()
                .scan_payload;
            h.gate.enter_at(&code, t + Duration::minutes(i)).await.unwrap();
        }

        let latest = h.reports.recent_sessions(Some(2)).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].vehicle_no, "P-2");
        assert_eq!(latest[1].vehicle_no, "P-1");

        assert_eq!(h.reports.recent_sessions(None).await.unwrap().len(), 3);
        assert_eq!(h.reports.recent_sessions(Some(0)).await.unwrap().len(), 1);

        let exported = h.reports.export_sessions().await.unwrap();
        assert_eq!(exported.len(), 3);
        assert!(exported.iter().all(|r| r.status == SessionStatus::Active));
    }
}
