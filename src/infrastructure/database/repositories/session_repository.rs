//! SeaORM implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set,
};

use super::db_err;
use crate::domain::session::{
    NewSession, ParkingSession, SessionRecord, SessionRepository, SessionStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{parking_session, slot, vehicle};

pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_from_db(s: parking_session::SessionStatus) -> SessionStatus {
    match s {
        parking_session::SessionStatus::Active => SessionStatus::Active,
        parking_session::SessionStatus::Completed => SessionStatus::Completed,
    }
}

fn status_to_db(s: SessionStatus) -> parking_session::SessionStatus {
    match s {
        SessionStatus::Active => parking_session::SessionStatus::Active,
        SessionStatus::Completed => parking_session::SessionStatus::Completed,
    }
}

fn model_to_domain(m: parking_session::Model) -> ParkingSession {
    ParkingSession {
        id: m.id,
        vehicle_id: m.vehicle_id,
        vehicle_no: m.vehicle_no,
        slot_id: m.slot_id,
        entry_time: m.entry_time,
        exit_time: m.exit_time,
        duration_minutes: m.duration_minutes,
        fee: m.fee,
        status: status_from_db(m.status),
    }
}

/// Session row joined with the owner name and slot label
#[derive(Debug, FromQueryResult)]
struct SessionRecordRow {
    id: i32,
    vehicle_name: Option<String>,
    vehicle_no: String,
    slot_id: i32,
    slot_number: Option<String>,
    entry_time: DateTime<Utc>,
    exit_time: Option<DateTime<Utc>>,
    duration_minutes: Option<i64>,
    fee: Option<f64>,
    status: String,
}

impl From<SessionRecordRow> for SessionRecord {
    fn from(row: SessionRecordRow) -> Self {
        let status = if row.status == SessionStatus::Completed.as_str() {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        };
        Self {
            id: row.id,
            vehicle_name: row.vehicle_name,
            vehicle_no: row.vehicle_no,
            slot_id: row.slot_id,
            slot_number: row.slot_number,
            entry_time: row.entry_time,
            exit_time: row.exit_time,
            duration_minutes: row.duration_minutes,
            fee: row.fee,
            status,
        }
    }
}

fn records_query() -> Select<parking_session::Entity> {
    use parking_session::Column;

    parking_session::Entity::find()
        .select_only()
        .columns([
            Column::Id,
            Column::VehicleNo,
            Column::SlotId,
            Column::EntryTime,
            Column::ExitTime,
            Column::DurationMinutes,
            Column::Fee,
            Column::Status,
        ])
        .column_as(vehicle::Column::Name, "vehicle_name")
        .column_as(slot::Column::SlotNumber, "slot_number")
        .join(JoinType::LeftJoin, parking_session::Relation::Vehicle.def())
        .join(JoinType::LeftJoin, parking_session::Relation::Slot.def())
        .order_by_desc(Column::EntryTime)
        .order_by_desc(Column::Id)
}

// ── Queries ─────────────────────────────────────────────────────

pub(crate) async fn find_active_by_vehicle<C: ConnectionTrait>(
    conn: &C,
    vehicle_no: &str,
) -> DomainResult<Option<ParkingSession>> {
    let found = parking_session::Entity::find()
        .filter(parking_session::Column::VehicleNo.eq(vehicle_no))
        .filter(parking_session::Column::Status.eq(parking_session::SessionStatus::Active))
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(found.map(model_to_domain))
}

pub(crate) async fn open<C: ConnectionTrait>(conn: &C, s: NewSession) -> DomainResult<ParkingSession> {
    if find_active_by_vehicle(conn, &s.vehicle_no).await?.is_some() {
        return Err(DomainError::AlreadyActive(s.vehicle_no));
    }

    debug!("Opening session for {} on slot {}", s.vehicle_no, s.slot_id);
    let model = parking_session::ActiveModel {
        vehicle_id: Set(s.vehicle_id),
        vehicle_no: Set(s.vehicle_no),
        slot_id: Set(s.slot_id),
        entry_time: Set(s.entry_time),
        exit_time: Set(None),
        duration_minutes: Set(None),
        fee: Set(None),
        status: Set(parking_session::SessionStatus::Active),
        ..Default::default()
    };
    let inserted = model.insert(conn).await.map_err(db_err)?;
    Ok(model_to_domain(inserted))
}

pub(crate) async fn close<C: ConnectionTrait>(
    conn: &C,
    session_id: i32,
    exit_time: DateTime<Utc>,
    duration_minutes: i64,
    fee: f64,
) -> DomainResult<ParkingSession> {
    let model = parking_session::Entity::find_by_id(session_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("ParkingSession", "id", session_id))?;

    let mut session = model_to_domain(model.clone());
    session.complete(exit_time, duration_minutes, fee)?;

    debug!("Closing session {} ({} min, fee {})", session_id, duration_minutes, fee);
    let mut active: parking_session::ActiveModel = model.into();
    active.exit_time = Set(session.exit_time);
    active.duration_minutes = Set(session.duration_minutes);
    active.fee = Set(session.fee);
    active.status = Set(status_to_db(session.status));
    active.update(conn).await.map_err(db_err)?;

    Ok(session)
}

pub(crate) async fn recent<C: ConnectionTrait>(conn: &C, limit: u64) -> DomainResult<Vec<SessionRecord>> {
    let rows = records_query()
        .limit(limit)
        .into_model::<SessionRecordRow>()
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(SessionRecord::from).collect())
}

pub(crate) async fn all_records<C: ConnectionTrait>(conn: &C) -> DomainResult<Vec<SessionRecord>> {
    let rows = records_query()
        .into_model::<SessionRecordRow>()
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(SessionRecord::from).collect())
}

pub(crate) async fn count_active<C: ConnectionTrait>(conn: &C) -> DomainResult<u64> {
    parking_session::Entity::find()
        .filter(parking_session::Column::Status.eq(parking_session::SessionStatus::Active))
        .count(conn)
        .await
        .map_err(db_err)
}

pub(crate) async fn completed_revenue<C: ConnectionTrait>(
    conn: &C,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> DomainResult<f64> {
    let mut query = parking_session::Entity::find()
        .select_only()
        .column(parking_session::Column::Fee)
        .filter(parking_session::Column::Status.eq(parking_session::SessionStatus::Completed));

    if let Some((from, to)) = window {
        query = query
            .filter(parking_session::Column::ExitTime.gte(from))
            .filter(parking_session::Column::ExitTime.lt(to));
    }

    let fees: Vec<Option<f64>> = query.into_tuple().all(conn).await.map_err(db_err)?;
    Ok(fees.into_iter().flatten().sum())
}

// ── SessionRepository impl ──────────────────────────────────────

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn open(&self, session: NewSession) -> DomainResult<ParkingSession> {
        open(&self.db, session).await
    }

    async fn close(
        &self,
        session_id: i32,
        exit_time: DateTime<Utc>,
        duration_minutes: i64,
        fee: f64,
    ) -> DomainResult<ParkingSession> {
        close(&self.db, session_id, exit_time, duration_minutes, fee).await
    }

    async fn find_active_by_vehicle(&self, vehicle_no: &str) -> DomainResult<Option<ParkingSession>> {
        find_active_by_vehicle(&self.db, vehicle_no).await
    }

    async fn recent(&self, limit: u64) -> DomainResult<Vec<SessionRecord>> {
        recent(&self.db, limit).await
    }

    async fn all_records(&self) -> DomainResult<Vec<SessionRecord>> {
        all_records(&self.db).await
    }

    async fn count_active(&self) -> DomainResult<u64> {
        count_active(&self.db).await
    }

    async fn completed_revenue(
        &self,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DomainResult<f64> {
        completed_revenue(&self.db, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::SlotRepository;
    use crate::domain::vehicle::{NewVehicle, VehicleRepository};
    use crate::infrastructure::database::repositories::{
        SeaOrmSlotRepository, SeaOrmVehicleRepository,
    };
    use crate::infrastructure::database::testing::memory_db;
    use chrono::{Duration, TimeZone};

    struct Fixture {
        sessions: SeaOrmSessionRepository,
        vehicles: SeaOrmVehicleRepository,
        slot_ids: Vec<i32>,
    }

    async fn fixture() -> Fixture {
        let db = memory_db().await;
        let slots = SeaOrmSlotRepository::new(db.clone());
        slots.initialize(3, "SLOT").await.unwrap();
        let slot_ids = slots.list().await.unwrap().into_iter().map(|s| s.id).collect();
        Fixture {
            sessions: SeaOrmSessionRepository::new(db.clone()),
            vehicles: SeaOrmVehicleRepository::new(db),
            slot_ids,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn new_session(vehicle_no: &str, slot_id: i32, entry_time: DateTime<Utc>) -> NewSession {
        NewSession {
            vehicle_id: None,
            vehicle_no: vehicle_no.into(),
            slot_id,
            entry_time,
        }
    }

    #[tokio::test]
    async fn open_then_close() {
        let f = fixture().await;
        let opened = f.sessions.open(new_session("A", f.slot_ids[0], t0())).await.unwrap();
        assert!(opened.is_active());
        assert_eq!(f.sessions.count_active().await.unwrap(), 1);

        let exit = t0() + Duration::minutes(45);
        let closed = f.sessions.close(opened.id, exit, 45, 30.0).await.unwrap();
        assert_eq!(closed.status, SessionStatus::Completed);
        assert_eq!(closed.fee, Some(30.0));
        assert!(f.sessions.find_active_by_vehicle("A").await.unwrap().is_none());
        assert_eq!(f.sessions.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_active_session_is_rejected() {
        let f = fixture().await;
        f.sessions.open(new_session("A", f.slot_ids[0], t0())).await.unwrap();
        let err = f
            .sessions
            .open(new_session("A", f.slot_ids[1], t0()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyActive(ref v) if v == "A"));
    }

    #[tokio::test]
    async fn closing_twice_is_rejected() {
        let f = fixture().await;
        let s = f.sessions.open(new_session("A", f.slot_ids[0], t0())).await.unwrap();
        f.sessions.close(s.id, t0(), 0, 20.0).await.unwrap();
        assert!(matches!(
            f.sessions.close(s.id, t0(), 0, 20.0).await,
            Err(DomainError::AlreadyCompleted(_))
        ));
        assert!(matches!(
            f.sessions.close(404, t0(), 0, 20.0).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn records_join_owner_and_slot_latest_first() {
        let f = fixture().await;
        let owner = f
            .vehicles
            .insert(NewVehicle {
                name: "Asha".into(),
                vehicle_no: "A".into(),
                issued_code: "C1".into(),
                phone: None,
                email: None,
                created_at: t0(),
            })
            .await
            .unwrap();

        let mut first = new_session("A", f.slot_ids[0], t0());
        first.vehicle_id = Some(owner.id);
        f.sessions.open(first).await.unwrap();
        f.sessions
            .open(new_session("B", f.slot_ids[1], t0() + Duration::minutes(5)))
            .await
            .unwrap();

        let records = f.sessions.all_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vehicle_no, "B");
        assert_eq!(records[0].vehicle_name, None);
        assert_eq!(records[0].slot_number.as_deref(), Some("SLOT-002"));
        assert_eq!(records[1].vehicle_name.as_deref(), Some("Asha"));
        assert_eq!(records[1].status, SessionStatus::Active);

        let limited = f.sessions.recent(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].vehicle_no, "B");
    }

    #[tokio::test]
    async fn deleting_owner_keeps_history() {
        let f = fixture().await;
        let owner = f
            .vehicles
            .insert(NewVehicle {
                name: "Asha".into(),
                vehicle_no: "A".into(),
                issued_code: "C1".into(),
                phone: None,
                email: None,
                created_at: t0(),
            })
            .await
            .unwrap();
        let mut s = new_session("A", f.slot_ids[0], t0());
        s.vehicle_id = Some(owner.id);
        let opened = f.sessions.open(s).await.unwrap();
        f.sessions.close(opened.id, t0(), 0, 20.0).await.unwrap();

        f.vehicles.delete(owner.id).await.unwrap();

        let records = f.sessions.all_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vehicle_no, "A");
        assert_eq!(records[0].vehicle_name, None);
    }

    #[tokio::test]
    async fn revenue_sums_completed_fees_in_window() {
        let f = fixture().await;
        let a = f.sessions.open(new_session("A", f.slot_ids[0], t0())).await.unwrap();
        let b = f.sessions.open(new_session("B", f.slot_ids[1], t0())).await.unwrap();
        f.sessions.open(new_session("C", f.slot_ids[2], t0())).await.unwrap();

        f.sessions.close(a.id, t0() + Duration::minutes(45), 45, 30.0).await.unwrap();
        f.sessions
            .close(b.id, t0() + Duration::days(1), 1440, 490.0)
            .await
            .unwrap();

        assert_eq!(f.sessions.completed_revenue(None).await.unwrap(), 520.0);

        let day_start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let window = Some((day_start, day_start + Duration::days(1)));
        assert_eq!(f.sessions.completed_revenue(window).await.unwrap(), 30.0);
    }
}
