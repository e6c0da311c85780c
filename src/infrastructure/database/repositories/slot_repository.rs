//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::slot::{slot_label, Slot, SlotCounts, SlotRepository, SlotStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::slot;

/// Rows per INSERT when seeding, well under SQLite's bound-parameter limit
const SEED_CHUNK: u32 = 100;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn status_from_db(s: slot::SlotStatus) -> SlotStatus {
    match s {
        slot::SlotStatus::Available => SlotStatus::Available,
        slot::SlotStatus::Occupied => SlotStatus::Occupied,
    }
}

fn status_to_db(s: SlotStatus) -> slot::SlotStatus {
    match s {
        SlotStatus::Available => slot::SlotStatus::Available,
        SlotStatus::Occupied => slot::SlotStatus::Occupied,
    }
}

fn model_to_domain(m: slot::Model) -> Slot {
    Slot {
        id: m.id,
        slot_number: m.slot_number,
        status: status_from_db(m.status),
        vehicle_no: m.vehicle_no,
        entry_time: m.entry_time,
    }
}

pub(crate) async fn initialize<C: ConnectionTrait>(
    conn: &C,
    count: u32,
    prefix: &str,
) -> DomainResult<u64> {
    let existing = slot::Entity::find().count(conn).await.map_err(db_err)?;
    if existing > 0 {
        debug!("Slot pool already seeded with {} slots", existing);
        return Ok(0);
    }

    let mut start = 1;
    while start <= count {
        let end = count.min(start + SEED_CHUNK - 1);
        let batch = (start..=end).map(|i| slot::ActiveModel {
            slot_number: Set(slot_label(prefix, i, count)),
            status: Set(slot::SlotStatus::Available),
            vehicle_no: Set(None),
            entry_time: Set(None),
            ..Default::default()
        });
        slot::Entity::insert_many(batch)
            .exec(conn)
            .await
            .map_err(db_err)?;
        start = end + 1;
    }

    Ok(u64::from(count))
}

/// Claim the first free slot. The UPDATE is conditional on the slot still
/// being available, so two allocators can never both win the same row.
pub(crate) async fn allocate<C: ConnectionTrait>(
    conn: &C,
    vehicle_no: &str,
    entry_time: DateTime<Utc>,
) -> DomainResult<Slot> {
    let candidate = slot::Entity::find()
        .filter(slot::Column::Status.eq(slot::SlotStatus::Available))
        .order_by_asc(slot::Column::SlotNumber)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(DomainError::NoSlotsAvailable)?;

    let result = slot::Entity::update_many()
        .col_expr(slot::Column::Status, Expr::value(slot::SlotStatus::Occupied))
        .col_expr(slot::Column::VehicleNo, Expr::value(vehicle_no))
        .col_expr(slot::Column::EntryTime, Expr::value(entry_time))
        .filter(slot::Column::Id.eq(candidate.id))
        .filter(slot::Column::Status.eq(slot::SlotStatus::Available))
        .exec(conn)
        .await
        .map_err(db_err)?;

    if result.rows_affected != 1 {
        return Err(DomainError::InvalidState(format!(
            "slot {} was taken concurrently",
            candidate.slot_number
        )));
    }

    debug!("Allocated {} to {}", candidate.slot_number, vehicle_no);
    let mut allocated = model_to_domain(candidate);
    allocated.occupy(vehicle_no, entry_time)?;
    Ok(allocated)
}

pub(crate) async fn release<C: ConnectionTrait>(conn: &C, slot_id: i32) -> DomainResult<Slot> {
    let model = slot::Entity::find_by_id(slot_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Slot", "id", slot_id))?;

    let mut released = model_to_domain(model.clone());
    released.release()?;

    let mut active: slot::ActiveModel = model.into();
    active.status = Set(status_to_db(released.status));
    active.vehicle_no = Set(None);
    active.entry_time = Set(None);
    active.update(conn).await.map_err(db_err)?;

    debug!("Released {}", released.slot_number);
    Ok(released)
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, slot_id: i32) -> DomainResult<Option<Slot>> {
    let found = slot::Entity::find_by_id(slot_id)
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(found.map(model_to_domain))
}

pub(crate) async fn list<C: ConnectionTrait>(conn: &C) -> DomainResult<Vec<Slot>> {
    let rows = slot::Entity::find()
        .order_by_asc(slot::Column::SlotNumber)
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(model_to_domain).collect())
}

pub(crate) async fn counts<C: ConnectionTrait>(conn: &C) -> DomainResult<SlotCounts> {
    let total = slot::Entity::find().count(conn).await.map_err(db_err)?;
    let available = slot::Entity::find()
        .filter(slot::Column::Status.eq(slot::SlotStatus::Available))
        .count(conn)
        .await
        .map_err(db_err)?;
    Ok(SlotCounts {
        total,
        available,
        occupied: total.saturating_sub(available),
    })
}

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn initialize(&self, count: u32, prefix: &str) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let created = initialize(&txn, count, prefix).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(created)
    }

    async fn allocate(&self, vehicle_no: &str, entry_time: DateTime<Utc>) -> DomainResult<Slot> {
        allocate(&self.db, vehicle_no, entry_time).await
    }

    async fn release(&self, slot_id: i32) -> DomainResult<Slot> {
        release(&self.db, slot_id).await
    }

    async fn find_by_id(&self, slot_id: i32) -> DomainResult<Option<Slot>> {
        find_by_id(&self.db, slot_id).await
    }

    async fn list(&self) -> DomainResult<Vec<Slot>> {
        list(&self.db).await
    }

    async fn counts(&self) -> DomainResult<SlotCounts> {
        counts(&self.db).await
    }
}
