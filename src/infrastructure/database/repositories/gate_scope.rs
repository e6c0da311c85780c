//! Transaction-bound repositories
//!
//! One `DatabaseTransaction` backs all three repositories, so an entry or
//! exit either lands completely or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseTransaction;

use super::{db_err, session_repository, slot_repository, vehicle_repository};
use crate::domain::session::{NewSession, ParkingSession, SessionRecord, SessionRepository};
use crate::domain::slot::{Slot, SlotCounts, SlotRepository};
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleRepository};
use crate::domain::{DomainResult, GateScope};

/// Rolls back on drop unless committed
pub struct SeaOrmGateScope {
    txn: DatabaseTransaction,
}

impl SeaOrmGateScope {
    pub fn new(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl GateScope for SeaOrmGateScope {
    fn vehicles(&self) -> &dyn VehicleRepository {
        self
    }

    fn slots(&self) -> &dyn SlotRepository {
        self
    }

    fn sessions(&self) -> &dyn SessionRepository {
        self
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let scope = *self;
        scope.txn.commit().await.map_err(db_err)
    }
}

#[async_trait]
impl VehicleRepository for SeaOrmGateScope {
    async fn insert(&self, vehicle: NewVehicle) -> DomainResult<Vehicle> {
        vehicle_repository::insert(&self.txn, vehicle).await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>> {
        vehicle_repository::find_by_id(&self.txn, id).await
    }

    async fn find_by_vehicle_no(&self, vehicle_no: &str) -> DomainResult<Option<Vehicle>> {
        vehicle_repository::find_by_vehicle_no(&self.txn, vehicle_no).await
    }

    async fn issued_code_exists(&self, issued_code: &str) -> DomainResult<bool> {
        vehicle_repository::issued_code_exists(&self.txn, issued_code).await
    }

    async fn list(&self) -> DomainResult<Vec<Vehicle>> {
        vehicle_repository::list(&self.txn).await
    }

    async fn count(&self) -> DomainResult<u64> {
        vehicle_repository::count(&self.txn).await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        vehicle_repository::delete(&self.txn, id).await
    }
}

#[async_trait]
impl SlotRepository for SeaOrmGateScope {
    async fn initialize(&self, count: u32, prefix: &str) -> DomainResult<u64> {
        slot_repository::initialize(&self.txn, count, prefix).await
    }

    async fn allocate(&self, vehicle_no: &str, entry_time: DateTime<Utc>) -> DomainResult<Slot> {
        slot_repository::allocate(&self.txn, vehicle_no, entry_time).await
    }

    async fn release(&self, slot_id: i32) -> DomainResult<Slot> {
        slot_repository::release(&self.txn, slot_id).await
    }

    async fn find_by_id(&self, slot_id: i32) -> DomainResult<Option<Slot>> {
        slot_repository::find_by_id(&self.txn, slot_id).await
    }

    async fn list(&self) -> DomainResult<Vec<Slot>> {
        slot_repository::list(&self.txn).await
    }

    async fn counts(&self) -> DomainResult<SlotCounts> {
        slot_repository::counts(&self.txn).await
    }
}

#[async_trait]
impl SessionRepository for SeaOrmGateScope {
    async fn open(&self, session: NewSession) -> DomainResult<ParkingSession> {
        session_repository::open(&self.txn, session).await
    }

    async fn close(
        &self,
        session_id: i32,
        exit_time: DateTime<Utc>,
        duration_minutes: i64,
        fee: f64,
    ) -> DomainResult<ParkingSession> {
        session_repository::close(&self.txn, session_id, exit_time, duration_minutes, fee).await
    }

    async fn find_active_by_vehicle(&self, vehicle_no: &str) -> DomainResult<Option<ParkingSession>> {
        session_repository::find_active_by_vehicle(&self.txn, vehicle_no).await
    }

    async fn recent(&self, limit: u64) -> DomainResult<Vec<SessionRecord>> {
        session_repository::recent(&self.txn, limit).await
    }

    async fn all_records(&self) -> DomainResult<Vec<SessionRecord>> {
        session_repository::all_records(&self.txn).await
    }

    async fn count_active(&self) -> DomainResult<u64> {
        session_repository::count_active(&self.txn).await
    }

    async fn completed_revenue(
        &self,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DomainResult<f64> {
        session_repository::completed_revenue(&self.txn, window).await
    }
}
