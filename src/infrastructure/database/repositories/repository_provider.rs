//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::{
    db_err, SeaOrmGateScope, SeaOrmSessionRepository, SeaOrmSlotRepository,
    SeaOrmVehicleRepository,
};
use crate::domain::session::SessionRepository;
use crate::domain::slot::SlotRepository;
use crate::domain::vehicle::VehicleRepository;
use crate::domain::{DomainResult, GateScope, RepositoryProvider};

/// Holds all SeaORM repositories over one shared connection pool.
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    vehicles: SeaOrmVehicleRepository,
    slots: SeaOrmSlotRepository,
    sessions: SeaOrmSessionRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            vehicles: SeaOrmVehicleRepository::new(db.clone()),
            slots: SeaOrmSlotRepository::new(db.clone()),
            sessions: SeaOrmSessionRepository::new(db.clone()),
            db,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }

    async fn begin(&self) -> DomainResult<Box<dyn GateScope>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmGateScope::new(txn)))
    }
}
