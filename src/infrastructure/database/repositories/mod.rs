//! SeaORM repository implementations
//!
//! Each repository module exposes its queries as functions generic over
//! [`ConnectionTrait`](sea_orm::ConnectionTrait), so the same code runs on the
//! pool (`SeaOrm*Repository`) and inside a transaction (`SeaOrmGateScope`).

mod gate_scope;
mod repository_provider;
mod session_repository;
mod slot_repository;
mod vehicle_repository;

pub use gate_scope::SeaOrmGateScope;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use session_repository::SeaOrmSessionRepository;
pub use slot_repository::SeaOrmSlotRepository;
pub use vehicle_repository::SeaOrmVehicleRepository;

use crate::domain::DomainError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}
