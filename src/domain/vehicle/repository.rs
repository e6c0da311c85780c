//! Vehicle repository interface

use async_trait::async_trait;

use super::model::{NewVehicle, Vehicle};
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Fails with `DuplicateVehicle` when the plate is already registered.
    async fn insert(&self, vehicle: NewVehicle) -> DomainResult<Vehicle>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>>;
    async fn find_by_vehicle_no(&self, vehicle_no: &str) -> DomainResult<Option<Vehicle>>;
    async fn issued_code_exists(&self, issued_code: &str) -> DomainResult<bool>;
    /// Newest registrations first
    async fn list(&self) -> DomainResult<Vec<Vehicle>>;
    async fn count(&self) -> DomainResult<u64>;
    /// Fails with `NotFound` when no row was removed.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
