//! Repository access for the domain layer
//!
//! - `RepositoryProvider`: pooled per-aggregate repositories plus `begin()`
//! - `GateScope`: the same repositories bound to one storage transaction

use async_trait::async_trait;

use super::session::SessionRepository;
use super::slot::SlotRepository;
use super::vehicle::VehicleRepository;
use crate::domain::DomainResult;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) -> DomainResult<()> {
///     let scope = repos.begin().await?;
///     let slot = scope.slots().allocate("KA-01-1234", Utc::now()).await?;
///     scope.commit().await
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn slots(&self) -> &dyn SlotRepository;
    fn sessions(&self) -> &dyn SessionRepository;

    /// Open a unit of work. Everything done through the returned scope is
    /// applied on [`GateScope::commit`] and discarded if the scope is dropped.
    async fn begin(&self) -> DomainResult<Box<dyn GateScope>>;
}

#[async_trait]
pub trait GateScope: Send + Sync {
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn slots(&self) -> &dyn SlotRepository;
    fn sessions(&self) -> &dyn SessionRepository;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
