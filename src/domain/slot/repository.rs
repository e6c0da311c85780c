//! Slot repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Slot, SlotCounts};
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Seed `count` slots labelled `<prefix>-001…` only when the pool is
    /// empty. Returns the number of slots created (0 when already seeded).
    async fn initialize(&self, count: u32, prefix: &str) -> DomainResult<u64>;

    /// Take the lowest-numbered available slot and stamp it occupied by
    /// `vehicle_no` at `entry_time`. Fails with `NoSlotsAvailable`.
    async fn allocate(&self, vehicle_no: &str, entry_time: DateTime<Utc>) -> DomainResult<Slot>;

    /// Mark a slot available again. Fails with `NotFound` or `InvalidState`.
    async fn release(&self, slot_id: i32) -> DomainResult<Slot>;

    async fn find_by_id(&self, slot_id: i32) -> DomainResult<Option<Slot>>;

    /// All slots ordered by slot number
    async fn list(&self) -> DomainResult<Vec<Slot>>;

    async fn counts(&self) -> DomainResult<SlotCounts>;
}
