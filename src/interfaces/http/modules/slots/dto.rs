//! Slot DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::SlotOverview;
use crate::domain::{Slot, SlotCounts};

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    pub id: i32,
    pub slot_number: String,
    /// `available` or `occupied`
    pub status: String,
    pub vehicle_no: Option<String>,
    pub entry_time: Option<String>,
}

impl From<Slot> for SlotDto {
    fn from(s: Slot) -> Self {
        Self {
            id: s.id,
            slot_number: s.slot_number,
            status: s.status.to_string(),
            vehicle_no: s.vehicle_no,
            entry_time: s.entry_time.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotStatsDto {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
}

impl From<SlotCounts> for SlotStatsDto {
    fn from(c: SlotCounts) -> Self {
        Self {
            total: c.total,
            available: c.available,
            occupied: c.occupied,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotListResponse {
    pub slots: Vec<SlotDto>,
    pub stats: SlotStatsDto,
}

impl From<SlotOverview> for SlotListResponse {
    fn from(o: SlotOverview) -> Self {
        Self {
            slots: o.slots.into_iter().map(SlotDto::from).collect(),
            stats: o.stats.into(),
        }
    }
}
