//! Slot domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Occupied,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single physical parking space
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: i32,
    /// Stable label such as `SLOT-001`
    pub slot_number: String,
    pub status: SlotStatus,
    pub vehicle_no: Option<String>,
    pub entry_time: Option<DateTime<Utc>>,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// available → occupied
    pub fn occupy(&mut self, vehicle_no: &str, entry_time: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_available() {
            return Err(DomainError::InvalidState(format!(
                "slot {} is already occupied",
                self.slot_number
            )));
        }
        self.status = SlotStatus::Occupied;
        self.vehicle_no = Some(vehicle_no.to_string());
        self.entry_time = Some(entry_time);
        Ok(())
    }

    /// occupied → available, clearing the vehicle linkage
    pub fn release(&mut self) -> DomainResult<()> {
        if self.is_available() {
            return Err(DomainError::InvalidState(format!(
                "slot {} is already available",
                self.slot_number
            )));
        }
        self.status = SlotStatus::Available;
        self.vehicle_no = None;
        self.entry_time = None;
        Ok(())
    }
}

/// Occupancy summary of the pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounts {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
}

/// Zero-padded slot label; padding widens for pools above 999 slots so
/// lexical order keeps matching numeric order.
pub fn slot_label(prefix: &str, index: u32, pool_size: u32) -> String {
    let width = pool_size.to_string().len().max(3);
    format!("{prefix}-{index:0width$}")
}
