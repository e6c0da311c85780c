//! Statistics DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::ParkingStats;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsDto {
    pub total_revenue: f64,
    /// Fees of sessions that exited during the current UTC day
    pub today_revenue: f64,
    pub active_sessions: u64,
    pub total_vehicles: u64,
    pub available_slots: u64,
}

impl From<ParkingStats> for StatsDto {
    fn from(s: ParkingStats) -> Self {
        Self {
            total_revenue: s.total_revenue,
            today_revenue: s.today_revenue,
            active_sessions: s.active_sessions,
            total_vehicles: s.total_vehicles,
            available_slots: s.available_slots,
        }
    }
}
