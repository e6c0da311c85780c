//! Session log DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::SessionRecord;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// Number of sessions to return (default 100, max 1000)
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionLogDto {
    pub id: i32,
    /// Owner name, absent once the vehicle has been deleted
    pub name: Option<String>,
    pub vehicle_no: String,
    pub slot_number: Option<String>,
    pub entry_time: String,
    pub exit_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub fee: Option<f64>,
    pub status: String,
}

impl From<SessionRecord> for SessionLogDto {
    fn from(r: SessionRecord) -> Self {
        Self {
            id: r.id,
            name: r.vehicle_name,
            vehicle_no: r.vehicle_no,
            slot_number: r.slot_number,
            entry_time: r.entry_time.to_rfc3339(),
            exit_time: r.exit_time.map(|t| t.to_rfc3339()),
            duration_minutes: r.duration_minutes,
            fee: r.fee,
            status: r.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionLogListResponse {
    pub logs: Vec<SessionLogDto>,
}
