//! Gate DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{EntryReceipt, ExitReceipt};

/// Raw string read by the gate scanner
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    #[serde(default)]
    pub qr_data: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntryResponse {
    pub message: String,
    pub session_id: i32,
    pub vehicle_no: String,
    pub slot_number: String,
    pub entry_time: String,
}

impl From<EntryReceipt> for EntryResponse {
    fn from(r: EntryReceipt) -> Self {
        Self {
            message: format!("Entry recorded. Please park at {}", r.slot_number),
            session_id: r.session_id,
            vehicle_no: r.vehicle_no,
            slot_number: r.slot_number,
            entry_time: r.entry_time.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExitResponse {
    pub message: String,
    pub session_id: i32,
    pub vehicle_no: String,
    pub slot_number: String,
    pub entry_time: String,
    pub exit_time: String,
    pub duration_minutes: i64,
    pub fee: f64,
}

impl From<ExitReceipt> for ExitResponse {
    fn from(r: ExitReceipt) -> Self {
        Self {
            message: format!("Exit recorded. Amount due: {:.2}", r.fee),
            session_id: r.session_id,
            vehicle_no: r.vehicle_no,
            slot_number: r.slot_number,
            entry_time: r.entry_time.to_rfc3339(),
            exit_time: r.exit_time.to_rfc3339(),
            duration_minutes: r.duration_minutes,
            fee: r.fee,
        }
    }
}
