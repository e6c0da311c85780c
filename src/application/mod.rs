//! Application layer: the services the HTTP interface and CLI call into.

pub mod services;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use services::{
    EntryReceipt, ExitReceipt, GateController, ParkingStats, RegisterVehicle, Registration,
    ReportService, SlotOverview, VehicleRegistryService,
};

/// Serializes gate transactions (entry, exit) and vehicle deletion.
pub type GateLock = Arc<Mutex<()>>;

pub fn new_gate_lock() -> GateLock {
    Arc::new(Mutex::new(()))
}
