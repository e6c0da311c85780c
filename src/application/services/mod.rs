//! Application services

mod gate;
mod registry;
mod reports;

pub use gate::{EntryReceipt, ExitReceipt, GateController};
pub use registry::{RegisterVehicle, Registration, VehicleRegistryService};
pub use reports::{ParkingStats, ReportService, SlotOverview};
