//! Domain layer: parking entities, pricing, scan-code format and the
//! repository ports the application layer is written against.

pub mod fee;
pub mod repositories;
pub mod scan_code;
pub mod session;
pub mod slot;
pub mod vehicle;

pub use fee::{elapsed_minutes, fee_cents, FeeSchedule};
pub use repositories::{GateScope, RepositoryProvider};
pub use scan_code::{ScanCode, ScanCodeError, DEFAULT_CODE_PREFIX};
pub use session::{NewSession, ParkingSession, SessionRecord, SessionRepository, SessionStatus};
pub use slot::{Slot, SlotCounts, SlotRepository, SlotStatus};
pub use vehicle::{NewVehicle, Vehicle, VehicleRepository};

pub use crate::shared::errors::{DomainError, DomainResult};
