//! Vehicle aggregate
//!
//! Registered vehicles, their owner details and the issued gate code.

pub mod model;
pub mod repository;

pub use model::{issue_code, NewVehicle, Vehicle};
pub use repository::VehicleRepository;
