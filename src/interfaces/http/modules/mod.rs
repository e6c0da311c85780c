//! Per-resource HTTP modules (DTOs + handlers)

pub mod gate;
pub mod health;
pub mod metrics;
pub mod sessions;
pub mod slots;
pub mod stats;
pub mod vehicles;
