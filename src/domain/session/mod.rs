//! Parking session aggregate
//!
//! The append-only ledger of entry → exit intervals.

pub mod model;
pub mod repository;

pub use model::{NewSession, ParkingSession, SessionRecord, SessionStatus};
pub use repository::SessionRepository;
