//! Database entities module

pub mod parking_session;
pub mod slot;
pub mod vehicle;

pub use parking_session::Entity as ParkingSession;
pub use slot::Entity as Slot;
pub use vehicle::Entity as Vehicle;
