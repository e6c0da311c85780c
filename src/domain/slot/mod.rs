//! Slot aggregate
//!
//! The fixed pool of numbered parking spaces.

pub mod model;
pub mod repository;

pub use model::{slot_label, Slot, SlotCounts, SlotStatus};
pub use repository::SlotRepository;
