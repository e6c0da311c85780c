//! Interfaces layer - external APIs

pub mod http;

pub use http::{create_api_router, ApiDoc, ApiState};
