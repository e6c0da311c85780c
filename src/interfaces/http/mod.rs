//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, `ValidatedJson`
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router and OpenAPI document

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiState};
