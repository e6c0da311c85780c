//! # Parking Manager
//!
//! Single-site parking service: vehicle registration with scannable codes,
//! gate entry/exit with slot allocation and fee calculation, and
//! session history and occupancy reporting over a REST API.
//!
//! ## Architecture
//!
//! - **domain**: Core entities, fee rules, scan codes and repository traits
//! - **application**: Registry, gate and reporting services
//! - **infrastructure**: SeaORM storage (SQLite) and migrations
//! - **interfaces**: REST API with OpenAPI document, health and metrics
//! - **server**: Runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use domain::{DomainError, DomainResult};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::create_api_router;

pub use server::{init_tracing, ServerHandle, ServerOptions};
