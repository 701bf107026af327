//! MongoDB connector and utilities
//!
//! Connection management, Atlas credential handling and health checks.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_APP_NAME, DEFAULT_ATLAS_HOST, DEFAULT_DATABASE, MongoConfig};
pub use connector::{connect_from_config, connect_from_config_with_retry, ping};
pub use health::{HealthStatus, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
