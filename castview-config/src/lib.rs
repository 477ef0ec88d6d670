//! Shared configuration library for castview.
//!
//! Configuration is composed from an optional TOML file, an optional `.env`
//! file, and process environment variables (which win over file values).
//! The server re-exports these types so there is a single source of truth for
//! defaults and validation rules.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    ActivitiesConfig, Config, ConfigMetadata, DatabaseConfig, LmsConfig,
    OpencastConfig, OpencastInstanceConfig, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
