//! # castview core
//!
//! Business logic for the series video overview: the collaborator ports, the
//! reconciliation of Opencast videos against LMS activity records, the
//! Opencast External API client, and the Postgres-backed activity stores.
//!
//! ## Feature Flags
//!
//! - `database`: Enables the Postgres stores and embedded migrations (SQLx)
//!
//! ## Architecture
//!
//! - [`ports`]: traits the report depends on
//! - [`report`]: [`ReportBuilder`](report::ReportBuilder) and
//!   [`OverviewService`](report::OverviewService)
//! - [`providers`]: Opencast HTTP client
//! - [`database`]: Postgres implementations of the activity ports
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Error types and error handling utilities
pub mod error;

/// LMS link construction
pub mod links;

/// Collaborator interfaces consumed by the report
pub mod ports;

/// Report assembly
pub mod report;

/// External media providers (Opencast integration)
pub mod providers;

/// Postgres implementations of the activity ports
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod database;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{CoreError, Result};
pub use report::{OverviewService, ReportBuilder};
