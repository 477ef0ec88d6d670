//! Core data model definitions shared across castview crates.
#![allow(missing_docs)]

pub mod activity;
pub mod error;
pub mod ids;
pub mod instance;
pub mod report;
pub mod video;

// Intentionally curated re-exports for downstream consumers.
pub use activity::{ActivityKind, ActivityLink, ResolvedActivity};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CourseId, InstanceId, ModuleId, SeriesId, VideoId};
pub use instance::InstanceDescriptor;
pub use report::{ReportRow, SeriesOverview};
pub use video::{Series, Video};
