//! Repository and client ports (interfaces) the report is written against.
//! Implementations live in [`crate::providers`] and [`crate::database`];
//! tests substitute in-memory doubles.

pub mod activities;
pub mod series;

pub use activities::{
    ActivityLinkStore, ActivityResolver, ActivityTarget, SeriesMappingStore,
};
pub use series::SeriesClient;

#[cfg(test)]
pub use activities::{
    MockActivityLinkStore, MockActivityResolver, MockSeriesMappingStore,
};
#[cfg(test)]
pub use series::MockSeriesClient;
