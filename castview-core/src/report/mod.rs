pub mod builder;
pub mod overview;

pub use builder::ReportBuilder;
pub use overview::OverviewService;
