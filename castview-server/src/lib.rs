//! # castview server
//!
//! Serves the series video overview: for one Opencast series, every video and
//! the LMS courses embedding it as an activity, split by whether the course
//! also links the series.
//!
//! ## Architecture
//!
//! - [`infra`]: application state, the Opencast instance registry, errors
//! - [`handlers`]: HTML page, JSON API, and health endpoints
//! - [`render`]: HTML output
//! - [`routes`]: router assembly

pub mod handlers;
pub mod infra;
pub mod render;
pub mod routes;

pub use infra::app_state::AppState;
