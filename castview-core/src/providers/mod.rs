pub mod opencast_api_provider;

pub use opencast_api_provider::{OpencastApiProvider, OpencastCredentials};
