//! Search-interest providers

pub mod google_trends;
pub mod provider;

pub use google_trends::{GoogleTrendsClient, GoogleTrendsConfig};
pub use provider::{Observation, TrendsError, TrendsProvider};
