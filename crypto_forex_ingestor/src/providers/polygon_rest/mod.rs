//! Polygon.io REST implementation of [`AggsProvider`](crate::providers::AggsProvider).

mod params;
mod provider;
mod response;

pub use provider::PolygonProvider;
pub use response::AggsResponse;
