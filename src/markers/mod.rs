pub mod cache;
#[cfg(feature = "http")]
pub mod http;
pub mod icon;
pub mod registry;

// Re-exports for convenience
pub use cache::{CacheStats, IconCache};
#[cfg(feature = "http")]
pub use http::HttpIconFetcher;
pub use icon::{Icon, IconFetcher};
pub use registry::MarkerRegistry;

use serde::{Deserialize, Serialize};

use crate::core::geo::LatLng;

/// One marker as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub public_id: String,
    pub position: LatLng,
    pub icon_uri: String,
}

impl MarkerSpec {
    pub fn new(
        public_id: impl Into<String>,
        position: LatLng,
        icon_uri: impl Into<String>,
    ) -> Self {
        Self {
            public_id: public_id.into(),
            position,
            icon_uri: icon_uri.into(),
        }
    }
}
