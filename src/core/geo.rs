use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A resolved camera position, ready to hand to the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub target: LatLng,
    pub zoom: f64,
}

impl CameraPosition {
    pub fn new(target: LatLng, zoom: f64) -> Self {
        Self { target, zoom }
    }
}

/// Where the caller wants the camera to go.
///
/// `Auto` is resolved against the last known device location when it is
/// set; there is no deferred resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTarget {
    Explicit { target: LatLng, zoom: f64 },
    Auto { zoom: f64 },
}

impl CameraTarget {
    pub fn explicit(lat: f64, lng: f64, zoom: f64) -> Self {
        Self::Explicit {
            target: LatLng::new(lat, lng),
            zoom,
        }
    }

    pub fn auto(zoom: f64) -> Self {
        Self::Auto { zoom }
    }

    pub fn zoom(&self) -> f64 {
        match self {
            Self::Explicit { zoom, .. } | Self::Auto { zoom } => *zoom,
        }
    }

    /// Resolve to a concrete position. `Auto` needs a location fix.
    pub fn resolve(&self, last_known: Option<LatLng>) -> Option<CameraPosition> {
        match *self {
            Self::Explicit { target, zoom } => Some(CameraPosition::new(target, zoom)),
            Self::Auto { zoom } => last_known.map(|fix| CameraPosition::new(fix, zoom)),
        }
    }
}
