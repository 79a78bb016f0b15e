//! # mapbridge
//!
//! Bridges a declarative UI component to a host map surface.
//!
//! Configuration arrives as properties at any time, usually before the
//! surface exists. The bridge records it as pending state, asks the host for
//! the surface, and applies the latest state once the surface reports ready.
//! Surface callbacks come back as tagged events, with marker handles
//! translated to the caller's own marker ids.

pub mod bridge;
pub mod core;
pub mod events;
pub mod markers;
pub mod prelude;
pub mod surface;

// Re-export public API
pub use crate::core::{
    builder::MapBridgeBuilder,
    config::{BridgeOptions, Gesture, GestureFlags, IconFetchConfig, MapSettings},
    geo::{CameraPosition, CameraTarget, LatLng},
    props::Property,
};

pub use bridge::{ListenerState, MapBridge};

pub use events::{ChannelEventSink, EventEnvelope, EventSink, MapEvent};

pub use markers::{Icon, IconCache, IconFetcher, MarkerRegistry, MarkerSpec};

#[cfg(feature = "http")]
pub use markers::HttpIconFetcher;

pub use surface::{
    LocationProvider, MapSurface, MapView, MarkerHandle, MarkerOptions, NoLocation,
    SurfaceId, SurfaceListener, ViewId,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Ways the bridge can degrade. None of them are fatal to the bridge itself.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("no last known location available")]
    LocationUnavailable,

    #[error("fine location permission not granted")]
    PermissionDenied,

    #[error("icon fetch failed for {uri}: {reason}")]
    IconFetchFailed { uri: String, reason: String },

    #[error("marker handle {0} is not part of the current marker set")]
    StaleMarkerHandle(MarkerHandle),

    #[error("invalid value for property `{name}`: {reason}")]
    InvalidProperty { name: String, reason: String },

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("bridge misconfigured: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = BridgeError;
