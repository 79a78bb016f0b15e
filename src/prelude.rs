//! Prelude module for common mapbridge types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapbridge::prelude::*;`

pub use crate::core::{
    builder::MapBridgeBuilder,
    config::{BridgeOptions, Gesture, GestureFlags, IconFetchConfig, MapSettings},
    geo::{CameraPosition, CameraTarget, LatLng},
    props::Property,
};

pub use crate::bridge::{ListenerState, MapBridge};

pub use crate::events::{ChannelEventSink, EventEnvelope, EventSink, MapEvent};

pub use crate::markers::{Icon, IconFetcher, MarkerSpec};

pub use crate::surface::{
    LocationProvider, MapSurface, MapView, MarkerHandle, MarkerOptions, SurfaceId,
    SurfaceListener, ViewId,
};

pub use crate::{BridgeError, Result};

pub use std::sync::{Arc, Weak};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
