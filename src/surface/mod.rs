//! Host collaborators the bridge talks to
//!
//! None of these are implemented here: the host platform provides the map
//! surface, the view that owns it, and the device location. The bridge only
//! relies on the contracts below.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        config::Gesture,
        geo::{CameraPosition, LatLng},
    },
    markers::icon::Icon,
};

/// Identity of a live surface instance. A new id means the host tore the
/// previous surface down and created another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Host UI-tree identity used to address outbound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub i64);

/// Opaque marker identifier assigned by the surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub String);

impl MarkerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the surface needs to place one marker. `icon: None` means the
/// surface's default marker image.
#[derive(Debug, Clone)]
pub struct MarkerOptions {
    pub position: LatLng,
    pub icon: Option<Arc<Icon>>,
}

/// The live map instance. Methods take `&self`; the host owns the mutable
/// state behind it.
pub trait MapSurface: Send + Sync {
    fn surface_id(&self) -> SurfaceId;

    fn set_gesture_enabled(&self, gesture: Gesture, enabled: bool);

    fn set_compass_enabled(&self, enabled: bool);

    fn set_my_location_button_enabled(&self, enabled: bool);

    /// Show or hide the device location dot
    fn set_my_location_enabled(&self, enabled: bool);

    fn move_camera(&self, position: CameraPosition);

    fn add_marker(&self, options: &MarkerOptions) -> MarkerHandle;

    fn remove_marker(&self, handle: &MarkerHandle);

    /// Route all surface callbacks to `listener`, replacing any previous one.
    fn set_listener(&self, listener: Arc<dyn SurfaceListener>);
}

/// Callbacks a surface delivers once a listener is registered
pub trait SurfaceListener: Send + Sync {
    /// Fires for intermediate frames of gestures and animations, and always
    /// for the settled position.
    fn on_camera_change(&self, position: CameraPosition);

    /// Tap on the map itself, not on a marker
    fn on_map_click(&self, position: LatLng);

    fn on_map_long_click(&self, position: LatLng);

    /// Returns true if the tap was consumed and the surface should skip its
    /// default behaviour.
    fn on_marker_click(&self, handle: &MarkerHandle, position: LatLng) -> bool;

    fn on_marker_drag_start(&self, handle: &MarkerHandle, position: LatLng);

    fn on_marker_drag(&self, handle: &MarkerHandle, position: LatLng);

    fn on_marker_drag_end(&self, handle: &MarkerHandle, position: LatLng);

    /// Returns true to suppress the default recenter on the device location.
    fn on_my_location_button_click(&self) -> bool;
}

/// The host view that owns the surface
pub trait MapView: Send + Sync {
    fn view_id(&self) -> ViewId;

    /// Ask for the surface to be delivered to `MapBridge::on_surface_ready`
    /// once it is ready. Delivery is asynchronous and may happen on a later
    /// turn of the host event loop.
    fn request_surface(&self);
}

/// Device location and the permission gating it
pub trait LocationProvider: Send + Sync {
    fn has_fine_location_permission(&self) -> bool;

    fn last_known_location(&self) -> Option<LatLng>;
}

/// Location provider for hosts without location support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn has_fine_location_permission(&self) -> bool {
        false
    }

    fn last_known_location(&self) -> Option<LatLng> {
        None
    }
}
