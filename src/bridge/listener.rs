use std::sync::Weak;

use super::Shared;
use crate::{
    core::geo::{CameraPosition, LatLng},
    events::MapEvent,
    surface::{MarkerHandle, SurfaceListener},
};

/// Listener registered on the surface. Holds the bridge weakly so a surface
/// outliving its component cannot keep the bridge alive.
pub(crate) struct BridgeListener {
    shared: Weak<Shared>,
}

impl BridgeListener {
    pub fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    fn with_shared(&self, f: impl FnOnce(&Shared)) {
        match self.shared.upgrade() {
            Some(shared) => f(&shared),
            None => log::trace!("surface callback after bridge was dropped"),
        }
    }
}

impl SurfaceListener for BridgeListener {
    fn on_camera_change(&self, position: CameraPosition) {
        self.with_shared(|shared| shared.emit(MapEvent::CameraChanged(position.into())));
    }

    fn on_map_click(&self, position: LatLng) {
        self.with_shared(|shared| shared.emit(MapEvent::TapAtCoordinate(position.into())));
    }

    fn on_map_long_click(&self, position: LatLng) {
        self.with_shared(|shared| shared.emit(MapEvent::LongPressAtCoordinate(position.into())));
    }

    fn on_marker_click(&self, handle: &MarkerHandle, position: LatLng) -> bool {
        self.with_shared(|shared| shared.emit_marker(MapEvent::MarkerTapped, handle, position));
        // Let the surface run its default tap behaviour
        false
    }

    fn on_marker_drag_start(&self, handle: &MarkerHandle, position: LatLng) {
        self.with_shared(|shared| {
            shared.emit_marker(MapEvent::MarkerDragStarted, handle, position)
        });
    }

    fn on_marker_drag(&self, handle: &MarkerHandle, position: LatLng) {
        self.with_shared(|shared| shared.emit_marker(MapEvent::MarkerDragged, handle, position));
    }

    fn on_marker_drag_end(&self, handle: &MarkerHandle, position: LatLng) {
        self.with_shared(|shared| shared.emit_marker(MapEvent::MarkerDragEnded, handle, position));
    }

    fn on_my_location_button_click(&self) -> bool {
        self.with_shared(|shared| shared.emit(MapEvent::MyLocationButtonTapped));
        // Never consumed: the surface still recenters on the device
        false
    }
}
