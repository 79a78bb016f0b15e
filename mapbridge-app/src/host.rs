//! In-memory stand-ins for the host platform

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mapbridge::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::scenario::{Callback, LocationScript};

/// Surface that logs every call and keeps just enough state to address
/// markers by index.
pub struct ConsoleSurface {
    id: SurfaceId,
    next_marker: AtomicUsize,
    markers: Mutex<Vec<MarkerHandle>>,
    listener: Mutex<Option<Arc<dyn SurfaceListener>>>,
}

impl ConsoleSurface {
    pub fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id: SurfaceId(id),
            next_marker: AtomicUsize::new(0),
            markers: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
        })
    }

    /// Deliver `callback` to the registered listener, as the SDK would
    pub fn dispatch(&self, callback: Callback) -> anyhow::Result<()> {
        let listener = self
            .listener
            .lock()
            .map_err(|_| anyhow::anyhow!("listener lock poisoned"))?
            .clone()
            .ok_or_else(|| anyhow::anyhow!("surface {} has no listener yet", self.id.0))?;

        match callback {
            Callback::CameraChange {
                latitude,
                longitude,
                zoom,
            } => {
                let target = LatLng::new(latitude, longitude);
                listener.on_camera_change(CameraPosition::new(target, zoom));
            }
            Callback::MapClick {
                latitude,
                longitude,
            } => listener.on_map_click(LatLng::new(latitude, longitude)),
            Callback::MapLongClick {
                latitude,
                longitude,
            } => listener.on_map_long_click(LatLng::new(latitude, longitude)),
            Callback::MarkerClick {
                marker,
                latitude,
                longitude,
            } => {
                let handle = self.handle(marker)?;
                let consumed = listener.on_marker_click(&handle, LatLng::new(latitude, longitude));
                log::info!("[surface {}] marker tap consumed: {}", self.id.0, consumed);
            }
            Callback::MarkerDragStart {
                marker,
                latitude,
                longitude,
            } => {
                let handle = self.handle(marker)?;
                listener.on_marker_drag_start(&handle, LatLng::new(latitude, longitude));
            }
            Callback::MarkerDrag {
                marker,
                latitude,
                longitude,
            } => {
                let handle = self.handle(marker)?;
                listener.on_marker_drag(&handle, LatLng::new(latitude, longitude));
            }
            Callback::MarkerDragEnd {
                marker,
                latitude,
                longitude,
            } => {
                let handle = self.handle(marker)?;
                listener.on_marker_drag_end(&handle, LatLng::new(latitude, longitude));
            }
            Callback::MyLocationButton => {
                if !listener.on_my_location_button_click() {
                    log::info!("[surface {}] recentering on device location", self.id.0);
                }
            }
        }
        Ok(())
    }

    fn handle(&self, index: usize) -> anyhow::Result<MarkerHandle> {
        self.markers
            .lock()
            .map_err(|_| anyhow::anyhow!("marker lock poisoned"))?
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("surface {} has no marker #{}", self.id.0, index))
    }
}

impl MapSurface for ConsoleSurface {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn set_gesture_enabled(&self, gesture: Gesture, enabled: bool) {
        log::info!("[surface {}] {:?} gestures: {}", self.id.0, gesture, enabled);
    }

    fn set_compass_enabled(&self, enabled: bool) {
        log::info!("[surface {}] compass: {}", self.id.0, enabled);
    }

    fn set_my_location_button_enabled(&self, enabled: bool) {
        log::info!("[surface {}] my-location button: {}", self.id.0, enabled);
    }

    fn set_my_location_enabled(&self, enabled: bool) {
        log::info!("[surface {}] user location: {}", self.id.0, enabled);
    }

    fn move_camera(&self, position: CameraPosition) {
        log::info!(
            "[surface {}] camera -> ({:.5}, {:.5}) z{}",
            self.id.0,
            position.target.lat,
            position.target.lng,
            position.zoom
        );
    }

    fn add_marker(&self, options: &MarkerOptions) -> MarkerHandle {
        let n = self.next_marker.fetch_add(1, Ordering::SeqCst);
        let handle = MarkerHandle::new(format!("m{}", n));
        log::info!(
            "[surface {}] add marker {} at ({:.5}, {:.5}) icon {:?}",
            self.id.0,
            handle,
            options.position.lat,
            options.position.lng,
            options.icon.as_ref().map(|icon| icon.size())
        );
        if let Ok(mut markers) = self.markers.lock() {
            markers.push(handle.clone());
        }
        handle
    }

    fn remove_marker(&self, handle: &MarkerHandle) {
        log::info!("[surface {}] remove marker {}", self.id.0, handle);
        if let Ok(mut markers) = self.markers.lock() {
            markers.retain(|h| h != handle);
        }
    }

    fn set_listener(&self, listener: Arc<dyn SurfaceListener>) {
        log::info!("[surface {}] listener registered", self.id.0);
        if let Ok(mut slot) = self.listener.lock() {
            *slot = Some(listener);
        }
    }
}

/// View that forwards surface requests to the runner's event loop
pub struct HostView {
    id: ViewId,
    requests: UnboundedSender<()>,
}

impl HostView {
    pub fn new(id: i64, requests: UnboundedSender<()>) -> Arc<Self> {
        Arc::new(Self {
            id: ViewId(id),
            requests,
        })
    }
}

impl MapView for HostView {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn request_surface(&self) {
        if self.requests.send(()).is_err() {
            log::warn!("runner stopped; surface request for view {:?} lost", self.id);
        }
    }
}

pub struct ScriptedLocation(pub LocationScript);

impl LocationProvider for ScriptedLocation {
    fn has_fine_location_permission(&self) -> bool {
        self.0.permission
    }

    fn last_known_location(&self) -> Option<LatLng> {
        self.0.last_known
    }
}
