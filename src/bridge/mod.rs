//! The configuration bridge
//!
//! `MapBridge` sits between the UI component and the host surface. Setters
//! only record pending state and ask the host for the surface; the host
//! answers later through [`MapBridge::on_surface_ready`], at which point the
//! latest pending state is pushed to the surface in one pass:
//!
//! 1. gesture and compass flags
//! 2. user location dot and my-location button (fine location permission only)
//! 3. camera, if one is pending
//! 4. markers, if the list changed: old markers removed, icons fetched once
//!    per URI, new markers placed and registered
//!
//! Surface callbacks are turned into [`MapEvent`]s addressed to the view.

mod listener;
mod state;

pub use state::ListenerState;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use listener::BridgeListener;
use state::{ApplyPhase, ApplySnapshot, PendingState};

use crate::{
    core::{
        config::{BridgeOptions, Gesture, IconFetchConfig, MapSettings},
        geo::{CameraPosition, CameraTarget, LatLng},
        props::Property,
    },
    events::{EventSink, MapEvent, MarkerPayload},
    markers::{IconCache, IconFetcher, MarkerRegistry, MarkerSpec},
    surface::{
        LocationProvider, MapSurface, MapView, MarkerHandle, MarkerOptions, SurfaceId, ViewId,
    },
    BridgeError, Result,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ViewBinding {
    id: ViewId,
    view: Weak<dyn MapView>,
}

/// State shared between the bridge and the listener it registers.
pub(crate) struct Shared {
    state: Mutex<PendingState>,
    registry: Mutex<MarkerRegistry>,
    surface: Mutex<Option<Weak<dyn MapSurface>>>,
    view: Mutex<Option<ViewBinding>>,
    location: Arc<dyn LocationProvider>,
    icons: Arc<dyn IconFetcher>,
    events: Arc<dyn EventSink>,
    icon_fetch: IconFetchConfig,
}

impl Shared {
    pub(crate) fn emit(&self, event: MapEvent) {
        let view = lock(&self.view).as_ref().map(|binding| binding.id);
        match view {
            Some(view) => self.events.emit(view, event),
            None => log::warn!("no view attached; dropping {} event", event.kind()),
        }
    }

    pub(crate) fn emit_marker(
        &self,
        make: fn(MarkerPayload) -> MapEvent,
        handle: &MarkerHandle,
        position: LatLng,
    ) {
        let public_id = match self.resolve_marker(handle) {
            Ok(id) => Some(id),
            Err(e) => {
                log::debug!("{}; emitting without publicId", e);
                None
            }
        };
        self.emit(make(MarkerPayload::new(position, public_id)));
    }

    fn resolve_marker(&self, handle: &MarkerHandle) -> Result<String> {
        lock(&self.registry)
            .resolve(handle)
            .map(str::to_string)
            .ok_or_else(|| BridgeError::StaleMarkerHandle(handle.clone()))
    }

    /// Ask the attached view for its surface. Returns false when no live view
    /// is attached; the request then waits for `attach_view`.
    fn request_surface(&self) -> bool {
        let view = lock(&self.view)
            .as_ref()
            .and_then(|binding| binding.view.upgrade());
        match view {
            Some(view) => {
                view.request_surface();
                true
            }
            None => {
                log::debug!("apply requested before a view is attached");
                false
            }
        }
    }

    /// Remember `surface` and report whether it differs from the one the
    /// previous pass configured.
    fn bind_surface(&self, surface: &Arc<dyn MapSurface>) -> bool {
        let mut current = lock(&self.surface);
        let previous = current.as_ref().and_then(Weak::upgrade).map(|s| s.surface_id());
        *current = Some(Arc::downgrade(surface));
        previous != Some(surface.surface_id())
    }
}

/// Returns the bridge to `Idle` when an apply pass unwinds, so the next
/// ready signal starts a fresh pass instead of queueing behind a dead one.
/// Everything is marked dirty and the listener re-registered, since the pass
/// may have stopped halfway.
struct AbortGuard<'a>(&'a Shared);

impl Drop for AbortGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = lock(&self.0.state);
            state.phase = ApplyPhase::Idle;
            state.invalidate_surface();
            // The pass may have died inside `set_listener`
            state.listener = ListenerState::Uninitialized;
            log::warn!("apply pass aborted; the next ready signal re-applies everything");
        }
    }
}

/// Bridge between one map component instance and its host surface.
///
/// Cheap to clone; clones share the same pending state.
#[derive(Clone)]
pub struct MapBridge {
    shared: Arc<Shared>,
}

impl MapBridge {
    pub fn new(
        options: BridgeOptions,
        location: Arc<dyn LocationProvider>,
        icons: Arc<dyn IconFetcher>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let shared = Shared {
            state: Mutex::new(PendingState::new(options.initial_settings)),
            registry: Mutex::new(MarkerRegistry::new()),
            surface: Mutex::new(None),
            view: Mutex::new(None),
            location,
            icons,
            events,
            icon_fetch: options.icon_fetch,
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Bind the host view that owns the surface. A request made before any
    /// view was attached is forwarded now.
    pub fn attach_view(&self, view: Arc<dyn MapView>) {
        let id = view.view_id();
        *lock(&self.shared.view) = Some(ViewBinding {
            id,
            view: Arc::downgrade(&view),
        });
        log::debug!("attached view {:?}", id);

        if lock(&self.shared.state).apply_requested {
            view.request_surface();
        }
    }

    pub fn view_id(&self) -> Option<ViewId> {
        lock(&self.shared.view).as_ref().map(|binding| binding.id)
    }

    // Configuration setters

    /// Set the camera. An `Auto` target without a location fix (or without
    /// permission to read one) leaves the pending camera untouched.
    pub fn set_camera(&self, target: CameraTarget) {
        let position = match self.resolve_camera(target) {
            Ok(position) => position,
            Err(e) => {
                log::info!("ignoring auto camera: {}", e);
                return;
            }
        };
        self.update(|state| {
            state.camera = Some(position);
            state.camera_dirty = true;
        });
    }

    /// Replace the marker list wholesale
    pub fn set_markers(&self, specs: Vec<MarkerSpec>) {
        self.update(|state| {
            state.markers = Arc::new(specs);
            state.markers_dirty = true;
        });
    }

    pub fn set_gesture_enabled(&self, gesture: Gesture, enabled: bool) {
        self.update(|state| state.settings.gestures.set(gesture, enabled));
    }

    pub fn set_shows_user_location(&self, enabled: bool) {
        self.update(|state| state.settings.shows_user_location = enabled);
    }

    pub fn set_compass_enabled(&self, enabled: bool) {
        self.update(|state| state.settings.compass_enabled = enabled);
    }

    pub fn set_my_location_button_enabled(&self, enabled: bool) {
        self.update(|state| state.settings.my_location_button_enabled = enabled);
    }

    /// Apply a typed property update
    pub fn apply_property(&self, property: Property) {
        match property {
            Property::CameraPosition(target) => self.set_camera(target),
            Property::Markers(specs) => self.set_markers(specs),
            Property::ShowsUserLocation(enabled) => self.set_shows_user_location(enabled),
            Property::Gesture(gesture, enabled) => self.set_gesture_enabled(gesture, enabled),
            Property::CompassButton(enabled) => self.set_compass_enabled(enabled),
            Property::MyLocationButton(enabled) => self.set_my_location_button_enabled(enabled),
            Property::ConsumesGesturesInView(_) => {}
        }
    }

    /// Parse and apply a raw property from the UI framework. Only parsing can
    /// fail; a parsed property is always accepted.
    pub fn set_property(&self, name: &str, value: serde_json::Value) -> Result<()> {
        let property = Property::parse(name, value)?;
        self.apply_property(property);
        Ok(())
    }

    // Ready handshake

    /// Called by the host when the surface is ready after `request_surface`.
    ///
    /// Applies the current pending state. A call arriving while a pass is
    /// already running collapses into one more pass over the latest state,
    /// on the surface that call delivered.
    pub fn on_surface_ready(&self, surface: Arc<dyn MapSurface>) {
        {
            let mut state = lock(&self.shared.state);
            state.apply_requested = false;
            if let ApplyPhase::Applying { rerun } = &mut state.phase {
                log::debug!("ready signal during apply; collapsing into a rerun");
                *rerun = Some(surface);
                return;
            }
            state.phase = ApplyPhase::Applying { rerun: None };
        }

        let _abort = AbortGuard(&self.shared);
        let mut surface = surface;
        loop {
            let surface_id = surface.surface_id();
            if self.shared.bind_surface(&surface) {
                log::info!("configuring new surface {:?}", surface_id);
                lock(&self.shared.state).invalidate_surface();
                // Handles from a previous surface cannot be removed from this one
                lock(&self.shared.registry).clear();
            }

            let snapshot = lock(&self.shared.state).snapshot();
            self.apply(surface.as_ref(), snapshot);

            let mut state = lock(&self.shared.state);
            if state.listener.listen_on(surface_id) {
                drop(state);
                log::debug!("registering listener on surface {:?}", surface_id);
                let listener = BridgeListener::new(Arc::downgrade(&self.shared));
                surface.set_listener(Arc::new(listener));
                state = lock(&self.shared.state);
            }

            let next = match &mut state.phase {
                ApplyPhase::Applying { rerun } => rerun.take(),
                ApplyPhase::Idle => None,
            };
            match next {
                Some(next) => surface = next,
                None => {
                    state.phase = ApplyPhase::Idle;
                    break;
                }
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut PendingState)) {
        let request = {
            let mut state = lock(&self.shared.state);
            f(&mut state);
            state.request_apply()
        };
        if request {
            self.shared.request_surface();
        }
    }

    fn resolve_camera(&self, target: CameraTarget) -> Result<CameraPosition> {
        let last_known = match target {
            CameraTarget::Explicit { .. } => None,
            CameraTarget::Auto { .. } => {
                if !self.shared.location.has_fine_location_permission() {
                    return Err(BridgeError::PermissionDenied);
                }
                self.shared.location.last_known_location()
            }
        };
        target.resolve(last_known).ok_or(BridgeError::LocationUnavailable)
    }

    fn apply(&self, surface: &dyn MapSurface, snapshot: ApplySnapshot) {
        let settings = snapshot.settings;

        for gesture in Gesture::ALL {
            surface.set_gesture_enabled(gesture, settings.gestures.get(gesture));
        }
        surface.set_compass_enabled(settings.compass_enabled);

        if self.shared.location.has_fine_location_permission() {
            surface.set_my_location_button_enabled(settings.my_location_button_enabled);
            surface.set_my_location_enabled(settings.shows_user_location);
        } else if settings.shows_user_location {
            log::debug!("{}; user location stays hidden", BridgeError::PermissionDenied);
        }

        if let Some(camera) = snapshot.camera {
            surface.move_camera(camera);
        }

        if let Some(markers) = snapshot.markers {
            self.place_markers(surface, &markers);
        }
    }

    fn place_markers(&self, surface: &dyn MapSurface, specs: &[MarkerSpec]) {
        let stale: Vec<MarkerHandle> = {
            let mut registry = lock(&self.shared.registry);
            let handles: Vec<MarkerHandle> = registry.handles().cloned().collect();
            registry.clear();
            handles
        };
        for handle in &stale {
            surface.remove_marker(handle);
        }

        let mut icons = IconCache::new(
            self.shared.icons.as_ref(),
            self.shared.icon_fetch.fetch_parallelism(),
        );
        icons.prefetch(specs.iter().map(|spec| spec.icon_uri.as_str()));

        let mut placed = Vec::with_capacity(specs.len());
        for spec in specs {
            if !spec.position.is_valid() {
                log::warn!(
                    "skipping marker {} at invalid position {:?}",
                    spec.public_id,
                    spec.position
                );
                continue;
            }
            let options = MarkerOptions {
                position: spec.position,
                icon: icons.resolve(&spec.icon_uri),
            };
            let handle = surface.add_marker(&options);
            placed.push((handle, spec.public_id.clone()));
        }

        let mut registry = lock(&self.shared.registry);
        for (handle, public_id) in placed {
            registry.register(handle, public_id);
        }

        let stats = icons.stats();
        log::info!(
            "placed {} markers (removed {}, generation {}, {} icon fetches, {} failed)",
            registry.len(),
            stale.len(),
            registry.generation(),
            stats.misses,
            stats.failures
        );
    }

    // Inspection

    pub fn pending_settings(&self) -> MapSettings {
        lock(&self.shared.state).settings
    }

    pub fn pending_camera(&self) -> Option<CameraPosition> {
        lock(&self.shared.state).camera
    }

    pub fn pending_markers(&self) -> Arc<Vec<MarkerSpec>> {
        Arc::clone(&lock(&self.shared.state).markers)
    }

    pub fn is_apply_requested(&self) -> bool {
        lock(&self.shared.state).apply_requested
    }

    pub fn listener_state(&self) -> ListenerState {
        lock(&self.shared.state).listener
    }

    /// The surface last configured, if the host still keeps it alive
    pub fn surface(&self) -> Option<Arc<dyn MapSurface>> {
        lock(&self.shared.surface).as_ref().and_then(Weak::upgrade)
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.surface().map(|surface| surface.surface_id())
    }

    /// Public id currently registered for `handle`
    pub fn resolve_marker(&self, handle: &MarkerHandle) -> Option<String> {
        self.shared.resolve_marker(handle).ok()
    }

    /// Handle of the marker placed for `public_id`
    pub fn marker_handle(&self, public_id: &str) -> Option<MarkerHandle> {
        lock(&self.shared.registry).handle_for(public_id).cloned()
    }

    pub fn marker_count(&self) -> usize {
        lock(&self.shared.registry).len()
    }

    pub fn marker_generation(&self) -> u64 {
        lock(&self.shared.registry).generation()
    }
}

impl std::fmt::Debug for MapBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapBridge")
            .field("view", &self.view_id())
            .field("listener", &self.listener_state())
            .field("markers", &self.marker_count())
            .finish()
    }
}
