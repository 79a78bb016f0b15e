//! Recording fakes for the host collaborators
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::Receiver;
use mapbridge::prelude::*;
use mapbridge::{BridgeOptions, ChannelEventSink, GestureFlags, MapBridge};

/// What the surface currently shows, as set through the bridge
#[derive(Debug, Clone)]
pub struct SurfaceRecord {
    pub gestures: GestureFlags,
    pub compass_enabled: bool,
    pub my_location_button_enabled: Option<bool>,
    pub my_location_enabled: Option<bool>,
    pub camera_moves: Vec<CameraPosition>,
    /// Live markers in placement order: handle, position, whether a custom icon was set
    pub markers: Vec<(MarkerHandle, LatLng, bool)>,
    pub removed: Vec<MarkerHandle>,
    pub listener_registrations: usize,
}

impl Default for SurfaceRecord {
    fn default() -> Self {
        Self {
            gestures: GestureFlags::default(),
            compass_enabled: true,
            my_location_button_enabled: None,
            my_location_enabled: None,
            camera_moves: Vec::new(),
            markers: Vec::new(),
            removed: Vec::new(),
            listener_registrations: 0,
        }
    }
}

type Hook = Box<dyn FnOnce() + Send>;

pub struct FakeSurface {
    id: SurfaceId,
    record: Mutex<SurfaceRecord>,
    next_marker: AtomicUsize,
    listener: Mutex<Option<Arc<dyn SurfaceListener>>>,
    on_move_camera: Mutex<Option<Hook>>,
}

impl FakeSurface {
    pub fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id: SurfaceId(id),
            record: Mutex::new(SurfaceRecord::default()),
            next_marker: AtomicUsize::new(0),
            listener: Mutex::new(None),
            on_move_camera: Mutex::new(None),
        })
    }

    pub fn record(&self) -> SurfaceRecord {
        self.record.lock().unwrap().clone()
    }

    pub fn listener(&self) -> Arc<dyn SurfaceListener> {
        self.listener
            .lock()
            .unwrap()
            .clone()
            .expect("no listener registered")
    }

    pub fn marker_handle(&self, index: usize) -> MarkerHandle {
        self.record().markers[index].0.clone()
    }

    /// Run `hook` the next time the camera moves
    pub fn on_next_camera_move(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_move_camera.lock().unwrap() = Some(Box::new(hook));
    }
}

impl MapSurface for FakeSurface {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn set_gesture_enabled(&self, gesture: Gesture, enabled: bool) {
        self.record.lock().unwrap().gestures.set(gesture, enabled);
    }

    fn set_compass_enabled(&self, enabled: bool) {
        self.record.lock().unwrap().compass_enabled = enabled;
    }

    fn set_my_location_button_enabled(&self, enabled: bool) {
        self.record.lock().unwrap().my_location_button_enabled = Some(enabled);
    }

    fn set_my_location_enabled(&self, enabled: bool) {
        self.record.lock().unwrap().my_location_enabled = Some(enabled);
    }

    fn move_camera(&self, position: CameraPosition) {
        self.record.lock().unwrap().camera_moves.push(position);
        let hook = self.on_move_camera.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn add_marker(&self, options: &MarkerOptions) -> MarkerHandle {
        let n = self.next_marker.fetch_add(1, Ordering::SeqCst);
        let handle = MarkerHandle::new(format!("s{}m{}", self.id.0, n));
        self.record.lock().unwrap().markers.push((
            handle.clone(),
            options.position,
            options.icon.is_some(),
        ));
        handle
    }

    fn remove_marker(&self, handle: &MarkerHandle) {
        let mut record = self.record.lock().unwrap();
        record.markers.retain(|(h, _, _)| h != handle);
        record.removed.push(handle.clone());
    }

    fn set_listener(&self, listener: Arc<dyn SurfaceListener>) {
        self.record.lock().unwrap().listener_registrations += 1;
        *self.listener.lock().unwrap() = Some(listener);
    }
}

/// View that only counts surface requests; tests deliver ready by hand
pub struct FakeView {
    id: ViewId,
    requests: AtomicUsize,
}

impl FakeView {
    pub fn new(id: i64) -> Arc<Self> {
        Arc::new(Self {
            id: ViewId(id),
            requests: AtomicUsize::new(0),
        })
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl MapView for FakeView {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn request_surface(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeLocation {
    pub permission: bool,
    pub fix: Option<LatLng>,
}

impl LocationProvider for FakeLocation {
    fn has_fine_location_permission(&self) -> bool {
        self.permission
    }

    fn last_known_location(&self) -> Option<LatLng> {
        self.fix
    }
}

/// Icon fetcher that records every call; URIs containing "broken" fail
#[derive(Default)]
pub struct CountingFetcher {
    calls: Mutex<HashMap<String, usize>>,
}

impl CountingFetcher {
    pub fn calls_for(&self, uri: &str) -> usize {
        self.calls.lock().unwrap().get(uri).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl IconFetcher for CountingFetcher {
    fn fetch(&self, uri: &str) -> Result<Icon> {
        *self.calls.lock().unwrap().entry(uri.to_string()).or_default() += 1;
        if uri.contains("broken") {
            return Err(BridgeError::IconFetchFailed {
                uri: uri.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            });
        }
        Ok(Icon::new(2, 2, vec![255; 16]))
    }
}

pub struct Harness {
    pub bridge: MapBridge,
    pub events: Receiver<EventEnvelope>,
    pub view: Arc<FakeView>,
    pub icons: Arc<CountingFetcher>,
}

impl Harness {
    pub fn new(location: FakeLocation) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let (sink, events) = ChannelEventSink::new();
        let icons = Arc::new(CountingFetcher::default());
        let view = FakeView::new(42);
        let bridge = MapBridgeBuilder::new()
            .with_options(BridgeOptions::default())
            .with_location_provider(Arc::new(location))
            .with_icon_fetcher(icons.clone())
            .with_event_sink(Arc::new(sink))
            .with_view(view.clone())
            .build()
            .unwrap();

        Self {
            bridge,
            events,
            view,
            icons,
        }
    }

    pub fn with_location() -> Self {
        Self::new(FakeLocation {
            permission: true,
            fix: Some(LatLng::new(51.4545, -2.5879)),
        })
    }

    pub fn without_location() -> Self {
        Self::new(FakeLocation {
            permission: false,
            fix: None,
        })
    }

    pub fn drain_events(&self) -> Vec<MapEvent> {
        self.events.try_iter().map(|envelope| envelope.event).collect()
    }
}

pub fn marker(id: &str, lat: f64, lng: f64, icon: &str) -> MarkerSpec {
    MarkerSpec::new(id, LatLng::new(lat, lng), icon)
}
