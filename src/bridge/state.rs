use std::sync::Arc;

use crate::{
    core::{config::MapSettings, geo::CameraPosition},
    markers::MarkerSpec,
    surface::{MapSurface, SurfaceId},
};

/// Whether the bridge's listener is registered on a surface.
///
/// Moves to `Listening` on the first ready signal from a surface and stays
/// there; only a different surface id triggers another registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerState {
    #[default]
    Uninitialized,
    Listening(SurfaceId),
}

impl ListenerState {
    /// Take the transition for `surface`, returning true if the listener has
    /// to be registered on it.
    pub(crate) fn listen_on(&mut self, surface: SurfaceId) -> bool {
        match *self {
            Self::Listening(current) if current == surface => false,
            _ => {
                *self = Self::Listening(surface);
                true
            }
        }
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, Self::Listening(_))
    }
}

#[derive(Default)]
pub(crate) enum ApplyPhase {
    #[default]
    Idle,
    /// A pass is running; `rerun` holds the surface of the latest ready
    /// signal that arrived meanwhile.
    Applying { rerun: Option<Arc<dyn MapSurface>> },
}

impl std::fmt::Debug for ApplyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Applying { rerun } => f
                .debug_struct("Applying")
                .field("rerun", &rerun.as_ref().map(|surface| surface.surface_id()))
                .finish(),
        }
    }
}

/// Everything the bridge will push to the surface on the next apply pass
#[derive(Debug, Default)]
pub(crate) struct PendingState {
    pub settings: MapSettings,
    pub camera: Option<CameraPosition>,
    pub camera_dirty: bool,
    pub markers: Arc<Vec<MarkerSpec>>,
    pub markers_dirty: bool,
    pub apply_requested: bool,
    pub phase: ApplyPhase,
    pub listener: ListenerState,
}

/// The part of `PendingState` one apply pass works from
#[derive(Debug, Clone)]
pub(crate) struct ApplySnapshot {
    pub settings: MapSettings,
    pub camera: Option<CameraPosition>,
    pub markers: Option<Arc<Vec<MarkerSpec>>>,
}

impl PendingState {
    pub fn new(settings: MapSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Mark that an apply is wanted. Returns true only for the first request
    /// since the last ready signal; later ones collapse into it.
    pub fn request_apply(&mut self) -> bool {
        !std::mem::replace(&mut self.apply_requested, true)
    }

    /// A new surface has none of the previous configuration on it.
    pub fn invalidate_surface(&mut self) {
        self.camera_dirty = self.camera.is_some();
        self.markers_dirty = true;
    }

    /// Flags are always reapplied; camera and markers only when they changed
    /// since the last pass.
    pub fn snapshot(&mut self) -> ApplySnapshot {
        let camera = if std::mem::take(&mut self.camera_dirty) {
            self.camera
        } else {
            None
        };
        let markers = if std::mem::take(&mut self.markers_dirty) {
            Some(Arc::clone(&self.markers))
        } else {
            None
        };
        ApplySnapshot {
            settings: self.settings,
            camera,
            markers,
        }
    }
}
