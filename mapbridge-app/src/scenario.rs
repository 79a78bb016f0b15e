use mapbridge::{BridgeOptions, LatLng};
use serde::Deserialize;

/// A scripted session: property updates, ready signals and surface callbacks
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_view_id")]
    pub view_id: i64,
    #[serde(default)]
    pub options: BridgeOptions,
    #[serde(default)]
    pub location: LocationScript,
    pub steps: Vec<Step>,
}

fn default_view_id() -> i64 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationScript {
    #[serde(default)]
    pub permission: bool,
    pub last_known: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Property update from the UI framework
    Property {
        name: String,
        value: serde_json::Value,
    },
    /// The host hands surface `surface` to the bridge
    Ready { surface: u64 },
    /// The host tears surface `surface` down
    DropSurface { surface: u64 },
    /// The surface reports a user interaction
    Callback {
        surface: u64,
        #[serde(flatten)]
        callback: Callback,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Callback {
    CameraChange {
        latitude: f64,
        longitude: f64,
        zoom: f64,
    },
    MapClick {
        latitude: f64,
        longitude: f64,
    },
    MapLongClick {
        latitude: f64,
        longitude: f64,
    },
    /// `marker` is the index of a live marker in placement order
    MarkerClick {
        marker: usize,
        latitude: f64,
        longitude: f64,
    },
    MarkerDragStart {
        marker: usize,
        latitude: f64,
        longitude: f64,
    },
    MarkerDrag {
        marker: usize,
        latitude: f64,
        longitude: f64,
    },
    MarkerDragEnd {
        marker: usize,
        latitude: f64,
        longitude: f64,
    },
    MyLocationButton,
}
