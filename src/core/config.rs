//! Configuration for the bridge and its default collaborators
//!
//! `MapSettings` mirrors the boolean properties the UI component exposes,
//! with the component's defaults. `IconFetchConfig` bounds the network work
//! done during a marker apply pass.

use serde::{Deserialize, Serialize};

/// Gestures the surface can enable or disable individually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gesture {
    Scroll,
    Zoom,
    Tilt,
    Rotate,
}

impl Gesture {
    pub const ALL: [Gesture; 4] = [
        Gesture::Scroll,
        Gesture::Zoom,
        Gesture::Tilt,
        Gesture::Rotate,
    ];

    /// Name of the UI property controlling this gesture
    pub fn property_name(&self) -> &'static str {
        match self {
            Self::Scroll => "scrollGestures",
            Self::Zoom => "zoomGestures",
            Self::Tilt => "tiltGestures",
            Self::Rotate => "rotateGestures",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureFlags {
    pub scroll: bool,
    pub zoom: bool,
    pub tilt: bool,
    pub rotate: bool,
}

impl GestureFlags {
    pub fn get(&self, gesture: Gesture) -> bool {
        match gesture {
            Gesture::Scroll => self.scroll,
            Gesture::Zoom => self.zoom,
            Gesture::Tilt => self.tilt,
            Gesture::Rotate => self.rotate,
        }
    }

    pub fn set(&mut self, gesture: Gesture, enabled: bool) {
        match gesture {
            Gesture::Scroll => self.scroll = enabled,
            Gesture::Zoom => self.zoom = enabled,
            Gesture::Tilt => self.tilt = enabled,
            Gesture::Rotate => self.rotate = enabled,
        }
    }
}

impl Default for GestureFlags {
    fn default() -> Self {
        Self {
            scroll: true,
            zoom: true,
            tilt: true,
            rotate: true,
        }
    }
}

/// Flag-style settings pushed to the surface on every apply pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub gestures: GestureFlags,
    pub shows_user_location: bool,
    pub compass_enabled: bool,
    pub my_location_button_enabled: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            gestures: GestureFlags::default(),
            shows_user_location: false,
            compass_enabled: true,
            my_location_button_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconFetchConfig {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub user_agent: String,
    pub max_concurrent_fetches: usize,
}

impl IconFetchConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.connect_timeout_ms)
    }

    /// Worker count actually used; zero is treated as one.
    pub fn fetch_parallelism(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }
}

impl Default for IconFetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            user_agent: concat!("mapbridge/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent_fetches: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    pub initial_settings: MapSettings,
    pub icon_fetch: IconFetchConfig,
}

impl BridgeOptions {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
