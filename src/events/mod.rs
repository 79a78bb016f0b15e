//! Outbound events delivered to the UI framework
//!
//! Every event travels on one channel as `{"event": <kind>, "data": {...}}`,
//! addressed to the host view that owns the map.

pub mod sink;

pub use sink::{ChannelEventSink, EventEnvelope, EventSink};

use serde::{Deserialize, Serialize};

use crate::core::geo::{CameraPosition, LatLng};

/// Name the host transport dispatches every map event under
pub const CHANGE_EVENT_NAME: &str = "topChange";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl From<CameraPosition> for CameraPayload {
    fn from(position: CameraPosition) -> Self {
        Self {
            latitude: position.target.lat,
            longitude: position.target.lng,
            zoom: position.zoom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePayload {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for CoordinatePayload {
    fn from(position: LatLng) -> Self {
        Self {
            latitude: position.lat,
            longitude: position.lng,
        }
    }
}

/// Marker position plus the caller's id. `public_id` is absent when the
/// marker handle no longer belongs to the current marker set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPayload {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl MarkerPayload {
    pub fn new(position: LatLng, public_id: Option<String>) -> Self {
        Self {
            latitude: position.lat,
            longitude: position.lng,
            public_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum MapEvent {
    #[serde(rename = "didChangeCameraPosition")]
    CameraChanged(CameraPayload),
    #[serde(rename = "didTapAtCoordinate")]
    TapAtCoordinate(CoordinatePayload),
    #[serde(rename = "didLongPressAtCoordinate")]
    LongPressAtCoordinate(CoordinatePayload),
    #[serde(rename = "didBeginDraggingMarker")]
    MarkerDragStarted(MarkerPayload),
    #[serde(rename = "didDragMarker")]
    MarkerDragged(MarkerPayload),
    #[serde(rename = "didEndDraggingMarker")]
    MarkerDragEnded(MarkerPayload),
    #[serde(rename = "didTapMarker")]
    MarkerTapped(MarkerPayload),
    #[serde(rename = "didTapMyLocationButtonForMapView")]
    MyLocationButtonTapped,
}

impl MapEvent {
    /// The wire name of this event kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CameraChanged(_) => "didChangeCameraPosition",
            Self::TapAtCoordinate(_) => "didTapAtCoordinate",
            Self::LongPressAtCoordinate(_) => "didLongPressAtCoordinate",
            Self::MarkerDragStarted(_) => "didBeginDraggingMarker",
            Self::MarkerDragged(_) => "didDragMarker",
            Self::MarkerDragEnded(_) => "didEndDraggingMarker",
            Self::MarkerTapped(_) => "didTapMarker",
            Self::MyLocationButtonTapped => "didTapMyLocationButtonForMapView",
        }
    }

    pub fn marker_payload(&self) -> Option<&MarkerPayload> {
        match self {
            Self::MarkerDragStarted(payload)
            | Self::MarkerDragged(payload)
            | Self::MarkerDragEnded(payload)
            | Self::MarkerTapped(payload) => Some(payload),
            _ => None,
        }
    }

    /// JSON body handed to the host event transport
    pub fn to_payload(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
