//! Parsing of the UI component's properties
//!
//! The framework hands properties over one at a time as loosely typed JSON.
//! `Property::parse` turns a name/value pair into a typed update, rejecting
//! malformed values before they reach the bridge's pending state.

use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    core::{config::Gesture, geo::CameraTarget, geo::LatLng},
    markers::MarkerSpec,
    BridgeError, Result,
};

pub const CAMERA_POSITION: &str = "cameraPosition";
pub const MARKERS: &str = "markers";
pub const SHOWS_USER_LOCATION: &str = "showsUserLocation";
pub const COMPASS_BUTTON: &str = "compassButton";
pub const MY_LOCATION_BUTTON: &str = "myLocationButton";
pub const CONSUMES_GESTURES_IN_VIEW: &str = "consumesGesturesInView";

/// Every property name the component recognizes
pub const PROPERTY_NAMES: [&str; 10] = [
    CAMERA_POSITION,
    MARKERS,
    SHOWS_USER_LOCATION,
    "scrollGestures",
    "zoomGestures",
    "tiltGestures",
    "rotateGestures",
    COMPASS_BUTTON,
    MY_LOCATION_BUTTON,
    CONSUMES_GESTURES_IN_VIEW,
];

/// `{latitude, longitude, zoom}` or `{auto: true, zoom}`
#[derive(Debug, Clone, Deserialize)]
pub struct CameraPositionProp {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zoom: f64,
    #[serde(default)]
    pub auto: bool,
}

impl TryFrom<CameraPositionProp> for CameraTarget {
    type Error = String;

    fn try_from(prop: CameraPositionProp) -> std::result::Result<Self, Self::Error> {
        if prop.auto {
            return Ok(CameraTarget::auto(prop.zoom));
        }
        match (prop.latitude, prop.longitude) {
            (Some(lat), Some(lng)) => Ok(CameraTarget::explicit(lat, lng, prop.zoom)),
            _ => Err("expected latitude and longitude unless auto is set".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconSourceProp {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerProp {
    pub public_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub icon: IconSourceProp,
}

impl From<MarkerProp> for MarkerSpec {
    fn from(prop: MarkerProp) -> Self {
        MarkerSpec::new(
            prop.public_id,
            LatLng::new(prop.latitude, prop.longitude),
            prop.icon.uri,
        )
    }
}

/// A typed property update
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    CameraPosition(CameraTarget),
    Markers(Vec<MarkerSpec>),
    ShowsUserLocation(bool),
    Gesture(Gesture, bool),
    CompassButton(bool),
    MyLocationButton(bool),
    /// Accepted for parity with other platforms; has no effect.
    ConsumesGesturesInView(bool),
}

impl Property {
    pub fn parse(name: &str, value: serde_json::Value) -> Result<Self> {
        let property = match name {
            CAMERA_POSITION => {
                let prop: CameraPositionProp = decode(name, value)?;
                let target = CameraTarget::try_from(prop).map_err(|reason| {
                    BridgeError::InvalidProperty {
                        name: name.to_string(),
                        reason,
                    }
                })?;
                Property::CameraPosition(target)
            }
            MARKERS => {
                let markers: Vec<MarkerProp> = decode(name, value)?;
                Property::Markers(markers.into_iter().map(MarkerSpec::from).collect())
            }
            SHOWS_USER_LOCATION => Property::ShowsUserLocation(decode(name, value)?),
            COMPASS_BUTTON => Property::CompassButton(decode(name, value)?),
            MY_LOCATION_BUTTON => Property::MyLocationButton(decode(name, value)?),
            CONSUMES_GESTURES_IN_VIEW => Property::ConsumesGesturesInView(decode(name, value)?),
            other => match Gesture::ALL.iter().find(|g| g.property_name() == other) {
                Some(gesture) => Property::Gesture(*gesture, decode(name, value)?),
                None => return Err(BridgeError::UnknownProperty(other.to_string())),
            },
        };
        Ok(property)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CameraPosition(_) => CAMERA_POSITION,
            Self::Markers(_) => MARKERS,
            Self::ShowsUserLocation(_) => SHOWS_USER_LOCATION,
            Self::Gesture(gesture, _) => gesture.property_name(),
            Self::CompassButton(_) => COMPASS_BUTTON,
            Self::MyLocationButton(_) => MY_LOCATION_BUTTON,
            Self::ConsumesGesturesInView(_) => CONSUMES_GESTURES_IN_VIEW,
        }
    }
}

fn decode<T: DeserializeOwned>(name: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| BridgeError::InvalidProperty {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_explicit_camera() {
        let property = Property::parse(
            "cameraPosition",
            json!({"latitude": 51.5, "longitude": -0.12, "zoom": 12}),
        )
        .unwrap();
        assert_eq!(
            property,
            Property::CameraPosition(CameraTarget::explicit(51.5, -0.12, 12.0))
        );
    }

    #[test]
    fn test_parse_auto_camera() {
        let property =
            Property::parse("cameraPosition", json!({"auto": true, "zoom": 10})).unwrap();
        assert_eq!(property, Property::CameraPosition(CameraTarget::auto(10.0)));
    }

    #[test]
    fn test_camera_without_coordinates_is_invalid() {
        let result = Property::parse("cameraPosition", json!({"zoom": 10}));
        assert!(matches!(result, Err(BridgeError::InvalidProperty { .. })));
    }

    #[test]
    fn test_parse_markers() {
        let property = Property::parse(
            "markers",
            json!([
                {"publicId": "a", "latitude": 1.0, "longitude": 2.0, "icon": {"uri": "https://x/a.png"}},
                {"publicId": "b", "latitude": 3.0, "longitude": 4.0, "icon": {"uri": "https://x/b.png"}}
            ]),
        )
        .unwrap();

        match property {
            Property::Markers(markers) => {
                assert_eq!(markers.len(), 2);
                assert_eq!(markers[0].public_id, "a");
                assert_eq!(markers[1].position, LatLng::new(3.0, 4.0));
                assert_eq!(markers[1].icon_uri, "https://x/b.png");
            }
            other => panic!("unexpected property {:?}", other),
        }
    }

    #[test]
    fn test_marker_missing_icon_is_invalid() {
        let result = Property::parse(
            "markers",
            json!([{"publicId": "a", "latitude": 1.0, "longitude": 2.0}]),
        );
        assert!(matches!(result, Err(BridgeError::InvalidProperty { .. })));
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!(
            Property::parse("tiltGestures", json!(false)).unwrap(),
            Property::Gesture(Gesture::Tilt, false)
        );
        assert_eq!(
            Property::parse("compassButton", json!(false)).unwrap(),
            Property::CompassButton(false)
        );
        assert_eq!(
            Property::parse("consumesGesturesInView", json!(true)).unwrap(),
            Property::ConsumesGesturesInView(true)
        );
        assert!(Property::parse("zoomGestures", json!("yes")).is_err());
    }

    #[test]
    fn test_unknown_property() {
        let result = Property::parse("mapType", json!("satellite"));
        assert!(matches!(result, Err(BridgeError::UnknownProperty(name)) if name == "mapType"));
    }

    #[test]
    fn test_every_name_round_trips() {
        for name in PROPERTY_NAMES {
            let value = match name {
                CAMERA_POSITION => json!({"auto": true, "zoom": 3}),
                MARKERS => json!([]),
                _ => json!(true),
            };
            assert_eq!(Property::parse(name, value).unwrap().name(), name);
        }
    }
}
