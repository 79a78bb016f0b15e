//! Builder for fluent bridge configuration
//!
//! Wires the bridge's options and host collaborators. Only the event sink is
//! mandatory; location falls back to [`NoLocation`] and, with the `http`
//! feature, icons to [`HttpIconFetcher`](crate::markers::HttpIconFetcher).

use std::sync::Arc;

use crate::{
    bridge::MapBridge,
    core::config::{BridgeOptions, IconFetchConfig, MapSettings},
    events::EventSink,
    markers::IconFetcher,
    surface::{LocationProvider, MapView, NoLocation},
    BridgeError, Result,
};

/// Builder for creating and configuring MapBridge instances
#[derive(Default)]
pub struct MapBridgeBuilder {
    options: BridgeOptions,
    location: Option<Arc<dyn LocationProvider>>,
    icons: Option<Arc<dyn IconFetcher>>,
    events: Option<Arc<dyn EventSink>>,
    view: Option<Arc<dyn MapView>>,
}

impl MapBridgeBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    /// Settings in effect before any property arrives
    pub fn with_initial_settings(mut self, settings: MapSettings) -> Self {
        self.options.initial_settings = settings;
        self
    }

    pub fn with_icon_fetch_config(mut self, config: IconFetchConfig) -> Self {
        self.options.icon_fetch = config;
        self
    }

    pub fn with_location_provider(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_icon_fetcher(mut self, icons: Arc<dyn IconFetcher>) -> Self {
        self.icons = Some(icons);
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Attach the host view right away
    pub fn with_view(mut self, view: Arc<dyn MapView>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn build(self) -> Result<MapBridge> {
        let events = self
            .events
            .ok_or_else(|| BridgeError::Configuration("an event sink is required".to_string()))?;
        let location = self.location.unwrap_or_else(|| Arc::new(NoLocation));
        let icons = match self.icons {
            Some(icons) => icons,
            None => default_icon_fetcher(&self.options.icon_fetch)?,
        };

        let bridge = MapBridge::new(self.options, location, icons, events);
        if let Some(view) = self.view {
            bridge.attach_view(view);
        }
        Ok(bridge)
    }
}

#[cfg(feature = "http")]
fn default_icon_fetcher(config: &IconFetchConfig) -> Result<Arc<dyn IconFetcher>> {
    let fetcher = crate::markers::HttpIconFetcher::with_config(config)?;
    Ok(Arc::new(fetcher))
}

#[cfg(not(feature = "http"))]
fn default_icon_fetcher(_config: &IconFetchConfig) -> Result<Arc<dyn IconFetcher>> {
    Err(BridgeError::Configuration(
        "an icon fetcher is required without the `http` feature".to_string(),
    ))
}
