use std::sync::Arc;

use anyhow::Context;
use fxhash::FxHashMap as HashMap;
use mapbridge::{ChannelEventSink, MapBridgeBuilder};
use tokio::sync::mpsc;

mod host;
mod scenario;

use host::{ConsoleSurface, HostView, ScriptedLocation};
use scenario::{Scenario, Step};

/// Replays a scenario against the bridge and prints outbound events as JSON lines
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: mapbridge-app <scenario.json>")?;
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let scenario: Scenario =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?;

    let (sink, events) = ChannelEventSink::new();
    let (request_tx, mut request_rx) = mpsc::unbounded_channel();
    let builder = MapBridgeBuilder::new()
        .with_options(scenario.options)
        .with_location_provider(Arc::new(ScriptedLocation(scenario.location)))
        .with_event_sink(Arc::new(sink))
        .with_view(HostView::new(scenario.view_id, request_tx));
    // The default icon fetcher owns a blocking HTTP client; it must be
    // created and dropped off the async workers.
    let bridge = tokio::task::spawn_blocking(move || builder.build()).await??;

    let mut surfaces: HashMap<u64, Arc<ConsoleSurface>> = HashMap::default();

    for (index, step) in scenario.steps.into_iter().enumerate() {
        match step {
            Step::Property { name, value } => {
                if let Err(e) = bridge.set_property(&name, value) {
                    log::warn!("step {}: {}", index, e);
                }
            }
            Step::Ready { surface } => {
                let mut requests = 0;
                while request_rx.try_recv().is_ok() {
                    requests += 1;
                }
                log::info!(
                    "step {}: surface {} ready ({} pending request(s))",
                    index,
                    surface,
                    requests
                );

                let surface = surfaces
                    .entry(surface)
                    .or_insert_with(|| ConsoleSurface::new(surface))
                    .clone();
                let bridge = bridge.clone();
                // Icon fetches block; keep them off the async workers
                tokio::task::spawn_blocking(move || bridge.on_surface_ready(surface))
                    .await
                    .context("apply pass panicked")?;
            }
            Step::DropSurface { surface } => {
                if surfaces.remove(&surface).is_none() {
                    log::warn!("step {}: surface {} does not exist", index, surface);
                }
            }
            Step::Callback { surface, callback } => match surfaces.get(&surface) {
                Some(target) => {
                    if let Err(e) = target.dispatch(callback) {
                        log::warn!("step {}: {}", index, e);
                    }
                }
                None => log::warn!("step {}: surface {} does not exist", index, surface),
            },
        }

        for envelope in events.try_iter() {
            println!("{}", serde_json::to_string(&envelope)?);
        }
    }

    tokio::task::spawn_blocking(move || drop(bridge)).await?;
    Ok(())
}
