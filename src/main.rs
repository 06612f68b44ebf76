use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use mraid_bridge::bridge::{listener, BridgeEvent, EventName, PresentationBridge, StateStore};
use mraid_bridge::config::{BridgeConfig, CONFIG_ENV};
use mraid_bridge::scenario::Scenario;
use mraid_bridge::transport::UrlSchemeSink;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let subscriber_result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if subscriber_result.is_err() {
        // tracing was already initialised; continue silently
    }

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

/// Replay a scenario against a fresh bridge. Outbound command URLs go to
/// stdout, one per line; events and diagnostics go to the log on stderr.
fn run() -> Result<()> {
    let scenario_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: mraid-bridge <scenario.yaml>")?;

    let config = BridgeConfig::from_env()
        .with_context(|| format!("failed to load configuration from ${CONFIG_ENV}"))?;
    let scenario = Scenario::load(&scenario_path)
        .with_context(|| format!("failed to load scenario {}", scenario_path.display()))?;

    let sink = UrlSchemeSink::new(config.codec.clone(), |url| println!("{url}"));
    let bridge =
        PresentationBridge::with_store(Rc::new(sink), StateStore::new(config.placement_type));
    for name in EventName::ALL {
        bridge.add_event_listener(name, listener(log_event));
    }

    info!(
        scheme = config.codec.scheme(),
        steps = scenario.steps.len(),
        version = bridge.version(),
        "running scenario"
    );
    scenario.run(&bridge);

    let snapshot = bridge.snapshot();
    info!(
        state = %snapshot.state,
        placement_type = %snapshot.placement_type,
        viewable = snapshot.viewable,
        "scenario finished"
    );
    Ok(())
}

fn log_event(_bridge: &PresentationBridge, event: &BridgeEvent) -> Result<()> {
    match event {
        BridgeEvent::Ready => info!("event: ready"),
        BridgeEvent::Error { message, action } => {
            info!(%action, "event: error: {message}")
        }
        BridgeEvent::ViewableChange(viewable) => info!(viewable, "event: viewableChange"),
        BridgeEvent::StateChange(state) => info!(%state, "event: stateChange"),
    }
    Ok(())
}
