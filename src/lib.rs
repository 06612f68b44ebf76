//! Presentation bridge between an embedded ad creative and its host
//! container, speaking the MRAID 2.0 state/event/command protocol.

pub mod bridge;
pub mod config;
pub mod scenario;
pub mod transport;

pub use bridge::{
    listener, BridgeError, BridgeEvent, EventName, LifecycleState, Listener, ListenerId,
    PlacementType, PresentationBridge, MRAID_VERSION,
};
pub use config::BridgeConfig;
pub use transport::{Command, CommandSink, RecordingSink, UrlSchemeCodec, UrlSchemeSink};
