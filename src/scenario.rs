//! Scripted sequences of host updates and creative calls, used by the
//! `mraid-bridge` harness to exercise a bridge without a webview.
//!
//! ```yaml
//! steps:
//!   - host: { type: stateChange, state: default }
//!   - creative: { call: expand, url: "https://example.com/landing" }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::bridge::{
    ExpandProperties, HostMessage, OrientationProperties, PresentationBridge, ResizeProperties,
};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A call creative code makes on the bridge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum CreativeCall {
    Close,
    Expand {
        #[serde(default)]
        url: Option<String>,
    },
    Open {
        url: String,
    },
    Resize,
    SetExpandProperties {
        properties: ExpandProperties,
    },
    SetOrientationProperties {
        properties: OrientationProperties,
    },
    SetResizeProperties {
        properties: ResizeProperties,
    },
    UseCustomClose {
        enabled: bool,
    },
    CreateCalendarEvent {
        payload: serde_json::Value,
    },
    PlayVideo {
        uri: String,
    },
    StorePicture {
        uri: String,
    },
}

impl CreativeCall {
    pub fn apply(&self, bridge: &PresentationBridge) {
        match self {
            CreativeCall::Close => bridge.close(),
            CreativeCall::Expand { url } => bridge.expand(url.as_deref()),
            CreativeCall::Open { url } => bridge.open(url),
            CreativeCall::Resize => bridge.resize(),
            CreativeCall::SetExpandProperties { properties } => {
                bridge.set_expand_properties(*properties)
            }
            CreativeCall::SetOrientationProperties { properties } => {
                bridge.set_orientation_properties(*properties)
            }
            CreativeCall::SetResizeProperties { properties } => {
                bridge.set_resize_properties(*properties)
            }
            CreativeCall::UseCustomClose { enabled } => bridge.use_custom_close(*enabled),
            CreativeCall::CreateCalendarEvent { payload } => {
                bridge.create_calendar_event(payload.clone())
            }
            CreativeCall::PlayVideo { uri } => bridge.play_video(uri),
            CreativeCall::StorePicture { uri } => bridge.store_picture(uri),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    Host { host: HostMessage },
    Creative { creative: CreativeCall },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Apply every step in order.
    pub fn run(&self, bridge: &PresentationBridge) {
        for (index, step) in self.steps.iter().enumerate() {
            debug!(target: "mraid::scenario", index, ?step, "applying step");
            match step {
                ScenarioStep::Host { host } => bridge.apply(host.clone()),
                ScenarioStep::Creative { creative } => creative.apply(bridge),
            }
        }
    }
}
