//! Outbound intents from the bridge to the host.

mod url_scheme;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::bridge::{ExpandProperties, OrientationProperties, ResizeProperties};

pub use url_scheme::{UrlSchemeCodec, UrlSchemeError, UrlSchemeSink, DEFAULT_SCHEME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    Close,
    Expand {
        properties: ExpandProperties,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Resize {
        properties: ResizeProperties,
    },
    SetOrientationProperties {
        properties: OrientationProperties,
    },
    Open {
        url: String,
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

impl Command {
    /// Protocol name of the command, as used in the URL-scheme host part.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Close => "close",
            Command::Expand { .. } => "expand",
            Command::Resize { .. } => "resize",
            Command::SetOrientationProperties { .. } => "setOrientationProperties",
            Command::Open { .. } => "open",
            Command::CreateCalendarEvent { .. } => "createCalendarEvent",
            Command::PlayVideo { .. } => "playVideo",
            Command::StorePicture { .. } => "storePicture",
        }
    }
}

/// Host-supplied receiver of outbound commands.
///
/// Delivery is fire-and-forget: any result comes back later through the
/// host update channel.
pub trait CommandSink {
    fn send(&self, command: Command);
}

/// Sink that keeps every command it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: RefCell<Vec<Command>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }
}

impl CommandSink for RecordingSink {
    fn send(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }
}
