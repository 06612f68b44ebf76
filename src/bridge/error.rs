use std::fmt;

use thiserror::Error;

use super::events::EventName;
use super::state::LifecycleState;

/// The API entry point a reported error originated from.
///
/// Rendered as the action string delivered alongside `error` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddEventListener,
    RemoveEventListener,
    Close,
    Expand,
    Resize,
    HostUpdate,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddEventListener => "mraid.addEventListener()",
            Operation::RemoveEventListener => "mraid.removeEventListener()",
            Operation::Close => "mraid.close()",
            Operation::Expand => "mraid.expand()",
            Operation::Resize => "mraid.resize()",
            Operation::HostUpdate => "mraid.util",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol errors surfaced to creative code through the `error` event.
///
/// None of these are fatal; the bridge keeps running after reporting them.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{operation} called while state is '{state}'")]
    IllegalStateTransition {
        operation: Operation,
        state: LifecycleState,
    },
    #[error("{operation} called while ad was already hidden")]
    AlreadyHidden { operation: Operation },
    #[error("{operation} called before {requirement}")]
    PreconditionUnmet {
        operation: Operation,
        requirement: &'static str,
    },
    #[error("an unregistered listener was requested to be removed from '{0}'")]
    UnregisteredListener(EventName),
    #[error("'{0}' is not a recognized event name")]
    InvalidEventName(String),
    #[error("malformed host update: {0}")]
    MalformedHostMessage(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn operation(&self) -> Operation {
        match self {
            BridgeError::IllegalStateTransition { operation, .. }
            | BridgeError::AlreadyHidden { operation }
            | BridgeError::PreconditionUnmet { operation, .. } => *operation,
            BridgeError::UnregisteredListener(_) => Operation::RemoveEventListener,
            BridgeError::InvalidEventName(_) => Operation::AddEventListener,
            BridgeError::MalformedHostMessage(_) => Operation::HostUpdate,
        }
    }
}
