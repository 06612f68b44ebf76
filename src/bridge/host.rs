use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::BridgeError;
use super::events::BridgeEvent;
use super::state::{LifecycleState, PlacementType, Transition};
use super::PresentationBridge;

/// One call on the host update channel, in the JSON shape host-injected
/// scripts post, e.g. `{"type":"stateChange","state":"hidden"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    #[serde(rename_all = "camelCase")]
    SetPlacementType {
        placement_type: PlacementType,
    },
    Ready,
    Error {
        message: String,
        action: String,
    },
    SetIsViewable {
        viewable: bool,
    },
    StateChange {
        state: LifecycleState,
    },
}

/// Entry points reserved for the host collaborator.
impl PresentationBridge {
    pub fn set_placement_type(&self, placement_type: PlacementType) {
        debug!(target: "mraid", %placement_type, "placement type set");
        self.store.borrow_mut().placement_type = placement_type;
    }

    /// Fire `ready`. The host calls this once, after initial setup.
    pub fn ready_event(&self) {
        self.emit(BridgeEvent::Ready);
    }

    pub fn error_event(&self, message: &str, action: &str) {
        self.emit(BridgeEvent::Error {
            message: message.to_string(),
            action: action.to_string(),
        });
    }

    /// Update viewability, firing `viewableChange` only on an actual change.
    ///
    /// A hidden ad is never viewable, so `true` is ignored while hidden.
    pub fn set_is_viewable(&self, viewable: bool) {
        {
            let mut store = self.store.borrow_mut();
            if viewable && store.state == LifecycleState::Hidden {
                debug!(target: "mraid", "ignoring viewable update while hidden");
                return;
            }
            if store.viewable == viewable {
                return;
            }
            store.viewable = viewable;
        }
        debug!(target: "mraid", viewable, "viewability changed");
        self.emit(BridgeEvent::ViewableChange(viewable));
    }

    /// Move to `next`, firing `stateChange` only on an actual change.
    ///
    /// Entering `hidden` clears viewability together with the state, and its
    /// `viewableChange` is delivered before the `stateChange`.
    pub fn state_change_event(&self, next: LifecycleState) {
        let transition = self.store.borrow_mut().transition(next);
        let Transition::Changed {
            viewability_cleared,
        } = transition
        else {
            return;
        };

        debug!(target: "mraid", state = %next, "state changed");
        if viewability_cleared {
            self.emit(BridgeEvent::ViewableChange(false));
        }
        self.emit(BridgeEvent::StateChange(next));
    }

    pub fn apply(&self, message: HostMessage) {
        match message {
            HostMessage::SetPlacementType { placement_type } => {
                self.set_placement_type(placement_type)
            }
            HostMessage::Ready => self.ready_event(),
            HostMessage::Error { message, action } => self.error_event(&message, &action),
            HostMessage::SetIsViewable { viewable } => self.set_is_viewable(viewable),
            HostMessage::StateChange { state } => self.state_change_event(state),
        }
    }

    /// Parse and apply a JSON host message. Malformed input is reported
    /// through the `error` event and otherwise ignored.
    pub fn apply_host_message(&self, raw: &str) {
        match serde_json::from_str::<HostMessage>(raw) {
            Ok(message) => self.apply(message),
            Err(err) => self.report(BridgeError::MalformedHostMessage(err)),
        }
    }
}
