use tracing::debug;

use super::error::{BridgeError, Operation};
use super::state::{ExpandProperties, LifecycleState, OrientationProperties, ResizeProperties};
use super::PresentationBridge;
use crate::transport::Command;

/// Creative-facing operations.
///
/// State-changing commands are sent to the host before the local
/// `stateChange` event fires, so listeners always observe the command
/// already in flight.
impl PresentationBridge {
    /// Close an expanded ad, or hide an ad in its default state.
    pub fn close(&self) {
        let next = match self.state() {
            LifecycleState::Default => LifecycleState::Hidden,
            LifecycleState::Expanded => LifecycleState::Default,
            LifecycleState::Hidden => {
                self.report(BridgeError::AlreadyHidden {
                    operation: Operation::Close,
                });
                return;
            }
            state @ LifecycleState::Loading => {
                self.report(BridgeError::IllegalStateTransition {
                    operation: Operation::Close,
                    state,
                });
                return;
            }
        };

        self.send(Command::Close);
        self.state_change_event(next);
    }

    /// Expand a default-state ad, optionally loading `url` in the expanded
    /// view.
    pub fn expand(&self, url: Option<&str>) {
        let state = self.state();
        if state != LifecycleState::Default {
            self.report(BridgeError::IllegalStateTransition {
                operation: Operation::Expand,
                state,
            });
            return;
        }

        self.send(Command::Expand {
            properties: self.expand_properties(),
            url: url.map(str::to_string),
        });
        self.state_change_event(LifecycleState::Expanded);
        if let Some(url) = url {
            self.send(Command::Open {
                url: url.to_string(),
            });
        }
    }

    /// Ask the host to open `url`. Valid in every state.
    pub fn open(&self, url: &str) {
        self.send(Command::Open {
            url: url.to_string(),
        });
    }

    /// Store expand properties. `is_modal` is always stored as `true`.
    pub fn set_expand_properties(&self, properties: ExpandProperties) {
        let properties = ExpandProperties {
            is_modal: true,
            ..properties
        };
        debug!(target: "mraid", ?properties, "expand properties updated");
        self.store.borrow_mut().expand = properties;
    }

    pub fn use_custom_close(&self, enabled: bool) {
        let properties = ExpandProperties {
            use_custom_close: enabled,
            ..self.expand_properties()
        };
        self.set_expand_properties(properties);
    }

    /// Store orientation properties and forward them to the host unchanged.
    pub fn set_orientation_properties(&self, properties: OrientationProperties) {
        self.store.borrow_mut().orientation = properties;
        self.send(Command::SetOrientationProperties { properties });
    }

    pub fn set_resize_properties(&self, properties: ResizeProperties) {
        debug!(target: "mraid", ?properties, "resize properties updated");
        self.store.borrow_mut().resize = properties;
    }

    /// Ask the host to resize the ad using the stored resize properties.
    ///
    /// Does not change the lifecycle state.
    pub fn resize(&self) {
        let properties = self.resize_properties();
        if !properties.is_configured() {
            self.report(BridgeError::PreconditionUnmet {
                operation: Operation::Resize,
                requirement: "mraid.setResizeProperties()",
            });
            return;
        }
        self.send(Command::Resize { properties });
    }

    /// Hand a W3C calendar event object to the host. The payload is not
    /// inspected here.
    pub fn create_calendar_event(&self, payload: serde_json::Value) {
        self.send(Command::CreateCalendarEvent { payload });
    }

    pub fn play_video(&self, uri: &str) {
        self.send(Command::PlayVideo {
            uri: uri.to_string(),
        });
    }

    pub fn store_picture(&self, uri: &str) {
        self.send(Command::StorePicture {
            uri: uri.to_string(),
        });
    }
}
