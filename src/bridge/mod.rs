//! In-page half of the MRAID presentation protocol.
//!
//! A [`PresentationBridge`] owns everything one webview's creative can see:
//! lifecycle state, placement type, viewability, the expand/orientation/resize
//! property bags and the listener registry. Creative code drives it through
//! the command surface (`close`, `expand`, `resize`, ...), the host drives it
//! through the update channel (`state_change_event`, `set_is_viewable`, ...),
//! and outbound intents leave through a [`CommandSink`].
//!
//! The bridge is single-threaded. It never holds a borrow of its own state
//! while calling a listener or the sink, so both may call back into it.

mod commands;
pub mod error;
pub mod events;
mod host;
pub mod state;

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, error, warn};

use crate::transport::{Command, CommandSink};

pub use error::{BridgeError, Operation};
pub use events::{listener, BridgeEvent, EventName, EventRegistry, Listener, ListenerId};
pub use host::HostMessage;
pub use state::{
    ClosePosition, ExpandProperties, ForceOrientation, LifecycleState, OrientationProperties,
    ParseValueError, PlacementType, ResizeProperties, StateStore,
};

/// Protocol version reported by [`PresentationBridge::version`].
pub const MRAID_VERSION: &str = "2.0";

/// How many error reports may nest (an error listener triggering another
/// error) before further reports are only logged.
const MAX_NESTED_ERROR_REPORTS: u32 = 4;

pub struct PresentationBridge {
    store: RefCell<StateStore>,
    registry: RefCell<EventRegistry>,
    sink: Rc<dyn CommandSink>,
    error_depth: Cell<u32>,
}

impl PresentationBridge {
    pub fn new(sink: Rc<dyn CommandSink>) -> Self {
        Self::with_store(sink, StateStore::default())
    }

    pub fn with_store(sink: Rc<dyn CommandSink>, store: StateStore) -> Self {
        Self {
            store: RefCell::new(store),
            registry: RefCell::new(EventRegistry::new()),
            sink,
            error_depth: Cell::new(0),
        }
    }

    #[doc(alias = "getVersion")]
    pub fn version(&self) -> &'static str {
        MRAID_VERSION
    }

    #[doc(alias = "getState")]
    pub fn state(&self) -> LifecycleState {
        self.store.borrow().state
    }

    #[doc(alias = "getPlacementType")]
    pub fn placement_type(&self) -> PlacementType {
        self.store.borrow().placement_type
    }

    #[doc(alias = "isViewable")]
    pub fn is_viewable(&self) -> bool {
        self.store.borrow().viewable
    }

    #[doc(alias = "getExpandProperties")]
    pub fn expand_properties(&self) -> ExpandProperties {
        self.store.borrow().expand
    }

    #[doc(alias = "getOrientationProperties")]
    pub fn orientation_properties(&self) -> OrientationProperties {
        self.store.borrow().orientation
    }

    #[doc(alias = "getResizeProperties")]
    pub fn resize_properties(&self) -> ResizeProperties {
        self.store.borrow().resize
    }

    /// Copy of the whole state record.
    pub fn snapshot(&self) -> StateStore {
        self.store.borrow().clone()
    }

    /// Subscribe `listener` to `name`.
    ///
    /// Registering the same `Listener` twice for one event is a no-op that
    /// returns the original handle.
    pub fn add_event_listener(&self, name: EventName, listener: Listener) -> ListenerId {
        let id = self.registry.borrow_mut().add(name, listener);
        debug!(target: "mraid", event = %name, ?id, "listener added");
        id
    }

    /// String-keyed variant of [`add_event_listener`](Self::add_event_listener).
    /// Unknown names are reported through the `error` event.
    pub fn add_event_listener_named(&self, name: &str, listener: Listener) -> Option<ListenerId> {
        match name.parse::<EventName>() {
            Ok(name) => Some(self.add_event_listener(name, listener)),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    /// Unsubscribe one listener, or every listener of `name` when `id` is
    /// `None`. Removing a handle that is not registered for `name` raises an
    /// `error` event rather than failing.
    pub fn remove_event_listener(&self, name: EventName, id: Option<ListenerId>) {
        let Some(id) = id else {
            let removed = self.registry.borrow_mut().clear(name);
            debug!(target: "mraid", event = %name, removed, "listeners cleared");
            return;
        };

        let removed = self.registry.borrow_mut().remove(name, id);
        if removed {
            debug!(target: "mraid", event = %name, ?id, "listener removed");
        } else {
            self.report(BridgeError::UnregisteredListener(name));
        }
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        self.registry.borrow().len(name)
    }

    /// Deliver `event` to a snapshot of its listeners, in registration order.
    ///
    /// A listener that errors or panics is logged and skipped; the rest still
    /// run.
    pub(crate) fn emit(&self, event: BridgeEvent) {
        let name = event.name();
        let listeners = self.registry.borrow().snapshot(name);
        for (index, listener) in listeners.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| listener(self, &event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(target: "mraid", event = %name, index, error = %err, "listener failed");
                }
                Err(_) => {
                    error!(target: "mraid", event = %name, index, "listener panicked");
                }
            }
        }
    }

    /// Forward an intent to the host.
    pub(crate) fn send(&self, command: Command) {
        debug!(target: "mraid", command = command.name(), "sending command");
        self.sink.send(command);
    }

    /// Surface a protocol error to creative code as an `error` event.
    pub(crate) fn report(&self, err: BridgeError) {
        let action = err.operation().as_str();
        let message = err.to_string();
        warn!(target: "mraid", action, "{message}");

        let depth = self.error_depth.get();
        if depth >= MAX_NESTED_ERROR_REPORTS {
            error!(target: "mraid", action, depth, "dropping nested error report");
            return;
        }
        self.error_depth.set(depth + 1);
        self.error_event(&message, action);
        self.error_depth.set(depth);
    }
}
