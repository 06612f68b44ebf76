use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use super::error::BridgeError;
use super::state::LifecycleState;
use super::PresentationBridge;

/// The four events creative code may subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Ready,
    Error,
    ViewableChange,
    StateChange,
}

impl EventName {
    pub const ALL: [EventName; 4] = [
        EventName::Ready,
        EventName::Error,
        EventName::ViewableChange,
        EventName::StateChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Ready => "ready",
            EventName::Error => "error",
            EventName::ViewableChange => "viewableChange",
            EventName::StateChange => "stateChange",
        }
    }

    fn slot(self) -> usize {
        match self {
            EventName::Ready => 0,
            EventName::Error => 1,
            EventName::ViewableChange => 2,
            EventName::StateChange => 3,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = BridgeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == raw)
            .ok_or_else(|| BridgeError::InvalidEventName(raw.to_string()))
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Ready,
    Error { message: String, action: String },
    ViewableChange(bool),
    StateChange(LifecycleState),
}

impl BridgeEvent {
    pub fn name(&self) -> EventName {
        match self {
            BridgeEvent::Ready => EventName::Ready,
            BridgeEvent::Error { .. } => EventName::Error,
            BridgeEvent::ViewableChange(_) => EventName::ViewableChange,
            BridgeEvent::StateChange(_) => EventName::StateChange,
        }
    }
}

/// Opaque handle returned on subscription and used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A creative-supplied callback. Listeners get the bridge back so they can
/// query state or issue commands while handling an event.
pub type Listener = Rc<dyn Fn(&PresentationBridge, &BridgeEvent) -> anyhow::Result<()>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&PresentationBridge, &BridgeEvent) -> anyhow::Result<()> + 'static,
{
    Rc::new(callback)
}

struct Entry {
    id: ListenerId,
    listener: Listener,
}

/// Per-event ordered listener lists.
///
/// A given `Listener` allocation appears at most once per event; adding it
/// again hands back the handle it was first registered under.
#[derive(Default)]
pub struct EventRegistry {
    slots: [Vec<Entry>; 4],
    next_id: u64,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: EventName, listener: Listener) -> ListenerId {
        let slot = &mut self.slots[name.slot()];
        if let Some(existing) = slot
            .iter()
            .find(|entry| same_allocation(&entry.listener, &listener))
        {
            return existing.id;
        }

        self.next_id += 1;
        let id = ListenerId(self.next_id);
        slot.push(Entry { id, listener });
        id
    }

    /// Remove `id` from `name`'s list. Returns false when it was not there.
    pub fn remove(&mut self, name: EventName, id: ListenerId) -> bool {
        let slot = &mut self.slots[name.slot()];
        match slot.iter().position(|entry| entry.id == id) {
            Some(index) => {
                slot.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every listener for `name`, returning how many were removed.
    pub fn clear(&mut self, name: EventName) -> usize {
        let slot = &mut self.slots[name.slot()];
        let removed = slot.len();
        slot.clear();
        removed
    }

    pub fn contains(&self, name: EventName, id: ListenerId) -> bool {
        self.slots[name.slot()].iter().any(|entry| entry.id == id)
    }

    pub fn len(&self, name: EventName) -> usize {
        self.slots[name.slot()].len()
    }

    pub fn is_empty(&self, name: EventName) -> bool {
        self.slots[name.slot()].is_empty()
    }

    /// Copy of `name`'s listeners in registration order, taken so dispatch
    /// can run while listeners add or remove entries.
    pub fn snapshot(&self, name: EventName) -> Vec<Listener> {
        self.slots[name.slot()]
            .iter()
            .map(|entry| Rc::clone(&entry.listener))
            .collect()
    }
}

fn same_allocation(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
