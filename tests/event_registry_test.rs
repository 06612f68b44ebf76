use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::anyhow;
use mraid_bridge::bridge::{
    listener, BridgeEvent, EventName, LifecycleState, ListenerId, PresentationBridge,
};
use mraid_bridge::transport::RecordingSink;

fn new_bridge() -> PresentationBridge {
    PresentationBridge::new(Rc::new(RecordingSink::new()))
}

fn counter(bridge: &PresentationBridge, name: EventName) -> (Rc<Cell<usize>>, ListenerId) {
    let count = Rc::new(Cell::new(0));
    let captured = Rc::clone(&count);
    let id = bridge.add_event_listener(
        name,
        listener(move |_, _| {
            captured.set(captured.get() + 1);
            Ok(())
        }),
    );
    (count, id)
}

fn collect_errors(bridge: &PresentationBridge) -> Rc<RefCell<Vec<(String, String)>>> {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&errors);
    bridge.add_event_listener(
        EventName::Error,
        listener(move |_, event| {
            if let BridgeEvent::Error { message, action } = event {
                captured
                    .borrow_mut()
                    .push((message.clone(), action.clone()));
            }
            Ok(())
        }),
    );
    errors
}

#[test]
fn adding_the_same_listener_twice_delivers_once() {
    let bridge = new_bridge();
    let calls = Rc::new(Cell::new(0));
    let captured = Rc::clone(&calls);
    let on_ready = listener(move |_, _| {
        captured.set(captured.get() + 1);
        Ok(())
    });

    let first = bridge.add_event_listener(EventName::Ready, Rc::clone(&on_ready));
    let second = bridge.add_event_listener(EventName::Ready, on_ready);
    bridge.ready_event();

    assert_eq!(first, second);
    assert_eq!(bridge.listener_count(EventName::Ready), 1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn removing_unregistered_listener_raises_one_error_event() {
    let bridge = new_bridge();
    let errors = collect_errors(&bridge);
    let (_, ready_id) = counter(&bridge, EventName::Ready);

    // registered for ready, not for error
    bridge.remove_event_listener(EventName::Error, Some(ready_id));

    let errors = errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].0.contains("unregistered listener"),
        "message: {}",
        errors[0].0
    );
    assert_eq!(errors[0].1, "mraid.removeEventListener()");
    assert_eq!(bridge.listener_count(EventName::Ready), 1);
}

#[test]
fn removed_listener_stops_receiving_events() {
    let bridge = new_bridge();
    let (count, id) = counter(&bridge, EventName::ViewableChange);

    bridge.set_is_viewable(true);
    bridge.remove_event_listener(EventName::ViewableChange, Some(id));
    bridge.set_is_viewable(false);

    assert_eq!(count.get(), 1);
    assert_eq!(bridge.listener_count(EventName::ViewableChange), 0);
}

#[test]
fn removing_without_handle_clears_event_silently() {
    let bridge = new_bridge();
    let errors = collect_errors(&bridge);
    let (first, _) = counter(&bridge, EventName::StateChange);
    let (second, _) = counter(&bridge, EventName::StateChange);

    bridge.remove_event_listener(EventName::StateChange, None);
    bridge.state_change_event(LifecycleState::Default);

    assert_eq!(first.get() + second.get(), 0);
    assert!(errors.borrow().is_empty());
    assert_eq!(bridge.listener_count(EventName::Error), 1);
}

#[test]
fn listeners_run_in_registration_order() {
    let bridge = new_bridge();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["a", "b", "c"] {
        let order = Rc::clone(&order);
        bridge.add_event_listener(
            EventName::Ready,
            listener(move |_, _| {
                order.borrow_mut().push(tag);
                Ok(())
            }),
        );
    }

    bridge.ready_event();

    assert_eq!(*order.borrow(), ["a", "b", "c"]);
}

#[test]
fn listener_can_unsubscribe_itself_during_dispatch() {
    let bridge = new_bridge();
    let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
    let self_calls = Rc::new(Cell::new(0));
    let id = {
        let own_id = Rc::clone(&own_id);
        let self_calls = Rc::clone(&self_calls);
        bridge.add_event_listener(
            EventName::Ready,
            listener(move |bridge, _| {
                self_calls.set(self_calls.get() + 1);
                bridge.remove_event_listener(EventName::Ready, own_id.get());
                Ok(())
            }),
        )
    };
    own_id.set(Some(id));
    let (later, _) = counter(&bridge, EventName::Ready);

    bridge.ready_event();
    bridge.ready_event();

    assert_eq!(self_calls.get(), 1);
    assert_eq!(later.get(), 2);
}

#[test]
fn listener_added_during_dispatch_waits_for_next_event() {
    let bridge = new_bridge();
    let late_calls = Rc::new(Cell::new(0));
    {
        let late_calls = Rc::clone(&late_calls);
        let late = listener(move |_, _| {
            late_calls.set(late_calls.get() + 1);
            Ok(())
        });
        bridge.add_event_listener(
            EventName::Ready,
            listener(move |bridge, _| {
                bridge.add_event_listener(EventName::Ready, Rc::clone(&late));
                Ok(())
            }),
        );
    }

    bridge.ready_event();
    assert_eq!(late_calls.get(), 0);

    bridge.ready_event();
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn failing_listeners_do_not_block_later_ones() {
    let bridge = new_bridge();
    bridge.add_event_listener(
        EventName::StateChange,
        listener(|_, _| Err(anyhow!("creative bug"))),
    );
    bridge.add_event_listener(
        EventName::StateChange,
        listener(|_, _| panic!("creative panic")),
    );
    let (count, _) = counter(&bridge, EventName::StateChange);

    bridge.state_change_event(LifecycleState::Default);
    bridge.state_change_event(LifecycleState::Expanded);

    assert_eq!(count.get(), 2);
    assert_eq!(bridge.state(), LifecycleState::Expanded);
}

#[test]
fn error_listener_triggering_errors_does_not_recurse_forever() {
    let bridge = new_bridge();
    let calls = Rc::new(Cell::new(0));
    let (_, stale) = counter(&bridge, EventName::Ready);
    bridge.remove_event_listener(EventName::Ready, Some(stale));
    {
        let calls = Rc::clone(&calls);
        bridge.add_event_listener(
            EventName::Error,
            listener(move |bridge, _| {
                calls.set(calls.get() + 1);
                bridge.remove_event_listener(EventName::Ready, Some(stale));
                Ok(())
            }),
        );
    }

    bridge.remove_event_listener(EventName::Ready, Some(stale));

    assert!(calls.get() >= 1);
    assert!(calls.get() <= 4, "error listener ran {} times", calls.get());
}

#[test]
fn error_listener_removing_itself_while_handling_error() {
    let bridge = new_bridge();
    let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
    let calls = Rc::new(Cell::new(0));
    let id = {
        let own_id = Rc::clone(&own_id);
        let calls = Rc::clone(&calls);
        bridge.add_event_listener(
            EventName::Error,
            listener(move |bridge, _| {
                calls.set(calls.get() + 1);
                // second removal hits an unregistered handle and reports again
                bridge.remove_event_listener(EventName::Error, own_id.get());
                bridge.remove_event_listener(EventName::Error, own_id.get());
                Ok(())
            }),
        )
    };
    own_id.set(Some(id));

    bridge.error_event("boom", "host");

    assert_eq!(calls.get(), 1);
    assert_eq!(bridge.listener_count(EventName::Error), 0);
}

#[test]
fn unknown_event_name_is_reported() {
    let bridge = new_bridge();
    let errors = collect_errors(&bridge);

    let id = bridge.add_event_listener_named("click", listener(|_, _| Ok(())));
    let known = bridge.add_event_listener_named("stateChange", listener(|_, _| Ok(())));

    assert!(id.is_none());
    assert!(known.is_some());
    let errors = errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].0.contains("'click'"));
    assert_eq!(errors[0].1, "mraid.addEventListener()");
}
