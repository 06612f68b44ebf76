use std::cell::RefCell;
use std::rc::Rc;

use mraid_bridge::bridge::{
    ClosePosition, ExpandProperties, LifecycleState, PresentationBridge, ResizeProperties,
};
use mraid_bridge::transport::{Command, UrlSchemeCodec, UrlSchemeSink};
use serde_json::json;

fn url_bridge(codec: UrlSchemeCodec) -> (Rc<RefCell<Vec<String>>>, PresentationBridge) {
    let opened = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&opened);
    let sink = UrlSchemeSink::new(codec, move |url| captured.borrow_mut().push(url.to_string()));
    (opened, PresentationBridge::new(Rc::new(sink)))
}

#[test]
fn expand_and_close_produce_command_urls() {
    let (opened, bridge) = url_bridge(UrlSchemeCodec::default());
    bridge.state_change_event(LifecycleState::Default);
    bridge.set_expand_properties(ExpandProperties {
        width: 300,
        height: 250,
        use_custom_close: true,
        is_modal: false,
    });

    bridge.expand(Some("https://x.test/landing?a=1&b=2"));
    bridge.close();

    assert_eq!(
        *opened.borrow(),
        [
            "mraid://expand/?w=300&h=250&useCustomClose=true&url=https%3A%2F%2Fx.test%2Flanding%3Fa%3D1%26b%3D2",
            "mraid://open/?url=https%3A%2F%2Fx.test%2Flanding%3Fa%3D1%26b%3D2",
            "mraid://close/",
        ]
    );
    assert_eq!(bridge.state(), LifecycleState::Default);
}

#[test]
fn resize_url_carries_configured_height() {
    let (opened, bridge) = url_bridge(UrlSchemeCodec::default());
    let properties = ResizeProperties {
        width: 320,
        height: 50,
        offset_x: 0,
        offset_y: 12,
        custom_close_position: ClosePosition::TopLeft,
        allow_offscreen: true,
    };
    bridge.set_resize_properties(properties);

    bridge.resize();

    let opened = opened.borrow();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].contains("&h=50&"), "url: {}", opened[0]);
    assert_eq!(
        UrlSchemeCodec::default().decode(&opened[0]).unwrap(),
        Command::Resize { properties }
    );
}

#[test]
fn calendar_event_and_video_are_separate_commands() {
    let (opened, bridge) = url_bridge(UrlSchemeCodec::new("adbridge").unwrap());

    bridge.create_calendar_event(json!({"summary": "Demo day"}));
    bridge.play_video("https://cdn.test/v.mp4");

    let opened = opened.borrow();
    assert_eq!(
        opened[0],
        "adbridge://createCalendarEvent/?p=%7B%22summary%22%3A%22Demo%20day%22%7D"
    );
    assert_eq!(
        opened[1],
        "adbridge://playVideo/?uri=https%3A%2F%2Fcdn.test%2Fv.mp4"
    );
}

#[test]
fn rejected_calls_produce_no_urls() {
    let (opened, bridge) = url_bridge(UrlSchemeCodec::default());

    bridge.close();
    bridge.expand(None);
    bridge.resize();

    assert!(opened.borrow().is_empty());
}
