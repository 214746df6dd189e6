//! Integration tests for the embed bridge and height beacon:
//! - Navigation target composition (trusted origin + entity/id query)
//! - Token relay ordering: deferred until first load, exactly once
//! - Origin discipline: token posts are never wildcard, never in the URL
//! - Beacon throttling, frameId echo and teardown

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use embed_bridge::{
    ChannelError, DocumentMetrics, EmbedBridge, HeightBeacon, MessageSink, MessageTarget, Surface,
    SurfaceState, TrustedOrigin,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use url::Url;

#[derive(Default)]
struct ChannelLog {
    navigations: Vec<String>,
    posts: Vec<(String, Value)>,
    fail_posts: bool,
}

#[derive(Clone, Default)]
struct FakeSurface(Rc<RefCell<ChannelLog>>);

impl FakeSurface {
    fn log(&self) -> std::cell::Ref<'_, ChannelLog> {
        self.0.borrow()
    }

    fn failing() -> Self {
        let surface = FakeSurface::default();
        surface.0.borrow_mut().fail_posts = true;
        surface
    }
}

impl MessageSink for FakeSurface {
    fn post(&mut self, target: &MessageTarget, message: &Value) -> Result<(), ChannelError> {
        if self.0.borrow().fail_posts {
            return Err(ChannelError("surface navigated away".into()));
        }
        self.0
            .borrow_mut()
            .posts
            .push((target.as_target_str().to_string(), message.clone()));
        Ok(())
    }
}

impl Surface for FakeSurface {
    fn navigate(&mut self, target: &Url) {
        self.0.borrow_mut().navigations.push(target.to_string());
    }
}

fn renderer_origin() -> TrustedOrigin {
    TrustedOrigin::parse("https://renderer.example").unwrap()
}

#[test]
fn configure_builds_exact_navigation_target() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");

    assert_eq!(
        surface.log().navigations,
        vec!["https://renderer.example/embed/entity?entity=invoice&id=42".to_string()]
    );
    assert_eq!(bridge.state(), SurfaceState::Loading);
}

#[test]
fn empty_parameters_are_omitted_from_the_query() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());

    bridge.configure("invoice", "");
    bridge.configure("", "");

    assert_eq!(
        surface.log().navigations,
        vec![
        "https://renderer.example/embed/entity?entity=invoice".to_string(),
        "https://renderer.example/embed/entity".to_string(),
    ]
    );
}

#[test]
fn mount_stays_sourceless_until_configured() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());

    assert_eq!(bridge.state(), SurfaceState::MountedNoSource);
    assert!(surface.log().navigations.is_empty());
}

#[test]
fn token_set_before_first_load_relays_exactly_once_on_ready() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");

    bridge.set_token(Some("abc".into()));
    assert!(surface.log().posts.is_empty(), "no relay before first load");

    bridge.surface_loaded();

    let log = surface.log();
    assert_eq!(
        log.posts,
        vec![(
            "https://renderer.example".to_string(),
            json!({ "type": "ENTITY_FORM_SET_TOKEN", "token": "abc" })
        )]
    );
}

#[test]
fn token_set_while_ready_relays_immediately() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");
    bridge.surface_loaded();

    bridge.set_token(Some("abc".into()));

    assert_eq!(surface.log().posts.len(), 1);
}

#[test]
fn load_without_token_relays_nothing() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");
    bridge.surface_loaded();

    assert!(surface.log().posts.is_empty());
}

#[test]
fn reconfigure_relays_latest_token_on_next_load() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");
    bridge.set_token(Some("old".into()));
    bridge.surface_loaded();

    bridge.configure("invoice", "43");
    assert_eq!(bridge.state(), SurfaceState::Loading);
    bridge.set_token(Some("new".into()));
    bridge.surface_loaded();

    let log = surface.log();
    assert_eq!(log.posts.len(), 2);
    assert_eq!(log.posts[1].1["token"], json!("new"));
    // always directed at the configured origin, never a stale target
    assert!(log.posts.iter().all(|(target, _)| target == "https://renderer.example"));
}

#[test]
fn token_never_appears_in_navigation_target() {
    for set_before_configure in [true, false] {
        let surface = FakeSurface::default();
        let mut bridge = EmbedBridge::new(renderer_origin());
        bridge.mount(surface.clone());

        if set_before_configure {
            bridge.set_token(Some("sekret".into()));
            bridge.configure("invoice", "42");
        } else {
            bridge.configure("invoice", "42");
            bridge.set_token(Some("sekret".into()));
        }
        bridge.surface_loaded();

        for navigation in surface.log().navigations.iter() {
            assert!(!navigation.contains("sekret"), "token leaked into {navigation}");
        }
        assert_eq!(
            bridge.navigation_target().unwrap().as_str(),
            "https://renderer.example/embed/entity?entity=invoice&id=42"
        );
    }
}

#[test]
fn token_relay_is_never_wildcard() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");
    bridge.set_token(Some("abc".into()));
    bridge.surface_loaded();

    assert!(surface.log().posts.iter().all(|(target, _)| target != "*"));
}

#[test]
fn relay_failure_is_contained() {
    let surface = FakeSurface::failing();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");
    bridge.set_token(Some("abc".into()));

    // must not panic or surface the error
    bridge.surface_loaded();
    assert_eq!(bridge.state(), SurfaceState::Ready);
}

#[test]
fn callbacks_after_detach_are_noops() {
    let surface = FakeSurface::default();
    let mut bridge = EmbedBridge::new(renderer_origin());
    bridge.mount(surface.clone());
    bridge.configure("invoice", "42");
    bridge.detach();

    bridge.set_token(Some("abc".into()));
    bridge.surface_loaded();

    assert_eq!(bridge.state(), SurfaceState::Detached);
    assert!(surface.log().posts.is_empty());
}

// ---------------------------------------------------------------------------
// Height beacon
// ---------------------------------------------------------------------------

fn embed_page_url(frame_id: Option<&str>) -> Url {
    match frame_id {
        Some(id) => Url::parse(&format!(
            "https://renderer.example/embed/entity?entity=invoice&frameId={id}"
        ))
        .unwrap(),
        None => Url::parse("https://renderer.example/embed/entity?entity=invoice").unwrap(),
    }
}

fn metrics(height: u32) -> DocumentMetrics {
    DocumentMetrics {
        body_scroll_height: height,
        root_scroll_height: height.saturating_sub(10),
        body_offset_height: height.saturating_sub(20),
        root_offset_height: height.saturating_sub(20),
        body_client_height: height.saturating_sub(30),
        root_client_height: height.saturating_sub(30),
    }
}

#[test]
fn beacon_reports_tallest_metric_with_frame_id() {
    let channel = FakeSurface::default();
    let mut beacon = HeightBeacon::new(channel.clone(), &embed_page_url(Some("f1")));
    let start = Instant::now();

    beacon.measure(&metrics(800), start);

    assert_eq!(
        channel.log().posts,
        vec![(
            "*".to_string(),
            json!({ "type": "EMBED_HEIGHT", "frameId": "f1", "height": 800 })
        )]
    );
}

#[test]
fn beacon_omits_frame_id_when_absent() {
    let channel = FakeSurface::default();
    let mut beacon = HeightBeacon::new(channel.clone(), &embed_page_url(None));
    assert_eq!(beacon.frame_id(), None);

    beacon.measure(&metrics(500), Instant::now());
    assert_eq!(
        channel.log().posts[0].1,
        json!({ "type": "EMBED_HEIGHT", "height": 500 })
    );
}

#[test]
fn beacon_throttles_to_one_report_per_window() {
    let channel = FakeSurface::default();
    let mut beacon = HeightBeacon::new(channel.clone(), &embed_page_url(Some("f1")));
    let start = Instant::now();

    beacon.measure(&metrics(800), start);
    beacon.measure(&metrics(900), start + Duration::from_millis(10));
    beacon.measure(&metrics(950), start + Duration::from_millis(20));
    assert_eq!(channel.log().posts.len(), 1, "inside the window");

    // window elapses, the parked measurement goes out
    beacon.poll(start + Duration::from_millis(70));
    let log = channel.log();
    assert_eq!(log.posts.len(), 2);
    assert_eq!(log.posts[1].1["height"], json!(950));
}

#[test]
fn beacon_skips_unchanged_heights() {
    let channel = FakeSurface::default();
    let mut beacon = HeightBeacon::new(channel.clone(), &embed_page_url(Some("f1")));
    let start = Instant::now();

    beacon.measure(&metrics(800), start);
    beacon.measure(&metrics(800), start + Duration::from_millis(100));
    beacon.poll(start + Duration::from_millis(200));

    assert_eq!(channel.log().posts.len(), 1);
}

#[test]
fn beacon_teardown_cancels_pending_report() {
    let channel = FakeSurface::default();
    let mut beacon = HeightBeacon::new(channel.clone(), &embed_page_url(Some("f1")));
    let start = Instant::now();

    beacon.measure(&metrics(800), start);
    beacon.measure(&metrics(900), start + Duration::from_millis(10));
    beacon.teardown();

    beacon.poll(start + Duration::from_millis(200));
    beacon.measure(&metrics(1000), start + Duration::from_millis(300));

    assert_eq!(channel.log().posts.len(), 1, "nothing after teardown");
}
