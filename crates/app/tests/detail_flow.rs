//! Detail-page flow: route -> bridge wiring -> token push, with auth
//! failure degrading to a warning instead of blocking render.

use std::cell::RefCell;
use std::rc::Rc;

use app::{DetailPage, EntityRoute, AUTH_WARNING};
use crud_client::StaticIdentity;
use embed_bridge::{ChannelError, MessageSink, MessageTarget, Surface, TrustedOrigin};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use url::Url;

#[derive(Clone, Default)]
struct FakeSurface {
    navigations: Rc<RefCell<Vec<String>>>,
    posts: Rc<RefCell<Vec<(String, Value)>>>,
}

impl MessageSink for FakeSurface {
    fn post(&mut self, target: &MessageTarget, message: &Value) -> Result<(), ChannelError> {
        self.posts
            .borrow_mut()
            .push((target.as_target_str().to_string(), message.clone()));
        Ok(())
    }
}

impl Surface for FakeSurface {
    fn navigate(&mut self, target: &Url) {
        self.navigations.borrow_mut().push(target.to_string());
    }
}

fn page() -> DetailPage<FakeSurface> {
    DetailPage::new(
        EntityRoute::parse("invoice", "42").unwrap(),
        TrustedOrigin::parse("https://renderer.example").unwrap(),
    )
}

#[tokio::test]
async fn mount_navigates_and_token_arrives_after_load() {
    let surface = FakeSurface::default();
    let mut page = page();

    page.mount(surface.clone());
    assert_eq!(
        surface.navigations.borrow().as_slice(),
        ["https://renderer.example/embed/entity?entity=invoice&id=42"]
    );

    // token fetched while the surface is still loading: relay is deferred
    page.acquire_token(&StaticIdentity::with_token("tok")).await;
    assert!(surface.posts.borrow().is_empty());

    page.surface_loaded();
    let posts = surface.posts.borrow();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "https://renderer.example");
    assert_eq!(posts[0].1["token"], json!("tok"));
}

#[tokio::test]
async fn missing_token_degrades_to_warning() {
    let surface = FakeSurface::default();
    let mut page = page();
    page.mount(surface.clone());

    page.acquire_token(&StaticIdentity::disabled_auth()).await;
    page.surface_loaded();

    assert_eq!(page.warning(), Some(AUTH_WARNING));
    assert!(surface.posts.borrow().is_empty(), "nothing to relay");
}

#[tokio::test]
async fn unmount_silences_later_callbacks() {
    let surface = FakeSurface::default();
    let mut page = page();
    page.mount(surface.clone());
    page.acquire_token(&StaticIdentity::with_token("tok")).await;

    page.unmount();
    page.surface_loaded();

    assert!(surface.posts.borrow().is_empty());
}

#[test]
fn template_application_builds_the_form() {
    let mut page = page();

    page.apply_template(Some(json!({ "name": "", "tags": [] })));
    assert_eq!(page.form().as_value(), &json!({ "name": "", "tags": [] }));

    // no template defined yet for this entity
    page.apply_template(None);
    assert_eq!(page.form().as_value(), &json!({}));
}
