use serde_json::Value;
use url::Url;

use crate::messages::{ChannelError, HostMessage, MessageSink, MessageTarget};
use crate::origin::TrustedOrigin;

/// Fixed path the external renderer serves its embeddable form under.
const EMBED_PATH: &str = "/embed/entity";

/// Lifecycle of the bridge's one rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Not yet mounted into the host page.
    Detached,
    /// Attached, surface created, no navigation target yet.
    MountedNoSource,
    /// Navigation target set, surface is loading.
    Loading,
    /// Surface finished loading at least once.
    Ready,
}

/// The iframe-equivalent isolated browsing context, as seen from the host.
pub trait Surface: MessageSink {
    /// Point the surface at a new location.
    fn navigate(&mut self, target: &Url);
}

/// Host-page element owning one sandboxed surface and relaying one bearer
/// token into it.
///
/// The token lives in memory only. It is never reflected into an attribute,
/// a query string or any persisted storage, and every outbound token message
/// is addressed to the configured trusted origin - never the wildcard.
pub struct EmbedBridge<S: Surface> {
    origin: TrustedOrigin,
    entity: String,
    id: String,
    token: Option<String>,
    surface: Option<S>,
    state: SurfaceState,
    target: Option<Url>,
    alive: bool,
}

impl<S: Surface> EmbedBridge<S> {
    pub fn new(origin: TrustedOrigin) -> Self {
        EmbedBridge {
            origin,
            entity: String::new(),
            id: String::new(),
            token: None,
            surface: None,
            state: SurfaceState::Detached,
            target: None,
            alive: false,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// The most recently navigated-to target, if any.
    pub fn navigation_target(&self) -> Option<&Url> {
        self.target.as_ref()
    }

    /// Attach the surface. If entity/id were configured before mounting, the
    /// surface navigates immediately.
    pub fn mount(&mut self, surface: S) {
        self.surface = Some(surface);
        self.alive = true;
        self.state = SurfaceState::MountedNoSource;
        if !self.entity.is_empty() || !self.id.is_empty() {
            self.navigate();
        }
    }

    /// Re-parameterize the embed. Always supersedes any pending navigation;
    /// the deferred token relay fires on the next load completion instead.
    pub fn configure(&mut self, entity: &str, id: &str) {
        self.entity = entity.to_string();
        self.id = id.to_string();
        if self.alive && self.surface.is_some() {
            self.navigate();
        }
    }

    /// Store the token (memory only). Relays immediately when the surface
    /// has completed at least one load; otherwise the relay is deferred to
    /// the next `surface_loaded`.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
        if self.alive && self.state == SurfaceState::Ready {
            self.relay_token();
        }
    }

    /// Surface load completion callback from the host environment.
    pub fn surface_loaded(&mut self) {
        if !self.alive {
            return;
        }
        self.state = SurfaceState::Ready;
        self.relay_token();
    }

    /// Remove from the host page. Clears the token and drops the surface;
    /// every later callback is a no-op.
    pub fn detach(&mut self) {
        self.alive = false;
        self.token = None;
        self.surface = None;
        self.target = None;
        self.state = SurfaceState::Detached;
    }

    /// Compose `{origin}/embed/entity?entity=..&id=..`; empty parameters are
    /// omitted. The origin component never varies with entity or id.
    fn embed_url(&self) -> Url {
        let mut url = self.origin.url().clone();
        url.set_path(EMBED_PATH);
        url.set_query(None);
        if !self.entity.is_empty() || !self.id.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if !self.entity.is_empty() {
                pairs.append_pair("entity", &self.entity);
            }
            if !self.id.is_empty() {
                pairs.append_pair("id", &self.id);
            }
        }
        url
    }

    fn navigate(&mut self) {
        let target = self.embed_url();
        if let Some(surface) = self.surface.as_mut() {
            surface.navigate(&target);
            self.state = SurfaceState::Loading;
        }
        self.target = Some(target);
    }

    /// One-shot relay attempt. Failures are logged and contained; the next
    /// `set_token` or load completion is the only retry.
    fn relay_token(&mut self) {
        let (Some(surface), Some(token)) = (self.surface.as_mut(), self.token.as_ref()) else {
            return;
        };

        let message = HostMessage::SetToken {
            token: token.clone(),
        };
        let payload: Value = match serde_json::to_value(&message) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode token message");
                return;
            }
        };

        let target = MessageTarget::Origin(self.origin.clone());
        if let Err(ChannelError(reason)) = surface.post(&target, &payload) {
            tracing::warn!(%reason, "failed to post token to embedded surface");
        }
    }
}
