use crud_client::{pick_label, ApiClient, ApiError, DataRequest, IdentityProvider};
use embed_bridge::{EmbedBridge, Surface, TrustedOrigin};
use form_state::FormState;
use serde_json::Value;

use crate::route::EntityRoute;

/// Non-blocking warning shown when token acquisition fails: the page still
/// renders, embedded forms just may not load data.
pub const AUTH_WARNING: &str = "No access token available. Forms may not be able to load data.";

/// Detail view flow: template-driven form state on one side, the embedded
/// renderer bridge on the other. The two are independent; the token is
/// pushed into the bridge once both the token and the surface exist.
pub struct DetailPage<S: Surface> {
    route: EntityRoute,
    bridge: EmbedBridge<S>,
    form: FormState,
    template: Option<Value>,
    token: Option<String>,
    warning: Option<String>,
}

impl<S: Surface> DetailPage<S> {
    pub fn new(route: EntityRoute, renderer_origin: TrustedOrigin) -> Self {
        DetailPage {
            route,
            bridge: EmbedBridge::new(renderer_origin),
            form: FormState::default(),
            template: None,
            token: None,
            warning: None,
        }
    }

    /// Attach the surface and point it at this route's entity/id.
    pub fn mount(&mut self, surface: S) {
        self.bridge.mount(surface);
        self.bridge.configure(&self.route.entity, &self.route.id);
    }

    /// Fetch a token from the identity layer and hand it to the bridge.
    /// Failure degrades to a warning; rendering continues.
    pub async fn acquire_token<I: IdentityProvider>(&mut self, identity: &I) {
        match identity.get_token().await {
            Ok(Some(token)) => {
                self.token = Some(token.clone());
                self.bridge.set_token(Some(token));
            }
            Ok(None) => {
                self.warning = Some(AUTH_WARNING.to_string());
            }
            Err(err) => {
                tracing::warn!(error = %err, "token acquisition failed");
                self.warning = Some(AUTH_WARNING.to_string());
            }
        }
    }

    /// Fetch the entity's template and derive the initial form state.
    pub async fn load_template(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::AuthUnavailable)?;
        let template = api.fetch_template(&self.route.entity, token).await?;
        self.apply_template(template);
        Ok(())
    }

    /// Pure half of `load_template`: `None` (no template defined yet) leaves
    /// an empty form.
    pub fn apply_template(&mut self, template: Option<Value>) {
        self.form = match &template {
            Some(shape) => FormState::from_template(shape),
            None => FormState::default(),
        };
        self.template = template;
    }

    /// Surface load completion, forwarded from the host environment.
    pub fn surface_loaded(&mut self) {
        self.bridge.surface_loaded();
    }

    pub fn unmount(&mut self) {
        self.bridge.detach();
    }

    pub fn route(&self) -> &EntityRoute {
        &self.route
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn template(&self) -> Option<&Value> {
        self.template.as_ref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn bridge(&self) -> &EmbedBridge<S> {
        &self.bridge
    }
}

/// List view flow: select all rows of an entity and label them.
pub struct ListPage {
    entity: String,
    rows: Vec<Value>,
    error: Option<String>,
}

impl ListPage {
    pub fn new(entity: impl Into<String>) -> Self {
        ListPage {
            entity: entity.into(),
            rows: Vec::new(),
            error: None,
        }
    }

    /// Load rows via the generic data operation. Upstream errors become a
    /// user-visible message instead of tearing the page down.
    pub async fn load<I: IdentityProvider>(&mut self, identity: &I, api: &ApiClient) {
        if !identity.is_authenticated() {
            self.error = Some("Not authenticated.".into());
            return;
        }

        let token = match identity.get_token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "token acquisition failed");
                self.error = Some(AUTH_WARNING.to_string());
                return;
            }
        };

        let request = DataRequest::select(&self.entity);
        match api.execute(&request, token.as_deref()).await {
            Ok(response) => {
                self.rows = response.result;
                self.error = None;
            }
            Err(err) => {
                tracing::error!(entity = %self.entity, error = %err, "failed to load rows");
                self.error = Some(load_error_message(&err));
            }
        }
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Display labels in row order, conventional column fallbacks applied.
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(pick_label).collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// For tests and offline rendering.
    pub fn set_rows(&mut self, rows: Vec<Value>) {
        self.rows = rows;
        self.error = None;
    }
}

/// Upstream failures keep their status visible; the raw body stays in the
/// log, not the page.
fn load_error_message(err: &ApiError) -> String {
    match err.status() {
        Some(status) => format!("Server error {status} while loading rows."),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_surfaces_in_the_load_error() {
        let upstream = ApiError::Upstream {
            status: 502,
            body: "<html>bad gateway</html>".into(),
        };
        let message = load_error_message(&upstream);
        assert_eq!(message, "Server error 502 while loading rows.");
        assert!(!message.contains("<html>"));
    }

    #[test]
    fn non_upstream_errors_use_their_own_rendering() {
        assert_eq!(
            load_error_message(&ApiError::AuthUnavailable),
            "no usable access token"
        );
    }
}
