use crate::errors::ApiError;

/// The identity layer as consumed by the host page. The real OAuth/OIDC
/// provider lives outside this system; flows only need a token source and
/// an authenticated flag.
pub trait IdentityProvider {
    /// `Ok(None)` and `Err(AuthUnavailable)` both signal "no usable token";
    /// the distinction is whether acquisition itself failed.
    fn get_token(&self) -> impl std::future::Future<Output = Result<Option<String>, ApiError>> + Send;

    fn is_authenticated(&self) -> bool;
}

/// Fixed-token provider for tests and for auth-disabled deployments, where
/// the user counts as authenticated but no token is ever attached.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    token: Option<String>,
}

impl StaticIdentity {
    pub fn with_token(token: impl Into<String>) -> Self {
        StaticIdentity {
            token: Some(token.into()),
        }
    }

    /// The `DISABLE_AUTH` mode: authenticated, tokenless.
    pub fn disabled_auth() -> Self {
        StaticIdentity { token: None }
    }
}

impl IdentityProvider for StaticIdentity {
    async fn get_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.token.clone())
    }

    fn is_authenticated(&self) -> bool {
        true
    }
}
