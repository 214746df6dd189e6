use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::client::ApiClient;
use crate::errors::ApiError;

impl ApiClient {
    /// `GET /template/{entity}` with a bearer token.
    ///
    /// Returns `Ok(None)` on 404 (no template defined yet) and on a response
    /// envelope without a `template` field; any other non-2xx passes through
    /// as [`ApiError::Upstream`].
    pub async fn fetch_template(
        &self,
        entity: &str,
        token: &str,
    ) -> Result<Option<Value>, ApiError> {
        let response = self
            .request(Method::GET, &["template", entity], Some(token))?
            .send()
            .await?;
        Self::template_from_response(response).await
    }

    async fn template_from_response(
        response: reqwest::Response,
    ) -> Result<Option<Value>, ApiError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;

        let envelope: Value = response.json().await?;
        Ok(envelope.get("template").filter(|t| !t.is_null()).cloned())
    }

    /// `POST /template/{entity}` with the template shape as the body.
    /// The server echoes the stored template back.
    pub async fn save_template(
        &self,
        entity: &str,
        template: &Value,
        token: &str,
    ) -> Result<Value, ApiError> {
        let response = self
            .request(Method::POST, &["template", entity], Some(token))?
            .json(template)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}
