use reqwest::{Client, Method, RequestBuilder, Response};
use url::Url;

use crate::errors::ApiError;

/// Base-url wrapper over [`reqwest::Client`] that adds the JSON content type
/// and, when a token is present, the `Authorization: Bearer` header.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(ApiClient {
            http: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build a request for `segments` appended to the base path; segments
    /// are percent-encoded individually, so entity names are safe to pass
    /// straight through.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .extend(segments);

        let mut req = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Map a non-2xx response to [`ApiError::Upstream`] with its original
    /// status and body.
    pub(crate) async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}
