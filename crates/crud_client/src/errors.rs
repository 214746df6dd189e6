use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Token acquisition failed or returned nothing. Degrades functionality
    /// ("forms may not load data"), never blocks rendering.
    #[error("no usable access token")]
    AuthUnavailable,

    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx from the collaborator, passed through verbatim.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
