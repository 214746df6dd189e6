use std::fmt;

use thiserror::Error;
use url::Url;

/// The single configured base URL the bridge is permitted to navigate its
/// surface to and post secrets toward.
///
/// Must be a bare `scheme://host[:port]` - no path, query or fragment - so
/// it can double as a postMessage target origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustedOrigin {
    url: Url,
    origin: String,
}

#[derive(Error, Debug)]
pub enum OriginError {
    #[error("invalid origin url: {0}")]
    Parse(#[from] url::ParseError),

    #[error("origin must be a bare scheme://host[:port], got {0:?}")]
    NotBare(String),
}

impl TrustedOrigin {
    pub fn parse(input: &str) -> Result<Self, OriginError> {
        let trimmed = input.trim_end_matches('/');
        let url = Url::parse(trimmed)?;

        let bare = url.has_host()
            && matches!(url.path(), "" | "/")
            && url.query().is_none()
            && url.fragment().is_none();
        if !bare {
            return Err(OriginError::NotBare(input.to_string()));
        }

        let origin = url.origin().ascii_serialization();
        Ok(TrustedOrigin { url, origin })
    }

    /// Origin string without a trailing slash, e.g. `https://renderer.example`.
    pub fn as_str(&self) -> &str {
        &self.origin
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for TrustedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}
