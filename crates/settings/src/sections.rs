use serde::{Deserialize, Serialize};

use crate::store::Settings;

/// Where the external form renderer lives and how the bridge embeds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RendererSettings {
    /// Trusted origin the embed surface navigates to and token posts target.
    pub origin: String,
    pub embed_path: String,
    pub min_height_px: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            origin: "https://crud-client.fullstackjedi.dev".into(),
            embed_path: "/embed/entity".into(),
            min_height_px: 600,
        }
    }
}

impl Settings for RendererSettings {
    const SECTION: &'static str = "renderer";
}

/// Endpoints of the remote CRUD server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub api_base_url: String,
    pub crud_server_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://crud-server.fullstackjedi.dev".into(),
            crud_server_url: "https://crud-server.fullstackjedi.dev".into(),
        }
    }
}

impl Settings for ApiSettings {
    const SECTION: &'static str = "api";
}

/// Identity provider parameters; the provider itself is external.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    pub domain: String,
    pub client_id: String,
    pub audience: String,
    pub scope: String,
    /// Dev bypass: authenticated without a token, no login roundtrip.
    pub disable_auth: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            client_id: String::new(),
            audience: String::new(),
            scope: "openid profile email crud:read crud:create crud:update crud:delete offline_access"
                .into(),
            disable_auth: false,
        }
    }
}

impl Settings for AuthSettings {
    const SECTION: &'static str = "auth";
}
