//! Wire messages exchanged across the host/surface boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::origin::TrustedOrigin;

/// Host page -> embedded surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum HostMessage {
    #[serde(rename = "ENTITY_FORM_SET_TOKEN")]
    SetToken { token: String },
}

/// Embedded surface -> parent browsing context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EmbedMessage {
    #[serde(rename = "EMBED_HEIGHT")]
    Height {
        #[serde(rename = "frameId", skip_serializing_if = "Option::is_none")]
        frame_id: Option<String>,
        height: u32,
    },
}

/// Addressing for an outbound cross-context message.
///
/// `Origin` restricts delivery to the named origin; `Any` is the wildcard.
/// Token-bearing messages must never be sent with `Any`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    Origin(TrustedOrigin),
    Any,
}

impl MessageTarget {
    /// The target-origin string handed to the underlying channel.
    pub fn as_target_str(&self) -> &str {
        match self {
            MessageTarget::Origin(origin) => origin.as_str(),
            MessageTarget::Any => "*",
        }
    }
}

/// Delivery failed: the far side is gone or the channel refused the message.
/// Contained by callers - never fatal to the host page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("message channel unavailable: {0}")]
pub struct ChannelError(pub String);

/// Outbound half of a cross-context message channel.
pub trait MessageSink {
    fn post(&mut self, target: &MessageTarget, message: &Value) -> Result<(), ChannelError>;
}
