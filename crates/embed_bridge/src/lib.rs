//! Embedded-renderer bridge shared between host page and embedded surface.
//!
//! Goals:
//! - Host side: own exactly one sandboxed rendering surface and relay exactly
//!   one capability into it (a bearer token), never via URL or attribute.
//! - Far side: report the embedded content's measured height back to the
//!   parent so the hosting element can auto-resize.
//!
//! Design Notes:
//! - The browser custom-element lifecycle is modeled as an explicit state
//!   machine ([`SurfaceState`]) with plain transition methods; a thin adapter
//!   in the host environment translates lifecycle callbacks into these calls.
//! - Every outbound send carries an explicit [`MessageTarget`]. Secrets may
//!   only travel with `MessageTarget::Origin(..)`; the height beacon is the
//!   one sanctioned wildcard sender because its payload carries no secret.

mod beacon;
mod bridge;
mod messages;
mod origin;

pub use beacon::{DocumentMetrics, HeightBeacon, MIN_REPORT_INTERVAL};
pub use bridge::{EmbedBridge, Surface, SurfaceState};
pub use messages::{ChannelError, EmbedMessage, HostMessage, MessageSink, MessageTarget};
pub use origin::{OriginError, TrustedOrigin};
