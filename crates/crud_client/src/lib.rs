//! HTTP clients for the remote CRUD server and the identity layer.
//!
//! The server owns schema templates, data storage and authorization; this
//! crate is the thin consuming side: bearer-authenticated template fetch and
//! save, the generic data operation endpoint, and a bounded-retry helper for
//! provisioning waits. Upstream failures pass through with their original
//! status code, untranslated.

mod client;
mod data;
mod errors;
mod identity;
mod retry;
mod template;

pub use client::ApiClient;
pub use data::{pick_label, DataRequest, DataResponse, NEW_RECORD_ID};
pub use errors::ApiError;
pub use identity::{IdentityProvider, StaticIdentity};
pub use retry::{BoundedRetry, RetryOutcome};
