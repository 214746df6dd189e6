//! Layered configuration for the admin client.
//!
//! Sections are plain `Default + Serialize + Deserialize` structs registered
//! into a [`SettingsStore`]. Only the recursive diff against the defaults is
//! persisted (RON), so a fresh install writes nothing and an upgrade that
//! changes a default takes effect everywhere the user never overrode it.

mod errors;
mod sections;
mod store;

pub use errors::SettingsError;
pub use sections::{ApiSettings, AuthSettings, RendererSettings};
pub use store::{Settings, SettingsStore, SettingsStoreBuilder};
