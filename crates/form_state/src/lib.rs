//! Template-driven form state engine.
//!
//! A remote CRUD server owns "template shapes": nested JSON structures whose
//! leaves are primitive-kind hints (`""`, `0`, `false`), whose objects are
//! nested field groups, and whose arrays are row templates for repeatable
//! sections. This crate derives a live form value tree from such a shape and
//! provides copy-on-write mutations addressed by key path.
//!
//! All operations are pure functions of (state, arguments) -> new state; the
//! previous snapshot is never touched and stays valid for undo/comparison.

mod engine;
mod errors;
mod key_path;

pub use engine::FormState;
pub use errors::FormStateError;
pub use key_path::KeyPath;
