use crate::key_path::KeyPath;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormStateError {
    #[error("empty field path")]
    InvalidPath,

    #[error("no field at path: {0}")]
    PathNotFound(KeyPath),

    #[error("not an array field: {0}")]
    NotAnArray(KeyPath),

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
