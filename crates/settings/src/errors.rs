use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),

    #[error("section not registered")]
    NotRegistered,

    #[error("invalid: {0}")]
    Invalid(&'static str),
}
