use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RingError {
    #[error("Invalid ring configuration: {0}")]
    InvalidConfiguration(String),
}
