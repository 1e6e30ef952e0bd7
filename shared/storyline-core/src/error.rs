//! Error types for Storyline services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorylineError>;

#[derive(Error, Debug)]
pub enum StorylineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for StorylineError {
    fn from(err: std::io::Error) -> Self {
        StorylineError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_network() {
        let err: StorylineError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();
        assert!(matches!(err, StorylineError::Network(_)));
        assert!(err.to_string().contains("port taken"));
    }
}
