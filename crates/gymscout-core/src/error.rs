//! GymScout error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GymScoutError>;

#[derive(Debug, Error)]
pub enum GymScoutError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_their_layer() {
        let e = GymScoutError::Scheduler("scheduler not initialized".into());
        assert_eq!(e.to_string(), "Scheduler error: scheduler not initialized");
        let e = GymScoutError::Store("connection refused".into());
        assert_eq!(e.to_string(), "Store error: connection refused");
    }
}
