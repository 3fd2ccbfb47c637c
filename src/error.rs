//! Error types for a single host poll
//!
//! Every variant is scoped to one switch. None of them abort a poll cycle:
//! they are caught at the per-host task boundary and reported as outcomes.

use thiserror::Error;

/// Result type alias for per-host poll operations
pub type PollResult<T> = Result<T, PollError>;

/// Errors that can occur while polling one switch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Session establishment failed (transport, authentication or connect timeout)
    #[error("connection failed: {0}")]
    Connection(String),

    /// Writing a command to the session input failed
    #[error("command failed: {0}")]
    Command(String),

    /// The output stream failed while draining
    #[error("read failed: {0}")]
    Read(String),

    /// The poll task itself aborted (panic or cancellation)
    #[error("poll task aborted: {0}")]
    Task(String),
}

impl From<russh::Error> for PollError {
    fn from(err: russh::Error) -> Self {
        PollError::Connection(err.to_string())
    }
}
