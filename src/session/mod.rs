//! Interactive shell sessions to switches
//!
//! A [`Connector`] opens one [`ShellSession`] per host. The session is a plain
//! byte pipe: lines go in, unframed terminal output comes out. Pacing and
//! parsing live elsewhere.

pub mod ssh;

use async_trait::async_trait;

use crate::config::SwitchConfig;
use crate::error::PollResult;

pub use ssh::SshConnector;

/// Opens interactive shell sessions
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect, authenticate, allocate a pseudo-terminal and start a shell.
    ///
    /// Fails with [`crate::error::PollError::Connection`].
    async fn establish(&self, host: &SwitchConfig) -> PollResult<Box<dyn ShellSession>>;
}

/// One interactive shell bound to one host for the duration of a poll task
#[async_trait]
pub trait ShellSession: Send {
    /// Write a single command line (a newline is appended)
    async fn send_line(&mut self, line: &str) -> PollResult<()>;

    /// Next chunk of output. `Ok(None)` once the remote side has closed the stream.
    async fn read_chunk(&mut self) -> PollResult<Option<Vec<u8>>>;

    /// Release the session. Must be safe to call after a failure.
    async fn close(&mut self);
}
