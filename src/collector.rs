//! Drains a session's output into one buffer per host
//!
//! Draining ends when the remote shell closes its output or when the
//! interaction deadline elapses. A stream error ends it early, but whatever
//! arrived before the error is kept and still handed to extraction.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::error::PollError;
use crate::session::ShellSession;

/// Everything read from one session
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedOutput {
    pub buffer: String,

    /// Set when the stream failed mid-drain; `buffer` then holds partial output
    pub error: Option<PollError>,

    /// The deadline elapsed before the remote side closed the stream
    pub timed_out: bool,
}

#[instrument(skip(session))]
pub async fn drain(session: &mut dyn ShellSession, deadline: Duration) -> CollectedOutput {
    let mut raw = Vec::new();

    let result = tokio::time::timeout(deadline, async {
        loop {
            match session.read_chunk().await {
                Ok(Some(chunk)) => raw.extend_from_slice(&chunk),
                Ok(None) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    })
    .await;

    let (error, timed_out) = match result {
        Ok(Ok(())) => (None, false),
        Ok(Err(e)) => {
            warn!("output stream failed after {} bytes: {e}", raw.len());
            (Some(e), false)
        }
        Err(_) => {
            debug!("read deadline elapsed after {} bytes", raw.len());
            (None, true)
        }
    };

    CollectedOutput {
        buffer: String::from_utf8_lossy(&raw).into_owned(),
        error,
        timed_out,
    }
}
