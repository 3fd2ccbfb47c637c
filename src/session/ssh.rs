//! SSH transport built on `russh`
//!
//! Switch CLIs only accept line-oriented input on an interactive shell with a
//! pseudo-terminal, so every session requests a pty before starting the shell.
//! Host keys are not verified.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle, Msg};
use russh::keys::ssh_key;
use russh::{Channel, ChannelMsg, Disconnect, Pty};
use tokio::time::timeout;
use tracing::{debug, instrument, trace, warn};

use crate::config::SwitchConfig;
use crate::error::{PollError, PollResult};

use super::{Connector, ShellSession};

const TERMINAL: &str = "xterm";
const TERMINAL_COLUMNS: u32 = 80;
const TERMINAL_ROWS: u32 = 40;

struct AcceptAnyKey;

impl client::Handler for AcceptAnyKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Opens password-authenticated SSH shells
#[derive(Debug, Clone)]
pub struct SshConnector {
    /// Bound on the whole setup: TCP connect, handshake, authentication,
    /// channel open and the pty and shell requests
    connect_timeout: Duration,

    /// Idle bound on an established session
    inactivity_timeout: Duration,
}

impl SshConnector {
    pub fn new(connect_timeout: Duration, inactivity_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            inactivity_timeout,
        }
    }

    async fn connect(&self, host: &SwitchConfig) -> PollResult<Handle<AcceptAnyKey>> {
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(self.inactivity_timeout),
            ..Default::default()
        });

        let mut handle =
            client::connect(config, (host.host.as_str(), host.port), AcceptAnyKey).await?;

        let auth = handle
            .authenticate_password(host.username.clone(), host.password.clone())
            .await?;

        if !auth.success() {
            return Err(PollError::Connection(format!(
                "authentication rejected for user {}",
                host.username
            )));
        }

        Ok(handle)
    }

    /// Connect, open a session channel, then request a pty and a shell and
    /// wait for the server to accept each request.
    async fn open_shell(&self, host: &SwitchConfig) -> PollResult<SshSession> {
        let handle = self.connect(host).await?;

        trace!("authenticated, opening shell channel");

        let mut channel = handle.channel_open_session().await?;
        let mut pending = Vec::new();

        channel
            .request_pty(
                true,
                TERMINAL,
                TERMINAL_COLUMNS,
                TERMINAL_ROWS,
                0,
                0,
                &[(Pty::ECHO, 0)],
            )
            .await?;
        await_reply(&mut channel, "pty", &mut pending).await?;

        channel.request_shell(true).await?;
        await_reply(&mut channel, "shell", &mut pending).await?;

        Ok(SshSession {
            handle,
            channel,
            pending,
            finished: false,
        })
    }
}

/// Wait for the server's answer to a channel request sent with `want_reply`.
///
/// Output that races ahead of the answer is kept in `pending`.
async fn await_reply(
    channel: &mut Channel<Msg>,
    request: &str,
    pending: &mut Vec<u8>,
) -> PollResult<()> {
    loop {
        match channel.wait().await {
            Some(ChannelMsg::Success) => return Ok(()),
            Some(ChannelMsg::Failure) => {
                return Err(PollError::Connection(format!(
                    "{request} request rejected by server"
                )));
            }
            Some(ChannelMsg::Data { data }) | Some(ChannelMsg::ExtendedData { data, .. }) => {
                pending.extend_from_slice(&data);
            }
            Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                return Err(PollError::Connection(format!(
                    "channel closed before the {request} request was answered"
                )));
            }
            Some(other) => trace!("ignoring channel message {other:?} while awaiting {request} reply"),
        }
    }
}

#[async_trait]
impl Connector for SshConnector {
    #[instrument(skip(self, host), fields(switch = %host.address()))]
    async fn establish(&self, host: &SwitchConfig) -> PollResult<Box<dyn ShellSession>> {
        let session = match timeout(self.connect_timeout, self.open_shell(host)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(PollError::Connection(format!(
                    "session setup timed out after {}s",
                    self.connect_timeout.as_secs()
                )));
            }
        };

        debug!("interactive shell started");

        Ok(Box::new(session))
    }
}

/// A live shell. Dropping it drops the connection handle, which tears the
/// connection down even when `close` was never reached.
pub struct SshSession {
    handle: Handle<AcceptAnyKey>,
    channel: Channel<Msg>,

    /// Output received while the shell was being set up
    pending: Vec<u8>,

    /// Remote side signalled end of output
    finished: bool,
}

#[async_trait]
impl ShellSession for SshSession {
    async fn send_line(&mut self, line: &str) -> PollResult<()> {
        let line = format!("{line}\n");
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(|e| PollError::Command(e.to_string()))
    }

    async fn read_chunk(&mut self) -> PollResult<Option<Vec<u8>>> {
        if !self.pending.is_empty() {
            return Ok(Some(std::mem::take(&mut self.pending)));
        }

        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Data { data }) => return Ok(Some(data.to_vec())),
                Some(ChannelMsg::ExtendedData { data, .. }) => return Ok(Some(data.to_vec())),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) => {
                    self.finished = true;
                    return Ok(None);
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    trace!("remote shell exited with {exit_status}");
                }
                Some(other) => trace!("ignoring channel message {other:?}"),
                None if self.finished => return Ok(None),
                None => {
                    return Err(PollError::Read(
                        "connection dropped before the shell closed its output".to_string(),
                    ));
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.channel.close().await {
            trace!("channel already closed: {e}");
        }
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            warn!("failed to disconnect cleanly: {e}");
        }
    }
}
