use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tracing::trace;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub switches: Vec<SwitchConfig>,

    /// Receive power (dBm) below which an interface is reported as LOW
    pub threshold: f64,

    /// Legacy Telegram settings, merged into the alert channels when both are set
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<i64>,

    #[serde(default)]
    pub alerts: Vec<Alert>,

    /// Seconds between scheduled poll cycles
    #[serde(default = "default_interval")]
    pub interval: u64,

    #[serde(default)]
    pub ssh: SshConfig,

    pub api: Option<ApiSettings>,
}

impl Config {
    /// All configured notification channels
    pub fn alert_channels(&self) -> Vec<Alert> {
        let mut channels = self.alerts.clone();

        if let (Some(token), Some(chat_id)) = (&self.telegram_token, self.telegram_chat_id) {
            channels.push(Alert::Telegram(Telegram {
                token: token.clone(),
                chat_id,
                api_url: default_telegram_api(),
            }));
        }

        channels
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

/// A switch to poll. Immutable once loaded.
#[derive(Clone, PartialEq, serde::Deserialize)]
pub struct SwitchConfig {
    pub host: String,
    #[serde(default = "crate::util::get_default_ssh_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Free-text annotation copied onto every reading of this switch
    #[serde(default)]
    pub comment: String,
}

impl SwitchConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for SwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("comment", &self.comment)
            .finish()
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SshConfig {
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Upper bound in seconds for draining the session output
    #[serde(default = "default_read_deadline")]
    pub read_deadline: u64,
}

impl SshConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn read_deadline(&self) -> Duration {
        Duration::from_secs(self.read_deadline)
    }

    /// Idle bound for an established session. Covers setup, the paced
    /// command script (`script_duration`) and the drain, so a quiet switch
    /// is never dropped mid-script.
    pub fn inactivity_timeout(&self, script_duration: Duration) -> Duration {
        self.connect_timeout() + script_duration + self.read_deadline()
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            read_deadline: default_read_deadline(),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiSettings {
    pub bind: Option<SocketAddr>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    Discord(Discord),
    Webhook(Webhook),
    Telegram(Telegram),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Webhook {
    pub url: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Discord {
    pub url: String,
    pub user_id: Option<String>,
}

#[derive(Clone, serde::Deserialize)]
pub struct Telegram {
    pub token: String,
    pub chat_id: i64,
    #[serde(default = "default_telegram_api")]
    pub api_url: String,
}

impl fmt::Debug for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telegram")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn default_interval() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_read_deadline() -> u64 {
    30
}

fn default_telegram_api() -> String {
    String::from("https://api.telegram.org")
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read config file {path}"))?;
    let config: Config =
        serde_json::from_str(&file_content).context("Invalid configuration file provided!")?;

    if config.interval == 0 {
        anyhow::bail!("interval must be at least one second");
    }

    trace!("loaded config: {config:?}");
    Ok(config)
}
