//! Telegram Bot API delivery (`sendMessage`)

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::config::Telegram;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramClient<'a> {
    client: Client,
    config: &'a Telegram,
}

impl<'a> TelegramClient<'a> {
    pub fn new(client: Client, config: &'a Telegram) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.token
        )
    }

    #[instrument(skip_all, fields(chat_id = self.config.chat_id))]
    pub async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .context("failed to reach Telegram")?;

        let status = response.status();
        let body: ApiResponse = response
            .json()
            .await
            .with_context(|| format!("unexpected Telegram response (status {status})"))?;

        if !body.ok {
            anyhow::bail!(
                "Telegram rejected message: {}",
                body.description.unwrap_or_else(|| status.to_string())
            );
        }

        info!("Successfully sent Telegram message");
        Ok(())
    }
}
