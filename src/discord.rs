use anyhow::Context;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use crate::actors::messages::AlertEvent;
use crate::config::Discord;

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

pub struct MessageBuilder {
    content: Option<String>,
    embeds: Vec<Embed>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self {
            content: None,
            embeds: Vec::new(),
        }
    }

    pub fn content(mut self, content: impl ToString) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn add_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn build(self) -> Message {
        Message {
            content: self.content,
            embeds: self.embeds,
        }
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct DiscordManager {
    client: Client,
}

impl DiscordManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn build_alert_embed(&self, event: &AlertEvent) -> Embed {
        let (title, color, fields) = match event {
            AlertEvent::LowPower {
                interface,
                rx_power,
                ..
            } => (
                "📉 Rx Power Below Threshold",
                15158332, // Red
                vec![
                    EmbedField {
                        name: "🔌 Interface".to_string(),
                        value: format!("#{interface}"),
                        inline: true,
                    },
                    EmbedField {
                        name: "📶 Rx Power".to_string(),
                        value: format!("{rx_power:.2} dBm"),
                        inline: true,
                    },
                ],
            ),
            AlertEvent::NoData { .. } => (
                "❓ No Rx Power Data",
                15105570, // Orange
                vec![],
            ),
        };

        Embed {
            title: Some(title.to_string()),
            description: Some(event.to_string()),
            color: Some(color),
            fields,
            footer: Some(EmbedFooter {
                text: format!("Switch: {}", event.host()),
            }),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }

    #[instrument(skip(self, discord, message))]
    pub async fn send_message(&self, discord: &Discord, message: &Message) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&discord.url)
            .json(message)
            .send()
            .await
            .context("failed to reach Discord")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Discord message failed with status {status}: {error_text}");
        }

        info!("Successfully sent Discord message");
        Ok(())
    }
}
