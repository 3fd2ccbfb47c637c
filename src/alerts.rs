use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, instrument, trace};

use crate::actors::messages::AlertEvent;
use crate::config::{Alert, Webhook};
use crate::discord::{DiscordManager, MessageBuilder};
use crate::telegram::TelegramClient;

/// Hands alert events to whoever delivers them. Fire-and-forget: never blocks
/// the poll task and never fails it.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: AlertEvent);
}

impl Notifier for UnboundedSender<AlertEvent> {
    fn notify(&self, event: AlertEvent) {
        if self.send(event).is_err() {
            trace!("alert receiver gone, dropping event");
        }
    }
}

/// Delivers alert text to every configured channel
#[derive(Debug, Clone)]
pub struct AlertManager {
    client: Client,
    channels: Vec<Alert>,
    discord_manager: DiscordManager,
}

impl AlertManager {
    pub fn new(channels: Vec<Alert>) -> Self {
        let client = Client::new();
        Self {
            discord_manager: DiscordManager::new(client.clone()),
            client,
            channels,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Send `event` everywhere. Returns the number of failed deliveries.
    #[instrument(skip(self), fields(host = %event.host()))]
    pub async fn deliver(&self, event: &AlertEvent) -> usize {
        let mut failed = 0;

        for channel in &self.channels {
            let result = match channel {
                Alert::Discord(discord) => {
                    let embed = self.discord_manager.build_alert_embed(event);
                    let mut message_builder = MessageBuilder::new().add_embed(embed);
                    if let Some(user_id) = &discord.user_id {
                        message_builder =
                            message_builder.content(format!("📉 {} <@{user_id}>", event.host()));
                    }

                    self.discord_manager
                        .send_message(discord, &message_builder.build())
                        .await
                }
                Alert::Webhook(webhook) => self.send_webhook_alert(webhook, event).await,
                Alert::Telegram(telegram) => {
                    TelegramClient::new(self.client.clone(), telegram)
                        .send_message(&event.to_string())
                        .await
                }
            };

            if let Err(e) = result {
                error!("failed to deliver alert: {e:#}");
                failed += 1;
            }
        }

        failed
    }

    async fn send_webhook_alert(&self, webhook: &Webhook, event: &AlertEvent) -> anyhow::Result<()> {
        let mut payload = json!({
            "message": event.to_string(),
            "host": event.host(),
            "timestamp": Utc::now().to_rfc3339()
        });

        if let AlertEvent::LowPower {
            interface,
            rx_power,
            ..
        } = event
        {
            payload["interface"] = json!(interface);
            payload["rx_power"] = json!(rx_power);
        }

        let response = self.client.post(&webhook.url).json(&payload).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("webhook alert failed with status: {}", response.status());
        }

        info!("Successfully sent webhook alert");
        Ok(())
    }
}
