//! Bot API HTTP client.

use crate::util::split_message;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tgfeed_core::config::{BotConfig, PlatformConfig};
use tgfeed_core::error::TgfeedError;
use tgfeed_core::traits::UpdateFetcher;
use tgfeed_core::update::{Update, UpdateId, User};
use tracing::warn;

/// Hard platform limit on outbound message length.
pub(crate) const MESSAGE_LIMIT: usize = 4096;

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Unwrap an ok envelope; everything else becomes an `Api` error.
    pub(crate) fn into_result(self, method: &str) -> Result<T, TgfeedError> {
        if !self.ok {
            let code = self
                .error_code
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            return Err(TgfeedError::Api(format!(
                "{method} failed{code}: {}",
                self.description.unwrap_or_default()
            )));
        }
        self.result
            .ok_or_else(|| TgfeedError::Api(format!("{method} answered ok without a result")))
    }
}

/// HTTP client for one bot's slice of the platform API.
///
/// Thin and stateless: the offset lives in the strategy, not here.
pub struct BotApi {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    poll_timeout: Duration,
    allowed_updates: Vec<String>,
}

impl BotApi {
    pub fn new(client: reqwest::Client, platform: &PlatformConfig, bot: &BotConfig) -> Self {
        let base_url = format!(
            "{}/bot{}",
            platform.base_url.trim_end_matches('/'),
            bot.token
        );
        Self {
            client,
            base_url,
            poll_timeout: platform.poll_timeout(),
            allowed_updates: bot.allowed_updates.clone(),
        }
    }

    /// Identity probe; answers the bot's own user record.
    pub async fn get_me(&self) -> Result<User, TgfeedError> {
        let url = format!("{}/getMe", self.base_url);
        let resp: ApiResponse<User> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TgfeedError::Transport(format!("getMe failed: {e}")))?
            .json()
            .await
            .map_err(|e| TgfeedError::Transport(format!("getMe parse failed: {e}")))?;
        resp.into_result("getMe")
    }

    /// One long-poll fetch at the given offset.
    ///
    /// The offset is always sent; 0 asks for the whole backlog. Blocks
    /// server-side up to the configured hold before answering an empty
    /// batch.
    pub async fn get_updates(&self, offset: UpdateId) -> Result<Vec<Update>, TgfeedError> {
        let url = format!("{}/getUpdates", self.base_url);
        // The HTTP deadline has to outlast the server-side hold.
        let resp: ApiResponse<Vec<Update>> = self
            .client
            .post(&url)
            .timeout(self.poll_timeout + Duration::from_secs(5))
            .json(&self.updates_body(offset))
            .send()
            .await
            .map_err(|e| TgfeedError::Transport(format!("getUpdates failed: {e}")))?
            .json()
            .await
            .map_err(|e| TgfeedError::Transport(format!("getUpdates parse failed: {e}")))?;
        resp.into_result("getUpdates")
    }

    pub(crate) fn updates_body(&self, offset: UpdateId) -> serde_json::Value {
        let mut body = serde_json::json!({
            "offset": offset,
            "timeout": self.poll_timeout.as_secs(),
        });
        if !self.allowed_updates.is_empty() {
            body["allowed_updates"] = serde_json::json!(self.allowed_updates);
        }
        body
    }

    /// Send a text message, splitting at the platform length limit.
    ///
    /// Sent as Markdown first; if the platform rejects the entity parse,
    /// the chunk is retried as plain text.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TgfeedError> {
        let chunks = split_message(text, MESSAGE_LIMIT);

        for chunk in chunks {
            let url = format!("{}/sendMessage", self.base_url);
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "parse_mode": "Markdown",
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| TgfeedError::Transport(format!("sendMessage failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                if error_text.contains("can't parse entities") {
                    warn!("Markdown parse failed, retrying as plain text: {error_text}");
                    let plain_body = serde_json::json!({
                        "chat_id": chat_id,
                        "text": chunk,
                    });
                    let plain_resp = self
                        .client
                        .post(format!("{}/sendMessage", self.base_url))
                        .json(&plain_body)
                        .send()
                        .await
                        .map_err(|e| {
                            TgfeedError::Transport(format!("sendMessage (plain) failed: {e}"))
                        })?;
                    if !plain_resp.status().is_success() {
                        let plain_err = plain_resp.text().await.unwrap_or_default();
                        return Err(TgfeedError::Api(format!(
                            "sendMessage (plain fallback) failed: {plain_err}"
                        )));
                    }
                } else {
                    return Err(TgfeedError::Api(format!(
                        "sendMessage failed ({status}): {error_text}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Send a chat action (e.g. "typing"). Best-effort on the platform
    /// side; only transport failures surface.
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<(), TgfeedError> {
        let url = format!("{}/sendChatAction", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "action": action,
        });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TgfeedError::Transport(format!("sendChatAction failed: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl UpdateFetcher for BotApi {
    async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<Update>, TgfeedError> {
        self.get_updates(offset).await
    }
}
