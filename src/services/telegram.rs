//! Telegram Bot API notification sink.
//!
//! Credentials come from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`;
//! missing credentials are a configuration error surfaced before any scan
//! work starts. Delivery is retried a bounded number of times and the last
//! error is returned to the caller, which logs it without aborting the
//! scan.

use crate::constants::{HTTP_TIMEOUT_SECS, MAX_SEND_ATTEMPTS, SEND_RETRY_DELAY_SECS};
use crate::error::{AppError, Result};
use crate::services::providers::NotificationSink;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramClient {
    /// Build the client from environment variables. Missing or blank
    /// credentials abort with a configuration error.
    pub fn from_env() -> Result<Self> {
        let token = required_env("TELEGRAM_BOT_TOKEN")?;
        let chat_id = required_env("TELEGRAM_CHAT_ID")?;
        Self::new(token, chat_id)
    }

    pub fn new(token: String, chat_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token,
            chat_id,
            api_base: TELEGRAM_API_BASE.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn send_message_once(&self, text: &str) -> Result<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await?;
        check_response(response).await
    }

    async fn send_photo_once(&self, caption: &str, image: &[u8]) -> Result<()> {
        let photo = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name("chart.png")
            .mime_str("image/png")
            .map_err(|e| AppError::Notify(format!("Invalid photo part: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part("photo", photo);

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;
        check_response(response).await
    }
}

impl NotificationSink for TelegramClient {
    async fn send_text(&self, message: &str) -> Result<()> {
        let mut last_err = AppError::Notify("No delivery attempt made".to_string());
        for attempt in 1..=MAX_SEND_ATTEMPTS {
            match self.send_message_once(message).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, error = %e, "sendMessage failed");
                    last_err = e;
                }
            }
            if attempt < MAX_SEND_ATTEMPTS {
                sleep(Duration::from_secs(SEND_RETRY_DELAY_SECS)).await;
            }
        }
        Err(last_err)
    }

    async fn send_text_with_image(&self, message: &str, image: &[u8]) -> Result<()> {
        let mut last_err = AppError::Notify("No delivery attempt made".to_string());
        for attempt in 1..=MAX_SEND_ATTEMPTS {
            match self.send_photo_once(message, image).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, error = %e, "sendPhoto failed");
                    last_err = e;
                }
            }
            if attempt < MAX_SEND_ATTEMPTS {
                sleep(Duration::from_secs(SEND_RETRY_DELAY_SECS)).await;
            }
        }
        Err(last_err)
    }
}

async fn check_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    Err(AppError::Notify(format!(
        "Telegram API returned {}: {}",
        status, body
    )))
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::Config(format!(
            "{} is not set; configure the Telegram bot credentials",
            name
        ))),
    }
}
