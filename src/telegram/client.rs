//! Minimal Telegram Bot API client over `reqwest`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use super::types::{
    ApiResponse, BotCommand, GetUpdates, ReplyKeyboardMarkup, SendMessage, SetMyCommands,
    SetWebhook, Update,
};
use crate::channel::{ChannelError, ConversationChannel, SessionId};

/// Extra time granted to a long-poll request beyond the server-side timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

const ALLOWED_UPDATES: [&str; 1] = ["message"];

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    /// `<api_url>/bot<token>`
    base_url: String,
}

impl TelegramClient {
    pub fn new(http: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn call<P, R>(&self, method: &str, payload: &P) -> Result<R, ChannelError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;
        let body: ApiResponse<R> = response.json().await?;
        body.into_result()
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, ChannelError> {
        let payload = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs) + POLL_GRACE)
            .json(&payload)
            .send()
            .await?;
        let body: ApiResponse<Vec<Update>> = response.json().await?;
        body.into_result()
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), ChannelError> {
        let payload = SetWebhook {
            url,
            secret_token,
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        self.call::<_, bool>("setWebhook", &payload).await.map(|_| ())
    }

    pub async fn delete_webhook(&self) -> Result<(), ChannelError> {
        self.call::<_, bool>("deleteWebhook", &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    /// Publish the command menu shown by Telegram clients.
    pub async fn set_my_commands(&self, commands: &[(&str, &str)]) -> Result<(), ChannelError> {
        let payload = SetMyCommands {
            commands: commands
                .iter()
                .map(|&(command, description)| BotCommand {
                    command,
                    description,
                })
                .collect(),
        };
        self.call::<_, bool>("setMyCommands", &payload).await.map(|_| ())
    }
}

#[async_trait]
impl ConversationChannel for TelegramClient {
    async fn send_text(&self, session: SessionId, text: &str) -> Result<(), ChannelError> {
        let payload = SendMessage {
            chat_id: session.0,
            text,
            reply_markup: None,
        };
        self.call::<_, serde_json::Value>("sendMessage", &payload)
            .await
            .map(|_| ())
    }

    async fn send_text_with_choice(
        &self,
        session: SessionId,
        text: &str,
        choices: &[&str],
    ) -> Result<(), ChannelError> {
        let payload = SendMessage {
            chat_id: session.0,
            text,
            reply_markup: Some(ReplyKeyboardMarkup::single_column(choices)),
        };
        self.call::<_, serde_json::Value>("sendMessage", &payload)
            .await
            .map(|_| ())
    }

    async fn send_document(
        &self,
        session: SessionId,
        path: &Path,
        filename: &str,
    ) -> Result<(), ChannelError> {
        let bytes = tokio::fs::read(path).await?;
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .text("chat_id", session.0.to_string())
            .part("document", part);

        let response = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        let body: ApiResponse<serde_json::Value> = response.json().await?;
        body.into_result().map(|_| ())
    }
}
