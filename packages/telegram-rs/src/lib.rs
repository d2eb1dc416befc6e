// https://core.telegram.org/bots/api

pub mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ApiResponse, Message, SendMessageOptions, SendMessageRequest, User};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Request to Telegram failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api {
        code: u16,
        description: String,
        retry_after: Option<u64>,
    },

    #[error("Telegram reply for {0} had no result")]
    MissingResult(&'static str),
}

impl TelegramError {
    /// Flood control: HTTP 429 / "Too Many Requests".
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api {
                code, description, ..
            } => *code == 429 || description.contains("Too Many Requests"),
            Self::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            Self::MissingResult(_) => false,
        }
    }

    /// Server-suggested wait in seconds, when given.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    /// Override for tests or self-hosted Bot API servers
    pub api_base: Option<String>,
}

impl TelegramOptions {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn method_url(&self, method: &str) -> String {
        let base = self
            .options
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/bot{}/{}", base, self.options.bot_token, method)
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            // The URL carries the bot token
            .map_err(|e| TelegramError::Http(e.without_url()))?;

        let status = response.status();
        let reply = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| TelegramError::Http(e.without_url()))?;

        into_result(method, status.as_u16(), reply)
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        options: &SendMessageOptions,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: options.parse_mode,
            disable_web_page_preview: options.disable_web_page_preview,
            disable_notification: options.disable_notification,
        };
        self.call("sendMessage", &request).await
    }

    /// The bot's own account; a cheap credentials check.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }
}

fn into_result<T>(method: &'static str, status: u16, reply: ApiResponse<T>) -> Result<T, TelegramError> {
    if !reply.ok {
        return Err(TelegramError::Api {
            code: reply.error_code.unwrap_or(status),
            description: reply
                .description
                .unwrap_or_else(|| "no description".to_string()),
            retry_after: reply.parameters.and_then(|p| p.retry_after),
        });
    }
    reply.result.ok_or(TelegramError::MissingResult(method))
}
