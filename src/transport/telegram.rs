//! Telegram Bot API 传输层 (长轮询)
//!
//! getUpdates / sendMessage / answerCallbackQuery 的最小封装。
//! 机器人核心只依赖 [`Transport`] 特征 — 本模块只是它的生产实现。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::{buttons, Incoming, Keyboard, Outgoing, Transport};
use crate::utils::AppError;

// ========== Wire types (the subset of the Bot API we consume) ==========

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<TgMessage>,
    #[serde(default)]
    callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    from: Option<TgUser>,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    id: String,
    from: TgUser,
    #[serde(default)]
    data: Option<String>,
}

/// Map one update to an inbound message, plus the callback id to
/// acknowledge when the update was a button press.
///
/// Updates we do not consume (edited messages, channel posts, messages
/// without a sender) map to nothing.
fn update_to_incoming(update: Update) -> (Option<Incoming>, Option<String>) {
    if let Some(cb) = update.callback_query {
        let incoming = cb.data.map(|data| Incoming {
            sender_id: cb.from.id,
            sender_handle: cb.from.username,
            text: None,
            payload: Some(data),
        });
        return (incoming, Some(cb.id));
    }
    if let Some(msg) = update.message {
        if let Some(from) = msg.from {
            return (
                Some(Incoming {
                    sender_id: from.id,
                    sender_handle: from.username,
                    text: msg.text,
                    payload: None,
                }),
                None,
            );
        }
    }
    (None, None)
}

// ========== Transport implementation ==========

/// Long-polling Bot API transport.
pub struct TelegramTransport {
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
    /// Next getUpdates offset — one past the last seen update id
    offset: AtomicI64,
    /// Updates received in a batch but not yet handed to the loop
    queue: Mutex<VecDeque<Incoming>>,
}

impl TelegramTransport {
    pub fn new(token: &str, poll_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: format!("https://api.telegram.org/bot{token}"),
            poll_timeout_secs,
            offset: AtomicI64::new(0),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    async fn call<T: DeserializeOwned + Default>(&self, method: &str, body: Value) -> Result<T, AppError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await?;
        let api: ApiResponse<T> = response.json().await?;
        if !api.ok {
            return Err(AppError::transport(
                api.description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }
        api.result
            .ok_or_else(|| AppError::transport(format!("{method}: empty result")))
    }

    /// One long poll. Advances the offset past every received update.
    async fn poll_updates(&self) -> Result<Vec<Incoming>, AppError> {
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                json!({
                    "offset": self.offset.load(Ordering::Acquire),
                    "timeout": self.poll_timeout_secs,
                }),
            )
            .await?;

        let mut batch = Vec::new();
        for update in updates {
            self.offset.store(update.update_id + 1, Ordering::Release);
            let (incoming, callback_id) = update_to_incoming(update);
            if let Some(id) = callback_id {
                // Best effort — a missed ack only leaves the button spinner
                if let Err(e) = self
                    .call::<Value>("answerCallbackQuery", json!({ "callback_query_id": id }))
                    .await
                {
                    tracing::debug!(error = %e, "answerCallbackQuery failed");
                }
            }
            if let Some(incoming) = incoming {
                batch.push(incoming);
            }
        }
        Ok(batch)
    }

    fn reply_markup(keyboard: &Keyboard) -> Value {
        match keyboard {
            Keyboard::Main => json!({
                "keyboard": [
                    [{ "text": buttons::MENU }],
                    [{ "text": buttons::RESERVE }],
                    [{ "text": buttons::MY_POINTS }],
                ],
                "resize_keyboard": true,
            }),
            Keyboard::Inline(rows) => json!({
                "inline_keyboard": rows
                    .iter()
                    .map(|(label, payload)| {
                        vec![json!({ "text": label, "callback_data": payload })]
                    })
                    .collect::<Vec<_>>(),
            }),
            Keyboard::Remove => json!({ "remove_keyboard": true }),
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn next(&self) -> Result<Incoming, AppError> {
        loop {
            if let Some(msg) = self.queue.lock().await.pop_front() {
                return Ok(msg);
            }
            match self.poll_updates().await {
                Ok(batch) => {
                    let mut queue = self.queue.lock().await;
                    queue.extend(batch);
                }
                Err(e) => {
                    // Transient network failure — back off and poll again
                    tracing::warn!(error = %e, "getUpdates failed, retrying");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    }

    async fn send(&self, msg: &Outgoing) -> Result<(), AppError> {
        let mut body = json!({
            "chat_id": msg.recipient,
            "text": msg.text,
        });
        if let Some(keyboard) = &msg.keyboard {
            body["reply_markup"] = Self::reply_markup(keyboard);
        }
        self.call::<Value>("sendMessage", body).await?;
        Ok(())
    }
}
