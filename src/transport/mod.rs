//! Transport 传输层抽象
//!
//! 提供可插拔的传输层架构：
//! ```text
//!         ┌────────────────────┐
//!         │   Transport Trait  │  ◄── 可插拔接口
//!         └────────┬───────────┘
//!                  │
//!         ┌────────┴─────────┐
//!         ▼                  ▼
//! TelegramTransport    MemoryTransport
//! (Bot API 长轮询)      (同进程/测试)
//! ```

mod memory;
mod telegram;

pub use memory::{MemoryTransport, MemoryTransportHandle};
pub use telegram::TelegramTransport;

use async_trait::async_trait;

use crate::utils::AppError;

/// Labels of the persistent main keyboard. The dispatcher matches inbound
/// text against these, so transport and routing stay in sync.
pub mod buttons {
    pub const MENU: &str = "🍽 Меню";
    pub const RESERVE: &str = "🪑 Забронировать";
    pub const MY_POINTS: &str = "🧾 Мои баллы";
}

/// One inbound message from the messaging channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    /// Stable sender identity (Telegram user id)
    pub sender_id: i64,
    /// Display handle, if the sender has one
    pub sender_handle: Option<String>,
    /// Free text or command, when the update carries text
    pub text: Option<String>,
    /// Inline-button payload, when the update is a button press
    pub payload: Option<String>,
}

/// Reply markup attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent main keyboard (menu / reserve / my points)
    Main,
    /// Inline button grid, one `(label, payload)` button per row
    Inline(Vec<(String, String)>),
    /// Remove the persistent keyboard
    Remove,
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub recipient: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Outgoing {
    /// Plain text reply.
    pub fn text(recipient: i64, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            keyboard: None,
        }
    }

    /// Reply with markup.
    pub fn with_keyboard(recipient: i64, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            recipient,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Transport 传输层特征
///
/// 所有传输实现必须实现此特征，支持接收更新与发送回复。
#[async_trait]
pub trait Transport: Send + Sync {
    /// Next inbound message. Blocks until one arrives; an error is fatal
    /// for the receive loop.
    async fn next(&self) -> Result<Incoming, AppError>;

    /// Deliver one outbound message.
    async fn send(&self, msg: &Outgoing) -> Result<(), AppError>;

    /// Close the transport.
    async fn close(&self) -> Result<(), AppError> {
        Ok(())
    }
}
