//! 服务配置
//!
//! # 环境变量
//!
//! 所有配置项通过环境变量 (或 `.env`) 提供：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | BOT_TOKEN | (必填) | Telegram Bot API 凭证 |
//! | ADMIN_ID | (无) | 管理报表的唯一授权身份 |
//! | DB_PATH | trattoria.sqlite | SQLite 数据库路径 |
//! | POLL_TIMEOUT_SECS | 30 | 长轮询超时 (秒) |
//! | LOG_LEVEL | info | 日志级别 |
//!
//! # 示例
//!
//! ```ignore
//! BOT_TOKEN=123:abc ADMIN_ID=99 cargo run
//! ```

use crate::utils::AppError;

/// Bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API credential
    pub bot_token: String,
    /// The single privileged identity for /admin_orders. When unset the
    /// report command is rejected for everyone.
    pub admin_id: Option<i64>,
    /// SQLite database path
    pub db_path: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only `BOT_TOKEN` is mandatory.
    pub fn from_env() -> Result<Self, AppError> {
        let bot_token = std::env::var("BOT_TOKEN")
            .map_err(|_| AppError::config("Set BOT_TOKEN in the environment (see .env.example)"))?;

        Ok(Self {
            bot_token,
            admin_id: std::env::var("ADMIN_ID").ok().and_then(|v| v.parse().ok()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "trattoria.sqlite".into()),
            poll_timeout_secs: std::env::var("POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        })
    }
}
