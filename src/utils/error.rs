//! 统一错误处理
//!
//! 应用级错误枚举。仓储层的细分错误见
//! [`crate::db::repository::RepoError`]，在向上传播时折叠为 [`AppError::Storage`]。

use crate::db::repository::RepoError;

/// Application error enum
///
/// | 分类 | 说明 |
/// |------|------|
/// | Storage | 持久层不可达或写入失败，用户收到通用失败提示 |
/// | Transport | 消息通道故障 (Telegram API、channel 关闭) |
/// | PermissionDenied | 管理命令权限门拒绝 |
/// | Config | 启动配置缺失或非法，仅在启动期出现 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper Constructors ==========

impl AppError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// ========== Conversions ==========

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
