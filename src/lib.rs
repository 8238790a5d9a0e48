//! Trattoria Bot - 餐厅点餐/订位对话机器人
//!
//! # 架构概述
//!
//! 每个用户一个会话 actor，顺序处理自己的事件；会话状态机是纯函数，
//! 持久层只通过仓储函数访问。传输层可插拔 (Telegram 长轮询 / 内存)。
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/       # 配置、服务循环
//! ├── catalog/    # 静态菜单
//! ├── session/    # 会话状态机 (纯转移函数)
//! ├── dispatch/   # 事件路由、会话 actor、管理报表
//! ├── transport/  # Telegram / Memory 传输层
//! ├── db/         # SQLite 存储层
//! └── utils/      # 错误、日志、时间
//! ```

pub mod catalog;
pub mod core;
pub mod db;
pub mod dispatch;
pub mod session;
pub mod transport;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{BotServer, Config};
pub use catalog::Catalog;
pub use db::DbService;
pub use dispatch::Dispatcher;
pub use session::{ChatState, Event, Session};
pub use transport::{
    Incoming, Keyboard, MemoryTransport, MemoryTransportHandle, Outgoing, TelegramTransport,
    Transport,
};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult};
