//! Conversation Session Module
//!
//! 会话状态机：显式状态枚举 + 纯转移函数。
//! 状态只活在内存里，由每个用户各自的 actor 持有。

pub mod machine;
pub mod state;

pub use machine::{transition, Action, Event, Step, ORDER_POINTS, RESERVATION_POINTS};
pub use state::{ChatState, Scratch, Session};
