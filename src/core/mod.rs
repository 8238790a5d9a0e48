//! Core Module
//!
//! Configuration and the bot receive loop.

pub mod bot;
pub mod config;

pub use bot::BotServer;
pub use config::Config;
