use std::sync::Arc;

use trattoria_bot::{init_logger_with_file, BotServer, Config, TelegramTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境 (.env) 与日志
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logger_with_file(Some(&config.log_level), None);

    tracing::info!("🍝 Trattoria bot starting...");

    // 2. 传输层 + 服务器
    let transport = Arc::new(TelegramTransport::new(
        &config.bot_token,
        config.poll_timeout_secs,
    ));
    let server = BotServer::new(config).await?;

    // 3. Ctrl-C → 优雅停机
    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, shutting down");
            shutdown.cancel();
        }
    });

    // 4. 接收循环
    server.run(transport).await?;
    Ok(())
}
