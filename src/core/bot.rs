//! Bot Server
//!
//! Wires configuration, storage, dispatcher and transport together and
//! owns the receive loop with graceful shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::catalog::Catalog;
use crate::core::Config;
use crate::db::DbService;
use crate::dispatch::Dispatcher;
use crate::transport::Transport;
use crate::utils::{AppError, AppResult};

pub struct BotServer {
    config: Config,
    db: DbService,
    shutdown: CancellationToken,
}

impl BotServer {
    /// Open storage (running migrations) and prepare the server.
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path).await?;
        Ok(Self {
            config,
            db,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    /// Token that stops the receive loop when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Receive loop: transport → dispatcher, until shutdown or a fatal
    /// transport failure. A failure while handling one user's message is
    /// contained inside that user's actor and never reaches this loop.
    pub async fn run(self, transport: Arc<dyn Transport>) -> AppResult<()> {
        let dispatcher = Dispatcher::new(
            self.db.clone(),
            Catalog::new(),
            transport.clone(),
            self.config.admin_id,
        );

        tracing::info!("🤖 Bot receive loop started");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Bot receive loop shutting down");
                    break;
                }

                incoming = transport.next() => {
                    match incoming {
                        Ok(msg) => dispatcher.dispatch(msg).await,
                        Err(AppError::Transport(reason)) => {
                            tracing::info!(%reason, "transport closed");
                            break;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "fatal receive error");
                            break;
                        }
                    }
                }
            }
        }

        transport.close().await
    }
}
