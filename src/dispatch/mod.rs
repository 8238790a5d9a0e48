//! Dispatcher
//!
//! 入站消息 → 事件 → 按用户路由到会话 actor。
//!
//! ```text
//! Transport ──► parse() ──┬─► SessionWorker (user A)   ──► Outgoing
//!                         ├─► SessionWorker (user B)   ──► Outgoing
//!                         └─► report::handle (管理报表, 权限门)
//! ```
//!
//! Events for one user are queued into that user's actor and processed
//! strictly in arrival order; actors for different users run concurrently.

pub mod report;
pub mod texts;
mod worker;

use std::sync::Arc;

use dashmap::DashMap;

use crate::catalog::Catalog;
use crate::db::DbService;
use crate::session::Event;
use crate::transport::{buttons, Incoming, Keyboard, Outgoing, Transport};
use worker::{SessionHandle, SessionWorker, WorkerMsg};

/// What the dispatcher extracted from one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Feed the conversation state machine
    Machine(Event),
    /// Privileged report request — gated here, never reaches the machine
    AdminReport,
    /// Nothing recognizable (no text, malformed payload) — fallback help
    Unrecognized,
}

/// Parse an inbound message into an event.
///
/// Button payloads take precedence over text; commands and the main
/// keyboard labels are matched verbatim; anything else is free text for
/// the reservation flow.
pub fn parse(incoming: &Incoming) -> Parsed {
    if let Some(payload) = &incoming.payload {
        if let Some(category) = payload.strip_prefix("cat:") {
            return Parsed::Machine(Event::CategorySelected(category.to_string()));
        }
        if let Some(rest) = payload.strip_prefix("item:") {
            // item:<name>:<price> — the price is always the last segment
            if let Some((name, price)) = rest.rsplit_once(':') {
                if let Ok(price) = price.parse::<i64>() {
                    return Parsed::Machine(Event::ItemSelected {
                        name: name.to_string(),
                        price,
                    });
                }
            }
        }
        return Parsed::Unrecognized;
    }

    let Some(text) = incoming.text.as_deref() else {
        return Parsed::Unrecognized;
    };
    match text {
        "/start" => Parsed::Machine(Event::Start),
        "/checkout" => Parsed::Machine(Event::Checkout),
        "/help" => Parsed::Machine(Event::Help),
        "/admin_orders" => Parsed::AdminReport,
        buttons::MENU => Parsed::Machine(Event::ShowMenu),
        buttons::RESERVE => Parsed::Machine(Event::StartReservation),
        buttons::MY_POINTS => Parsed::Machine(Event::MyPoints),
        other => Parsed::Machine(Event::Text(other.to_string())),
    }
}

/// Routes inbound events to per-user session actors.
pub struct Dispatcher {
    db: DbService,
    catalog: Catalog,
    transport: Arc<dyn Transport>,
    /// The single privileged identity; `None` closes the report gate
    admin_id: Option<i64>,
    sessions: DashMap<i64, SessionHandle>,
}

impl Dispatcher {
    pub fn new(
        db: DbService,
        catalog: Catalog,
        transport: Arc<dyn Transport>,
        admin_id: Option<i64>,
    ) -> Self {
        Self {
            db,
            catalog,
            transport,
            admin_id,
            sessions: DashMap::new(),
        }
    }

    /// Handle one inbound message. Never blocks on another user's work:
    /// machine events are queued, the admin report runs on its own task.
    pub async fn dispatch(&self, incoming: Incoming) {
        match parse(&incoming) {
            Parsed::Machine(event) => {
                self.route(incoming.sender_id, incoming.sender_handle, event);
            }
            Parsed::AdminReport => {
                let db = self.db.clone();
                let transport = self.transport.clone();
                let admin_id = self.admin_id;
                let sender_id = incoming.sender_id;
                tokio::spawn(async move {
                    if let Err(e) =
                        report::handle(&db, transport.as_ref(), admin_id, sender_id).await
                    {
                        tracing::error!(user = sender_id, error = %e, "admin report failed");
                    }
                });
            }
            Parsed::Unrecognized => {
                let reply = Outgoing::with_keyboard(
                    incoming.sender_id,
                    texts::FALLBACK,
                    Keyboard::Main,
                );
                if let Err(e) = self.transport.send(&reply).await {
                    tracing::warn!(user = incoming.sender_id, error = %e, "fallback reply failed");
                }
            }
        }
    }

    /// Enqueue an event for the user's actor, spawning it on first contact.
    fn route(&self, sender_id: i64, handle: Option<String>, event: Event) {
        let msg = WorkerMsg { event, handle };
        let msg = {
            let entry = self
                .sessions
                .entry(sender_id)
                .or_insert_with(|| self.spawn_worker(sender_id));
            match entry.tx.send(msg) {
                Ok(()) => return,
                Err(e) => e.0,
            }
        };
        // The actor is gone (runtime shutdown race) — replace it and retry
        let fresh = self.spawn_worker(sender_id);
        let _ = fresh.tx.send(msg);
        self.sessions.insert(sender_id, fresh);
    }

    fn spawn_worker(&self, user_id: i64) -> SessionHandle {
        SessionWorker::spawn(
            user_id,
            self.db.clone(),
            self.catalog,
            self.transport.clone(),
        )
    }
}
