//! Session Actor
//!
//! One task per user identity. The actor owns the conversation session,
//! applies the pure transition, performs the resulting storage effects,
//! and only then commits the next session and sends the replies.
//!
//! 同一用户的事件严格按到达顺序处理；不同用户的 actor 完全并行。
//! Actor 内的任何错误都被隔离：记录日志、回复通用失败提示，继续服务。

use std::sync::Arc;

use tokio::sync::mpsc;

use super::texts;
use crate::catalog::Catalog;
use crate::db::repository::{order, reservation, user};
use crate::db::DbService;
use crate::session::{transition, Action, Event, Session, ORDER_POINTS, RESERVATION_POINTS};
use crate::transport::{Keyboard, Outgoing, Transport};
use crate::utils::AppResult;

/// One unit of work for a session actor.
pub(super) struct WorkerMsg {
    pub event: Event,
    /// Sender handle from the transport, refreshed on every message
    pub handle: Option<String>,
}

/// Dispatcher-side handle to a running actor.
pub(super) struct SessionHandle {
    pub tx: mpsc::UnboundedSender<WorkerMsg>,
}

pub(super) struct SessionWorker {
    pub user_id: i64,
    pub db: DbService,
    pub catalog: Catalog,
    pub transport: Arc<dyn Transport>,
    pub rx: mpsc::UnboundedReceiver<WorkerMsg>,
    pub session: Session,
}

impl SessionWorker {
    pub fn spawn(
        user_id: i64,
        db: DbService,
        catalog: Catalog,
        transport: Arc<dyn Transport>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self {
            user_id,
            db,
            catalog,
            transport,
            rx,
            session: Session::default(),
        };
        tokio::spawn(worker.run());
        SessionHandle { tx }
    }

    /// Actor loop. Ends when the dispatcher drops the handle.
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            let step = transition(&self.session, &msg.event);
            match self.perform(&step.action, msg.handle.as_deref()).await {
                Ok(replies) => {
                    // Storage effects are done — commit before replying, so a
                    // failed delivery can never re-run a completed checkout
                    self.session = step.next;
                    for reply in replies {
                        if let Err(e) = self.transport.send(&reply).await {
                            tracing::warn!(user = self.user_id, error = %e, "reply delivery failed");
                        }
                    }
                }
                Err(e) => {
                    // Session NOT advanced — the user may retry the same step
                    tracing::error!(user = self.user_id, error = %e, "session effect failed");
                    let fallback = Outgoing::text(self.user_id, texts::SERVICE_UNAVAILABLE);
                    if let Err(e) = self.transport.send(&fallback).await {
                        tracing::warn!(user = self.user_id, error = %e, "failure notice undeliverable");
                    }
                }
            }
        }
    }

    /// Run the storage side of an action and build the replies.
    ///
    /// Pure with respect to the session: everything needed arrives inside
    /// the [`Action`].
    async fn perform(&self, action: &Action, handle: Option<&str>) -> AppResult<Vec<Outgoing>> {
        let replies = match action {
            Action::Greet => {
                user::get_or_create(&self.db.pool, self.user_id, handle).await?;
                vec![Outgoing::with_keyboard(
                    self.user_id,
                    texts::GREETING,
                    Keyboard::Main,
                )]
            }

            Action::ShowCategories => {
                let rows = self
                    .catalog
                    .categories()
                    .map(|c| (c.to_string(), format!("cat:{c}")))
                    .collect();
                vec![Outgoing::with_keyboard(
                    self.user_id,
                    texts::CHOOSE_CATEGORY,
                    Keyboard::Inline(rows),
                )]
            }

            Action::ShowItems { category } => {
                let rows = self
                    .catalog
                    .items(category)
                    .iter()
                    .map(|item| {
                        (
                            texts::item_button_label(item.name, item.price),
                            format!("item:{}:{}", item.name, item.price),
                        )
                    })
                    .collect();
                vec![Outgoing::with_keyboard(
                    self.user_id,
                    texts::category_header(category),
                    Keyboard::Inline(rows),
                )]
            }

            Action::ConfirmSelection { name, price } => {
                vec![Outgoing::text(self.user_id, texts::added_to_cart(name, *price))]
            }

            Action::PlaceOrder { item, price } => {
                let (uid, _) = user::get_or_create(&self.db.pool, self.user_id, handle).await?;
                let order_id = order::create_with_award(
                    &self.db.pool,
                    uid,
                    item,
                    1,
                    *price,
                    None,
                    None,
                    ORDER_POINTS,
                )
                .await?;
                tracing::info!(user = self.user_id, order_id, item = %item, "order created");
                vec![Outgoing::text(self.user_id, texts::order_created(order_id))]
            }

            Action::EmptyCart => vec![Outgoing::text(self.user_id, texts::EMPTY_CART)],

            Action::AskReservationDate => vec![Outgoing::with_keyboard(
                self.user_id,
                texts::ASK_DATE,
                Keyboard::Remove,
            )],

            Action::AskReservationTime => vec![Outgoing::text(self.user_id, texts::ASK_TIME)],

            Action::AskReservationPeople => vec![Outgoing::text(self.user_id, texts::ASK_PEOPLE)],

            Action::CompleteReservation { date, time, people } => {
                let (uid, _) = user::get_or_create(&self.db.pool, self.user_id, handle).await?;
                let reservation_id = reservation::create_with_award(
                    &self.db.pool,
                    uid,
                    date,
                    time,
                    *people,
                    RESERVATION_POINTS,
                )
                .await?;
                tracing::info!(user = self.user_id, reservation_id, "reservation created");
                vec![Outgoing::with_keyboard(
                    self.user_id,
                    texts::reservation_created(reservation_id, date, time, *people),
                    Keyboard::Remove,
                )]
            }

            Action::ReportPoints => {
                let points = user::find_points(&self.db.pool, self.user_id)
                    .await?
                    .unwrap_or(0);
                vec![Outgoing::text(self.user_id, texts::points_balance(points))]
            }

            Action::ShowHelp => vec![Outgoing::text(self.user_id, texts::HELP)],

            Action::Fallback => vec![Outgoing::with_keyboard(
                self.user_id,
                texts::FALLBACK,
                Keyboard::Main,
            )],
        };
        Ok(replies)
    }
}
