//! Admin Reporting
//!
//! Read-only projection over storage for the privileged operator.
//! The permission gate lives here: when no admin identity is configured,
//! or the sender does not match it, the request is rejected before any
//! storage query runs.

use std::fmt::Write as _;

use crate::db::models::{OrderWithUser, ReservationWithUser};
use crate::db::repository::{order, reservation};
use crate::db::DbService;
use crate::dispatch::texts;
use crate::transport::{Outgoing, Transport};
use crate::utils::time::format_millis;
use crate::utils::{AppError, AppResult};

/// How many rows of each record set the report shows.
pub const REPORT_LIMIT: i64 = 50;

/// Permission gate: only the single configured identity passes. When no
/// admin is configured, nobody does.
pub fn authorize(admin_id: Option<i64>, sender_id: i64) -> AppResult<()> {
    if admin_id == Some(sender_id) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

/// Gate, query, format, reply.
pub async fn handle(
    db: &DbService,
    transport: &dyn Transport,
    admin_id: Option<i64>,
    sender_id: i64,
) -> AppResult<()> {
    if let Err(e) = authorize(admin_id, sender_id) {
        // Rejected before any storage query runs
        tracing::warn!(user = sender_id, error = %e, "admin report rejected");
        return transport
            .send(&Outgoing::text(sender_id, texts::NO_PERMISSION))
            .await;
    }

    let orders = order::list_recent(&db.pool, REPORT_LIMIT).await?;
    let reservations = reservation::list_recent(&db.pool, REPORT_LIMIT).await?;
    transport
        .send(&Outgoing::text(sender_id, render(&orders, &reservations)))
        .await
}

/// Pure formatting over the joined rows.
pub fn render(orders: &[OrderWithUser], reservations: &[ReservationWithUser]) -> String {
    let mut text = String::new();

    if orders.is_empty() {
        text.push_str("Заказов нет.\n");
    } else {
        text.push_str("Последние заказы:\n");
        for o in orders {
            let _ = writeln!(
                text,
                "#{} — @{}({}): {} x{} — {} — {}",
                o.id,
                o.username.as_deref().unwrap_or("—"),
                o.tg_id,
                o.item,
                o.quantity,
                o.status.as_str(),
                format_millis(o.created_at),
            );
        }
    }

    if !reservations.is_empty() {
        text.push_str("\nПоследние бронирования:\n");
        for r in reservations {
            let _ = writeln!(
                text,
                "#{} — @{}({}): {} {} — {} чел — {}",
                r.id,
                r.username.as_deref().unwrap_or("—"),
                r.tg_id,
                r.date,
                r.time,
                r.people,
                r.status.as_str(),
            );
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderStatus, ReservationStatus};

    fn sample_order() -> OrderWithUser {
        OrderWithUser {
            id: 3,
            tg_id: 42,
            username: Some("alice".into()),
            item: "Тирамису".into(),
            quantity: 1,
            total: 380,
            status: OrderStatus::New,
            created_at: 1_767_209_400_000,
        }
    }

    fn sample_reservation() -> ReservationWithUser {
        ReservationWithUser {
            id: 2,
            tg_id: 42,
            username: None,
            date: "2025-12-31".into(),
            time: "19:30".into(),
            people: 4,
            status: ReservationStatus::Pending,
            created_at: 1_767_209_400_000,
        }
    }

    #[test]
    fn test_authorize_only_configured_identity() {
        assert!(authorize(Some(99), 99).is_ok());
        assert!(authorize(Some(99), 5).is_err());
    }

    #[test]
    fn test_authorize_closed_when_unconfigured() {
        assert!(authorize(None, 99).is_err());
    }

    #[test]
    fn test_render_empty_store() {
        let text = render(&[], &[]);
        assert_eq!(text, "Заказов нет.\n");
    }

    #[test]
    fn test_render_orders_section() {
        let text = render(&[sample_order()], &[]);
        assert!(text.starts_with("Последние заказы:\n"));
        assert!(text.contains("#3 — @alice(42): Тирамису x1 — new — 2025-12-31 19:30"));
        assert!(!text.contains("бронирования"));
    }

    #[test]
    fn test_render_reservation_without_username() {
        let text = render(&[], &[sample_reservation()]);
        assert!(text.contains("Заказов нет."));
        assert!(text.contains("#2 — @—(42): 2025-12-31 19:30 — 4 чел — pending"));
    }
}
