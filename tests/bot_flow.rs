//! End-to-end conversation flows over the in-process transport.
//!
//! Each test boots the real server (temp-file SQLite, real migrations),
//! injects inbound messages through the memory transport and observes the
//! replies, then checks the durable state through the repositories.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use trattoria_bot::db::repository::{order, reservation, user};
use trattoria_bot::{
    BotServer, Config, DbService, Incoming, Keyboard, MemoryTransport, MemoryTransportHandle,
    Outgoing,
};

struct TestBot {
    handle: MemoryTransportHandle,
    db: DbService,
    /// Replies received while waiting for another recipient
    pending: Vec<Outgoing>,
    // Held for the lifetime of the test so the database file survives
    _dir: TempDir,
}

async fn spawn_bot(admin_id: Option<i64>) -> TestBot {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.sqlite");
    let config = Config {
        bot_token: "test-token".into(),
        admin_id,
        db_path: db_path.to_string_lossy().into_owned(),
        poll_timeout_secs: 1,
        log_level: "info".into(),
    };

    let server = BotServer::new(config).await.unwrap();
    let db = server.db().clone();
    let (transport, handle) = MemoryTransport::channel();
    tokio::spawn(server.run(Arc::new(transport)));

    TestBot {
        handle,
        db,
        pending: Vec::new(),
        _dir: dir,
    }
}

fn text(sender_id: i64, text: &str) -> Incoming {
    Incoming {
        sender_id,
        sender_handle: Some(format!("user{sender_id}")),
        text: Some(text.into()),
        payload: None,
    }
}

fn button(sender_id: i64, payload: &str) -> Incoming {
    Incoming {
        sender_id,
        sender_handle: Some(format!("user{sender_id}")),
        text: None,
        payload: Some(payload.into()),
    }
}

/// Next reply addressed to `recipient`. Other users' traffic is buffered,
/// not dropped, so interleaved flows can be awaited in any order.
async fn reply_for(bot: &mut TestBot, recipient: i64) -> Outgoing {
    if let Some(pos) = bot.pending.iter().position(|m| m.recipient == recipient) {
        return bot.pending.remove(pos);
    }
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), bot.handle.out_rx.recv())
            .await
            .expect("timed out waiting for a reply")
            .expect("transport closed");
        if msg.recipient == recipient {
            return msg;
        }
        bot.pending.push(msg);
    }
}

#[tokio::test]
async fn test_checkout_keeps_only_most_recent_selection() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(42, "/start")).unwrap();
    assert!(reply_for(&mut bot, 42).await.text.contains("Привет"));

    bot.handle.in_tx.send(button(42, "item:Брускетта:320")).unwrap();
    assert!(reply_for(&mut bot, 42).await.text.contains("Брускетта"));

    bot.handle.in_tx.send(button(42, "item:Тирамису:380")).unwrap();
    assert!(reply_for(&mut bot, 42).await.text.contains("Тирамису"));

    bot.handle.in_tx.send(text(42, "/checkout")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert!(reply.text.contains("Заказ #1 создан"));
    assert!(reply.text.contains("+10 баллов"));

    // Exactly one order — the overwritten 320-item never reached storage
    let orders = order::list_recent(&bot.db.pool, 50).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].item, "Тирамису");
    assert_eq!(orders[0].total, 380);
    assert_eq!(orders[0].quantity, 1);

    assert_eq!(user::find_points(&bot.db.pool, 42).await.unwrap(), Some(10));
}

#[tokio::test]
async fn test_empty_cart_checkout_is_a_noop() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(42, "/start")).unwrap();
    reply_for(&mut bot, 42).await;

    bot.handle.in_tx.send(text(42, "/checkout")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert!(reply.text.contains("Корзина пуста"));

    assert!(order::list_recent(&bot.db.pool, 50).await.unwrap().is_empty());
    assert_eq!(user::find_points(&bot.db.pool, 42).await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_menu_browsing_offers_item_buttons() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(42, "🍽 Меню")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert_eq!(reply.text, "Выберите категорию:");
    match reply.keyboard {
        Some(Keyboard::Inline(rows)) => {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0].1, "cat:Закуски");
        }
        other => panic!("expected inline keyboard, got {other:?}"),
    }

    bot.handle.in_tx.send(button(42, "cat:Закуски")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert_eq!(reply.text, "Категория: Закуски");
    match reply.keyboard {
        Some(Keyboard::Inline(rows)) => {
            assert_eq!(rows[0].0, "Брускетта — 320₽");
            assert_eq!(rows[0].1, "item:Брускетта:320");
        }
        other => panic!("expected inline keyboard, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reservation_flow_with_lenient_people_count() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(42, "🪑 Забронировать")).unwrap();
    assert!(reply_for(&mut bot, 42).await.text.contains("дату"));

    bot.handle.in_tx.send(text(42, "2025-12-31")).unwrap();
    assert!(reply_for(&mut bot, 42).await.text.contains("время"));

    bot.handle.in_tx.send(text(42, "19:30")).unwrap();
    assert!(reply_for(&mut bot, 42).await.text.contains("количество"));

    bot.handle.in_tx.send(text(42, "abc")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert!(reply.text.contains("Бронирование #1 создано"));
    assert!(reply.text.contains("1 чел"));

    let rows = reservation::list_recent(&bot.db.pool, 50).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-12-31");
    assert_eq!(rows[0].time, "19:30");
    assert_eq!(rows[0].people, 1);

    assert_eq!(user::find_points(&bot.db.pool, 42).await.unwrap(), Some(5));
}

#[tokio::test]
async fn test_concurrent_reservation_flows_stay_isolated() {
    let mut bot = spawn_bot(None).await;
    let (alice, bob) = (42, 77);

    // Interleave the two flows step by step
    bot.handle.in_tx.send(text(alice, "🪑 Забронировать")).unwrap();
    bot.handle.in_tx.send(text(bob, "🪑 Забронировать")).unwrap();
    reply_for(&mut bot, alice).await;
    reply_for(&mut bot, bob).await;

    bot.handle.in_tx.send(text(alice, "2025-12-31")).unwrap();
    bot.handle.in_tx.send(text(bob, "2026-01-15")).unwrap();
    reply_for(&mut bot, alice).await;
    reply_for(&mut bot, bob).await;

    bot.handle.in_tx.send(text(bob, "21:00")).unwrap();
    bot.handle.in_tx.send(text(alice, "19:30")).unwrap();
    reply_for(&mut bot, alice).await;
    reply_for(&mut bot, bob).await;

    bot.handle.in_tx.send(text(alice, "2")).unwrap();
    bot.handle.in_tx.send(text(bob, "4")).unwrap();
    assert!(reply_for(&mut bot, alice).await.text.contains("2025-12-31 19:30, 2 чел"));
    assert!(reply_for(&mut bot, bob).await.text.contains("2026-01-15 21:00, 4 чел"));

    // Neither user's scratch leaked into the other's record
    let rows = reservation::list_recent(&bot.db.pool, 50).await.unwrap();
    assert_eq!(rows.len(), 2);
    let alice_row = rows.iter().find(|r| r.tg_id == alice).unwrap();
    let bob_row = rows.iter().find(|r| r.tg_id == bob).unwrap();
    assert_eq!((alice_row.date.as_str(), alice_row.people), ("2025-12-31", 2));
    assert_eq!((bob_row.date.as_str(), bob_row.people), ("2026-01-15", 4));

    assert_eq!(user::find_points(&bot.db.pool, alice).await.unwrap(), Some(5));
    assert_eq!(user::find_points(&bot.db.pool, bob).await.unwrap(), Some(5));
}

#[tokio::test]
async fn test_admin_report_gate() {
    let mut bot = spawn_bot(Some(99)).await;

    // Non-privileged sender is rejected
    bot.handle.in_tx.send(text(5, "/admin_orders")).unwrap();
    let reply = reply_for(&mut bot, 5).await;
    assert_eq!(reply.text, "Недостаточно прав.");

    // The privileged identity gets the (empty) report
    bot.handle.in_tx.send(text(99, "/admin_orders")).unwrap();
    let reply = reply_for(&mut bot, 99).await;
    assert!(reply.text.contains("Заказов нет."));
}

#[tokio::test]
async fn test_admin_report_rejected_when_unconfigured() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(5, "/admin_orders")).unwrap();
    let reply = reply_for(&mut bot, 5).await;
    assert_eq!(reply.text, "Недостаточно прав.");
}

#[tokio::test]
async fn test_points_for_unknown_user_read_as_zero() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(42, "🧾 Мои баллы")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert_eq!(reply.text, "У вас 0 баллов.");

    // Reading the balance never creates a user row
    assert!(user::find_by_tg_id(&bot.db.pool, 42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unrecognized_text_falls_back_to_help() {
    let mut bot = spawn_bot(None).await;

    bot.handle.in_tx.send(text(42, "что посоветуете?")).unwrap();
    let reply = reply_for(&mut bot, 42).await;
    assert!(reply.text.contains("Используйте меню"));
    assert_eq!(reply.keyboard, Some(Keyboard::Main));
}
