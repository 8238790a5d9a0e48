//! Database Models
//!
//! Row types for the three record sets. Timestamps are UTC milliseconds.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bot user. Created lazily on first contact, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    /// Telegram identity — stable across sessions, UNIQUE in storage
    pub tg_id: i64,
    pub username: Option<String>,
    /// Loyalty balance — only ever increases
    pub points: i64,
    pub created_at: i64,
}

/// Order status. Only `new` is produced today; `confirmed`/`cancelled`
/// are reserved for the confirmation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// A placed order. Immutable once created, except `status`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub item: String,
    pub quantity: i64,
    /// Whole-ruble total, no minor units
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Reservation status. Only `pending` is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

/// A table reservation. Date/time are stored verbatim as the guest typed
/// them — no format validation at this layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub time: String,
    pub people: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
}

/// Order joined with its owner, for the admin report
#[derive(Debug, Clone, FromRow)]
pub struct OrderWithUser {
    pub id: i64,
    pub tg_id: i64,
    pub username: Option<String>,
    pub item: String,
    pub quantity: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Reservation joined with its owner, for the admin report
#[derive(Debug, Clone, FromRow)]
pub struct ReservationWithUser {
    pub id: i64,
    pub tg_id: i64,
    pub username: Option<String>,
    pub date: String,
    pub time: String,
    pub people: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
}
