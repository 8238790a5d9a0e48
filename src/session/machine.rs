//! Conversation State Machine
//!
//! A pure transition function over [`Session`]:
//! `(state, event) → (next state, action)`. No I/O happens here — the
//! session actor interprets the returned [`Action`] against catalog,
//! storage and transport, and commits the next session only once the
//! action's storage effects succeeded.

use super::state::{ChatState, Scratch, Session};

/// Points awarded for a completed order.
pub const ORDER_POINTS: i64 = 10;
/// Points awarded for a completed reservation.
pub const RESERVATION_POINTS: i64 = 5;

/// An inbound event, already parsed from the transport message.
///
/// Commands and button presses are state-independent; free text is only
/// meaningful while a reservation flow is waiting for input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Help,
    ShowMenu,
    CategorySelected(String),
    ItemSelected { name: String, price: i64 },
    Checkout,
    StartReservation,
    MyPoints,
    Text(String),
}

/// What the session actor must do after a transition.
///
/// Storage-touching variants carry everything the actor needs, so the
/// machine itself never reads the session back during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Get-or-create the user and greet with the main keyboard
    Greet,
    /// List catalog categories as inline buttons
    ShowCategories,
    /// List the items of one category with prices
    ShowItems { category: String },
    /// Confirm the (over)written cart selection
    ConfirmSelection { name: String, price: i64 },
    /// Create the order and award points
    PlaceOrder { item: String, price: i64 },
    /// Checkout pressed with nothing selected — informational, not an error
    EmptyCart,
    AskReservationDate,
    AskReservationTime,
    AskReservationPeople,
    /// Create the reservation and award points
    CompleteReservation {
        date: String,
        time: String,
        people: i64,
    },
    ReportPoints,
    ShowHelp,
    /// Unrecognized input — show the fallback help
    Fallback,
}

/// Result of a transition: the session to commit and the action to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: Session,
    pub action: Action,
}

fn step(next: Session, action: Action) -> Step {
    Step { next, action }
}

/// Lenient people-count parsing: anything that is not a positive integer
/// becomes 1. A normalization policy, not a validation policy — the guest
/// is never bounced out of the flow over a typo.
pub fn parse_people(text: &str) -> i64 {
    text.trim().parse::<i64>().ok().filter(|n| *n >= 1).unwrap_or(1)
}

/// The pure transition function.
pub fn transition(session: &Session, event: &Event) -> Step {
    match event {
        // /start resets everything and re-registers the user
        Event::Start => step(Session::default(), Action::Greet),

        Event::Help => step(session.clone(), Action::ShowHelp),

        Event::ShowMenu => step(session.clone(), Action::ShowCategories),

        Event::CategorySelected(name) => step(
            session.clone(),
            Action::ShowItems {
                category: name.clone(),
            },
        ),

        // Selecting an item always overwrites the pending selection —
        // the cart holds exactly one item
        Event::ItemSelected { name, price } => {
            let mut next = session.clone();
            next.state = ChatState::AwaitingCartItem;
            next.scratch.chosen_item = Some(name.clone());
            next.scratch.chosen_price = Some(*price);
            step(
                next,
                Action::ConfirmSelection {
                    name: name.clone(),
                    price: *price,
                },
            )
        }

        Event::Checkout => match (&session.scratch.chosen_item, session.scratch.chosen_price) {
            (Some(item), Some(price)) => step(
                Session::default(),
                Action::PlaceOrder {
                    item: item.clone(),
                    price,
                },
            ),
            // Empty cart is an informational reply, the session stays put
            _ => step(session.clone(), Action::EmptyCart),
        },

        Event::StartReservation => {
            // Entering the reservation flow drops any unsubmitted selection
            let next = Session {
                state: ChatState::WaitingReservationDate,
                scratch: Scratch::default(),
            };
            step(next, Action::AskReservationDate)
        }

        Event::MyPoints => step(session.clone(), Action::ReportPoints),

        Event::Text(text) => match session.state {
            ChatState::WaitingReservationDate => {
                // Stored verbatim — no format validation, by intent
                let mut next = session.clone();
                next.state = ChatState::WaitingReservationTime;
                next.scratch.reservation_date = Some(text.clone());
                step(next, Action::AskReservationTime)
            }
            ChatState::WaitingReservationTime => {
                let mut next = session.clone();
                next.state = ChatState::WaitingReservationPeople;
                next.scratch.reservation_time = Some(text.clone());
                step(next, Action::AskReservationPeople)
            }
            ChatState::WaitingReservationPeople => {
                let people = parse_people(text);
                match (
                    session.scratch.reservation_date.clone(),
                    session.scratch.reservation_time.clone(),
                ) {
                    (Some(date), Some(time)) => step(
                        Session::default(),
                        Action::CompleteReservation { date, time, people },
                    ),
                    // Unreachable through the transitions above; recover anyway
                    _ => step(Session::default(), Action::Fallback),
                }
            }
            ChatState::Browsing | ChatState::AwaitingCartItem => {
                step(session.clone(), Action::Fallback)
            }
        },
    }
}
