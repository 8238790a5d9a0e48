//! Conversation session state

/// FSM states. `Browsing` is the initial state and the terminal state of
/// every completed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Browsing,
    AwaitingCartItem,
    WaitingReservationDate,
    WaitingReservationTime,
    WaitingReservationPeople,
}

/// Scratch data carried between conversation turns, cleared on flow
/// completion.
///
/// The cart is the single `chosen_*` pair — a new selection overwrites the
/// previous one; there is no quantity accumulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scratch {
    pub chosen_item: Option<String>,
    pub chosen_price: Option<i64>,
    pub reservation_date: Option<String>,
    pub reservation_time: Option<String>,
}

/// Per-user conversation session: current state + scratch data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: ChatState,
    pub scratch: Scratch,
}
