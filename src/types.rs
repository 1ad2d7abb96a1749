//! Common types and data structures

/// One of the fixed vote options presented as buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    First,
    Second,
}

impl Choice {
    pub const ALL: [Choice; 2] = [Choice::First, Choice::Second];

    /// Label sent over the wire and echoed by the status line
    pub fn label(self) -> &'static str {
        match self {
            Choice::First => "Choice 1",
            Choice::Second => "Choice 2",
        }
    }
}

/// JSON body of the vote POST
#[derive(serde::Serialize)]
pub struct VotePayload {
    pub choice: String,
    pub name: String,
}

/// Transient vote state shared between the UI and in-flight submissions.
///
/// `last_choice` is recorded before the backend answers and is never rolled
/// back; `last_error` alone reflects a failed submission, so both can be set
/// at once.
#[derive(Default)]
pub struct VoteState {
    /// Choice currently shown as cast
    pub last_choice: Option<Choice>,
    /// Current user-facing error line, if any
    pub last_error: Option<String>,
    /// Number of unresolved POSTs
    pub in_flight: usize,
    /// POSTs issued this session
    pub requests_sent: u64,
}
