//! Per-session protocol state machine
//!
//! Turns one inbound line into the action the server must take. The state is
//! derived from the session's nickname, so the machine itself holds no data.

use crate::session::Session;

/// Characters stripped from both ends of every inbound line
const TRIM_CHARS: [char; 6] = [' ', '\t', '\r', '\n', '\x0C', '\x0B'];

/// Strip leading and trailing whitespace/control characters
///
/// Interior characters are never touched.
pub fn trim(line: &str) -> &str {
    line.trim_matches(&TRIM_CHARS[..])
}

/// Handshake state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No nickname yet; the next line is a nickname request
    Unauthenticated,
    /// Nickname set; lines are chat content
    Active,
}

impl SessionState {
    pub fn of(session: &Session) -> Self {
        if session.is_active() {
            SessionState::Active
        } else {
            SessionState::Unauthenticated
        }
    }
}

/// What the server does with one inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Adopt the nickname and announce the join to every active session
    SetNickname(String),
    /// Broadcast chat content from the sender
    Chat(String),
    /// Tell the sender (only) that blank messages are not accepted
    RejectBlank,
}

/// Classify a raw line for a session in `state`
pub fn handle_line(state: SessionState, line: &str) -> Action {
    let line = trim(line);

    match state {
        // Adopted verbatim, even when empty
        SessionState::Unauthenticated => Action::SetNickname(line.to_string()),
        SessionState::Active if line.is_empty() => Action::RejectBlank,
        SessionState::Active => Action::Chat(line.to_string()),
    }
}
