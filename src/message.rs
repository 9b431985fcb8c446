//! Message protocol definitions
//!
//! Plain-text, line-oriented protocol. Server messages are rendered through
//! `Display`; the broadcaster appends `LINE_TERMINATOR` to fan-out messages,
//! while the welcome prompt and the rejection notice go out unterminated.

use std::fmt;
use std::sync::Arc;

/// Terminator appended to every broadcast message
pub const LINE_TERMINATOR: &str = "\r\n";

/// Prompt sent to a new connection (no terminator)
pub const WELCOME_TEXT: &str = "Welcome to the chat! Please enter your nickname: ";

/// Reply to a blank chat line (no terminator)
pub const BLANK_REJECTED_TEXT: &str = "[Server] Please send non-blank messages!";

/// Server messages that are written without `LINE_TERMINATOR`
pub const UNTERMINATED: [&str; 2] = [WELCOME_TEXT, BLANK_REJECTED_TEXT];

/// Rendered bytes queued on a session's transport
///
/// Shared between all recipients of one broadcast.
pub type Frame = Arc<str>;

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Prompt sent to a freshly accepted connection
    Welcome,
    /// A session completed the nickname handshake
    Joined { nickname: String },
    /// Chat line from an active session
    Chat { from: String, content: String },
    /// Reply to an active session that sent a blank line
    BlankRejected,
}

impl ServerMessage {
    /// Render as a frame without terminator
    pub fn to_frame(&self) -> Frame {
        Arc::from(self.to_string())
    }

    /// Render as a frame followed by `LINE_TERMINATOR`
    pub fn to_line_frame(&self) -> Frame {
        Arc::from(format!("{}{}", self, LINE_TERMINATOR))
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Welcome => f.write_str(WELCOME_TEXT),
            ServerMessage::Joined { nickname } => write!(f, "'{}' has joined the chat", nickname),
            ServerMessage::Chat { from, content } => write!(f, "[{}]: {}", from, content),
            ServerMessage::BlankRejected => f.write_str(BLANK_REJECTED_TEXT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_has_no_terminator() {
        assert_eq!(
            &*ServerMessage::Welcome.to_frame(),
            "Welcome to the chat! Please enter your nickname: "
        );
    }

    #[test]
    fn test_joined_line() {
        let msg = ServerMessage::Joined {
            nickname: "Alice".to_string(),
        };
        assert_eq!(&*msg.to_line_frame(), "'Alice' has joined the chat\r\n");
    }

    #[test]
    fn test_chat_line() {
        let msg = ServerMessage::Chat {
            from: "Alice".to_string(),
            content: "Hello".to_string(),
        };
        assert_eq!(&*msg.to_line_frame(), "[Alice]: Hello\r\n");
    }

    #[test]
    fn test_rejection_text() {
        assert_eq!(
            ServerMessage::BlankRejected.to_string(),
            "[Server] Please send non-blank messages!"
        );
    }
}
