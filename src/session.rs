//! Session struct definition
//!
//! Represents one connected client with its state and transport handle.

use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::Frame;
use crate::types::SessionId;

/// Server-side state of one connected client
///
/// Owned exclusively by the `SessionRegistry`. Dropping the session drops
/// its transport sender, which ends the connection's writer task.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Remote endpoint captured at accept time
    pub address: String,
    /// Nickname (empty until the handshake completes)
    pub nickname: String,
    /// Server → Client transport channel
    transport: mpsc::Sender<Frame>,
}

impl Session {
    /// Create a new unauthenticated session
    pub fn new(id: SessionId, address: String, transport: mpsc::Sender<Frame>) -> Self {
        Self {
            id,
            address,
            nickname: String::new(),
            transport,
        }
    }

    /// Queue a frame on this session's transport
    ///
    /// Never waits: a full buffer is reported instead of queued.
    pub fn send(&self, frame: Frame) -> Result<(), SendError> {
        self.transport.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => SendError::ChannelFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Check if this session has completed the nickname handshake
    pub fn is_active(&self) -> bool {
        !self.nickname.is_empty()
    }

    /// Set the session's nickname
    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = nickname;
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nickname: \"{}\", ID: {}, IP Address: {}",
            self.nickname, self.id, self.address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let session = Session::new(SessionId(0), "127.0.0.1:5000".to_string(), tx);

        assert!(session.nickname.is_empty());
        assert!(!session.is_active());
    }

    #[test]
    fn test_session_nickname() {
        let (tx, _rx) = mpsc::channel(32);
        let mut session = Session::new(SessionId(3), "127.0.0.1:5000".to_string(), tx);

        session.set_nickname("Alice".to_string());

        assert!(session.is_active());
        assert_eq!(
            session.to_string(),
            "Nickname: \"Alice\", ID: 3, IP Address: 127.0.0.1:5000"
        );
    }

    #[test]
    fn test_send_reports_full_and_closed() {
        let (tx, rx) = mpsc::channel(1);
        let session = Session::new(SessionId(0), "peer".to_string(), tx);

        assert_eq!(session.send(Frame::from("one")), Ok(()));
        assert_eq!(session.send(Frame::from("two")), Err(SendError::ChannelFull));

        drop(rx);
        assert_eq!(session.send(Frame::from("three")), Err(SendError::ChannelClosed));
    }
}
