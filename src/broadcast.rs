//! Broadcaster
//!
//! Fire-and-forget fan-out over the session registry. A failed write is
//! logged and skipped; it never stops delivery to the remaining sessions.

use tracing::{debug, warn};

use crate::message::ServerMessage;
use crate::registry::SessionRegistry;
use crate::session::Session;

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Frames queued successfully
    pub delivered: usize,
    /// Recipients whose transport was full or closed
    pub failed: usize,
}

/// Send `message` plus line terminator to every active session
pub fn emit(registry: &SessionRegistry, message: &ServerMessage) -> Delivery {
    let frame = message.to_line_frame();
    let mut delivery = Delivery::default();

    registry.for_each(|session| {
        if !session.is_active() {
            return;
        }
        match session.send(frame.clone()) {
            Ok(()) => delivery.delivered += 1,
            Err(e) => {
                warn!("Broadcast to session {} failed: {}", session.id, e);
                delivery.failed += 1;
            }
        }
    });

    debug!(
        "Broadcast '{}' delivered={} failed={}",
        message, delivery.delivered, delivery.failed
    );
    delivery
}

/// Send `message` to one session, without terminator
pub fn emit_to(session: &Session, message: &ServerMessage) -> bool {
    match session.send(message.to_frame()) {
        Ok(()) => true,
        Err(e) => {
            warn!("Write to session {} failed: {}", session.id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Frame;
    use tokio::sync::mpsc;

    fn chat() -> ServerMessage {
        ServerMessage::Chat {
            from: "Alice".to_string(),
            content: "Hello".to_string(),
        }
    }

    #[test]
    fn test_emit_reaches_only_active_sessions() {
        let mut registry = SessionRegistry::new();
        let (active_tx, mut active_rx) = mpsc::channel::<Frame>(4);
        let (idle_tx, mut idle_rx) = mpsc::channel::<Frame>(4);

        let active = registry.insert("a".to_string(), active_tx);
        registry.insert("b".to_string(), idle_tx);
        registry
            .get_mut(active)
            .unwrap()
            .set_nickname("Alice".to_string());

        let delivery = emit(&registry, &chat());

        assert_eq!(delivery, Delivery { delivered: 1, failed: 0 });
        assert_eq!(&*active_rx.try_recv().unwrap(), "[Alice]: Hello\r\n");
        assert!(idle_rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_recipient_does_not_stop_broadcast() {
        let mut registry = SessionRegistry::new();
        let (full_tx, _full_rx) = mpsc::channel::<Frame>(1);
        let (closed_tx, closed_rx) = mpsc::channel::<Frame>(1);
        let (ok_tx, mut ok_rx) = mpsc::channel::<Frame>(1);
        drop(closed_rx);

        full_tx.try_send(Frame::from("backlog")).unwrap();

        for (addr, tx) in [("full", full_tx), ("closed", closed_tx), ("ok", ok_tx)] {
            let id = registry.insert(addr.to_string(), tx);
            registry.get_mut(id).unwrap().set_nickname(addr.to_string());
        }

        let delivery = emit(&registry, &chat());

        assert_eq!(delivery, Delivery { delivered: 1, failed: 2 });
        assert_eq!(&*ok_rx.try_recv().unwrap(), "[Alice]: Hello\r\n");
    }

    #[test]
    fn test_emit_to_single_recipient() {
        let mut registry = SessionRegistry::new();
        let (tx, mut rx) = mpsc::channel::<Frame>(1);
        let id = registry.insert("a".to_string(), tx);

        assert!(emit_to(registry.get(id).unwrap(), &ServerMessage::BlankRejected));
        assert_eq!(&*rx.try_recv().unwrap(), "[Server] Please send non-blank messages!");
    }
}
