//! ChatServer Actor implementation
//!
//! The central actor that owns the session registry. Connection handlers never
//! touch sessions directly; every registry mutation and every broadcast runs
//! here, one command at a time.

use std::ops::ControlFlow;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::broadcast;
use crate::message::{Frame, ServerMessage};
use crate::protocol::{self, Action, SessionState};
use crate::registry::SessionRegistry;
use crate::types::SessionId;

/// Commands sent from handlers (and the operator) to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted; replies with the assigned session id
    Connect {
        address: String,
        sender: mpsc::Sender<Frame>,
        reply: oneshot::Sender<SessionId>,
    },
    /// One line received from a session
    Line {
        session_id: SessionId,
        line: String,
    },
    /// Session's connection closed or failed
    Disconnect {
        session_id: SessionId,
    },
    /// Report the number of live sessions
    SessionCount {
        reply: oneshot::Sender<usize>,
    },
    /// Operator stop request
    Stop,
}

/// The main ChatServer actor
pub struct ChatServer {
    /// All live sessions
    registry: SessionRegistry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Processes commands until a `Stop` arrives, `cancel` fires, or every
    /// sender (listener and connection handlers) is gone. All sessions are
    /// closed before returning.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("ChatServer started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("ChatServer cancelled");
                    break;
                }
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd).is_break() {
                                break;
                            }
                        }
                        None => {
                            debug!("All command senders dropped");
                            break;
                        }
                    }
                }
            }
        }

        self.shutdown();
        info!("ChatServer shutting down");
    }

    /// Process a single command
    ///
    /// Returns `Break` when the actor should stop.
    fn handle_command(&mut self, cmd: ServerCommand) -> ControlFlow<()> {
        match cmd {
            ServerCommand::Connect {
                address,
                sender,
                reply,
            } => {
                self.handle_connect(address, sender, reply);
            }
            ServerCommand::Line { session_id, line } => {
                self.handle_line(session_id, line);
            }
            ServerCommand::Disconnect { session_id } => {
                self.handle_disconnect(session_id);
            }
            ServerCommand::SessionCount { reply } => {
                let _ = reply.send(self.registry.len());
            }
            ServerCommand::Stop => {
                info!("ChatServer stop requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Handle new connection: register it and prompt for a nickname
    fn handle_connect(
        &mut self,
        address: String,
        sender: mpsc::Sender<Frame>,
        reply: oneshot::Sender<SessionId>,
    ) {
        let session_id = self.registry.insert(address, sender);

        if reply.send(session_id).is_err() {
            // Handler vanished before learning its id
            self.registry.remove(session_id);
            return;
        }

        if let Some(session) = self.registry.get(session_id) {
            info!("[+] Session {} connected from {}", session_id, session.address);
            broadcast::emit_to(session, &ServerMessage::Welcome);
        }
        debug!("Total sessions: {}", self.registry.len());
    }

    /// Handle session close or error
    fn handle_disconnect(&mut self, session_id: SessionId) {
        if self.registry.remove(session_id).is_some() {
            info!("[-] Session {} disconnected", session_id);
        }
        debug!("Total sessions: {}", self.registry.len());
    }

    /// Run one inbound line through the protocol state machine
    fn handle_line(&mut self, session_id: SessionId, line: String) {
        let Some(session) = self.registry.get_mut(session_id) else {
            warn!("Line from unknown session {}", session_id);
            return;
        };

        debug!(
            "Received data: {} (size: {})",
            protocol::trim(&line),
            line.len()
        );

        match protocol::handle_line(SessionState::of(session), &line) {
            Action::SetNickname(nickname) => {
                session.set_nickname(nickname.clone());
                info!(
                    "Session {} ({}) set nickname to '{}'",
                    session_id, session.address, nickname
                );
                broadcast::emit(&self.registry, &ServerMessage::Joined { nickname });
            }
            Action::Chat(content) => {
                let message = ServerMessage::Chat {
                    from: session.nickname.clone(),
                    content,
                };
                broadcast::emit(&self.registry, &message);
            }
            Action::RejectBlank => {
                broadcast::emit_to(session, &ServerMessage::BlankRejected);
            }
        }
    }

    /// Close every session and empty the registry
    ///
    /// Dropping a session drops its transport sender, which ends the
    /// connection's writer task and closes the socket. Safe to call twice.
    fn shutdown(&mut self) {
        let sessions = self.registry.drain();
        if !sessions.is_empty() {
            info!("Closing {} session(s)", sessions.len());
        }
        for session in sessions {
            debug!("Removing session: {}", session);
        }
    }
}
