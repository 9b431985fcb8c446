//! Error types for the chat server and client
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use std::net::SocketAddr;

use thiserror::Error;

/// Application-level errors
///
/// Startup variants (`Bind`, `Connect`, `Config`) are fatal to the process.
/// The rest end a single connection and are only logged by the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to bind the listening socket (fatal)
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to reach the chat server (fatal for the client)
    #[error("Failed to connect to server at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Inbound line framing error (oversized line or invalid UTF-8)
    #[error("Line codec error: {0}")]
    Lines(#[from] tokio_util::codec::LinesCodecError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Session was never registered with the server
    #[error("Session registration failed for {0}")]
    Registration(SocketAddr),
}

/// Message send errors
///
/// Occurs when a write to a session's transport cannot be queued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The session's outbound buffer is full
    #[error("Channel full")]
    ChannelFull,
}
