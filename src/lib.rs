//! Netchat Library
//!
//! A minimal multi-client TCP chat service built on tokio, using the Actor
//! pattern for session state.
//!
//! # Protocol
//! - New connections are prompted for a nickname
//! - The first line received becomes the nickname and is announced to everyone
//! - Every later line is broadcast as `[nickname]: text`
//! - Blank chat lines are rejected back to the sender only
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the `SessionRegistry`
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all session access goes through message passing
//!
//! # Example
//! ```ignore
//! use netchat::{serve, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netchat::AppError> {
//!     serve(Config::default(), CancellationToken::new()).await
//! }
//! ```

pub mod broadcast;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod listener;
pub mod message;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use listener::{serve, Listener};
pub use message::{Frame, ServerMessage};
pub use registry::SessionRegistry;
pub use server::{ChatServer, ServerCommand};
pub use session::Session;
pub use types::SessionId;
