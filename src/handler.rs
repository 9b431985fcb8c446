//! TCP connection handler
//!
//! Handles individual client connections: registration with the ChatServer,
//! line framing of inbound bytes, and writing queued frames back out.

use std::net::SocketAddr;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::message::Frame;
use crate::server::ServerCommand;
use crate::types::SessionId;

/// Handle a new TCP connection
///
/// Registers a session, then runs a read task and a write task until either
/// side finishes. The session is always deregistered before returning.
pub async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    cmd_tx: mpsc::Sender<ServerCommand>,
    config: &Config,
) -> Result<(), AppError> {
    // Create channel for server -> client frames
    let (frame_tx, frame_rx) = mpsc::channel::<Frame>(config.session_buffer);

    // Register with ChatServer
    let (reply_tx, reply_rx) = oneshot::channel();
    cmd_tx
        .send(ServerCommand::Connect {
            address: peer_addr.to_string(),
            sender: frame_tx,
            reply: reply_tx,
        })
        .await
        .map_err(|_| AppError::ChannelSend)?;
    let session_id = reply_rx
        .await
        .map_err(|_| AppError::Registration(peer_addr))?;

    debug!("Session {} registered for {}", session_id, peer_addr);

    let (reader, writer) = stream.into_split();

    let mut read_task = tokio::spawn(read_lines(
        reader,
        session_id,
        cmd_tx.clone(),
        config.max_line_length,
    ));
    let mut write_task = tokio::spawn(write_frames(writer, frame_rx));

    // Wait for either task to complete, then stop the other
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read task completed for {}", session_id);
            write_task.abort();
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", session_id);
            read_task.abort();
        }
    }

    // Already gone if the server shut down first
    let _ = cmd_tx
        .send(ServerCommand::Disconnect { session_id })
        .await;

    info!("Connection {} closed", peer_addr);

    Ok(())
}

/// Read task (socket -> ServerCommand::Line)
async fn read_lines(
    reader: OwnedReadHalf,
    session_id: SessionId,
    cmd_tx: mpsc::Sender<ServerCommand>,
    max_line_length: usize,
) {
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(max_line_length));

    while let Some(result) = lines.next().await {
        match result {
            Ok(line) => {
                if cmd_tx
                    .send(ServerCommand::Line { session_id, line })
                    .await
                    .is_err()
                {
                    debug!("Server closed, ending read task for {}", session_id);
                    break;
                }
            }
            Err(e) => {
                let e = AppError::from(e);
                warn!("Session {} read error: {}", session_id, e);
                break;
            }
        }
    }
    debug!("Read task ended for {}", session_id);
}

/// Write task (queued frames -> socket)
///
/// Ends when the session is dropped from the registry or the socket fails.
async fn write_frames(mut writer: OwnedWriteHalf, mut frame_rx: mpsc::Receiver<Frame>) {
    while let Some(frame) = frame_rx.recv().await {
        if let Err(e) = writer.write_all(frame.as_bytes()).await {
            error!("Socket write failed: {}", e);
            break;
        }
    }
    debug!("Write task ended for client");

    let _ = writer.shutdown().await;
}
